//! Raw binary import/export of sample arrays in a chosen byte order.
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::core::samples::{SampleBuffer, Samples};
use crate::error::{Error, Result};
use crate::types::{ByteOrder, DataType};

/// Staging buffer size for chunked reads and writes.
const CHUNK_BYTES: usize = 64 * 1024;

trait Wire: Copy + Default {
    const SIZE: usize;
    fn put(self, order: ByteOrder, buf: &mut [u8]);
    fn get(order: ByteOrder, buf: &[u8]) -> Self;
}

macro_rules! impl_wire {
    ($($t:ty),*) => {
        $(
            impl Wire for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                #[inline]
                fn put(self, order: ByteOrder, buf: &mut [u8]) {
                    let bytes = match order {
                        ByteOrder::Little => self.to_le_bytes(),
                        ByteOrder::Big => self.to_be_bytes(),
                    };
                    buf[..Self::SIZE].copy_from_slice(&bytes);
                }

                #[inline]
                fn get(order: ByteOrder, buf: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(&buf[..Self::SIZE]);
                    match order {
                        ByteOrder::Little => <$t>::from_le_bytes(raw),
                        ByteOrder::Big => <$t>::from_be_bytes(raw),
                    }
                }
            }
        )*
    };
}

impl_wire!(i8, u8, i16, u16, i32, u32, i64, f32, f64);

fn write_from<T: Wire, W: Write>(writer: &mut W, data: &[T], order: ByteOrder) -> Result<()> {
    let per_chunk = CHUNK_BYTES / T::SIZE;
    let mut chunk = vec![0u8; per_chunk * T::SIZE];
    for block in data.chunks(per_chunk) {
        for (k, &v) in block.iter().enumerate() {
            v.put(order, &mut chunk[k * T::SIZE..]);
        }
        writer.write_all(&chunk[..block.len() * T::SIZE])?;
    }
    Ok(())
}

fn read_into<T: Wire, R: Read>(reader: &mut R, dst: &mut [T], order: ByteOrder) -> Result<usize> {
    let mut chunk = vec![0u8; (CHUNK_BYTES / T::SIZE) * T::SIZE];
    let mut filled = 0usize;
    // bytes of an element split across two reads
    let mut pending = 0usize;

    while filled < dst.len() {
        let want = ((dst.len() - filled) * T::SIZE).min(chunk.len());
        let n = match reader.read(&mut chunk[pending..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        pending += n;

        let whole = pending / T::SIZE;
        for (k, slot) in dst[filled..filled + whole].iter_mut().enumerate() {
            *slot = T::get(order, &chunk[k * T::SIZE..]);
        }
        filled += whole;
        chunk.copy_within(whole * T::SIZE..pending, 0);
        pending -= whole * T::SIZE;
    }
    Ok(filled)
}

fn decode<T: Wire>(bytes: &[u8], order: ByteOrder) -> Vec<T> {
    bytes
        .chunks_exact(T::SIZE)
        .map(|c| T::get(order, c))
        .collect()
}

/// Write every element of `data` in `order`.
pub fn write_samples<W: Write>(writer: &mut W, data: Samples<'_>, order: ByteOrder) -> Result<()> {
    match data {
        Samples::Int8(d) => write_from(writer, d, order)?,
        Samples::Int16(d) => write_from(writer, d, order)?,
        Samples::Int32(d) => write_from(writer, d, order)?,
        Samples::Int64(d) => write_from(writer, d, order)?,
        Samples::Float32(d) => write_from(writer, d, order)?,
        Samples::Float64(d) => write_from(writer, d, order)?,
    }
    writer.flush()?;
    Ok(())
}

/// Fill `buffer` from `reader`, stopping at whichever runs out first.
///
/// Returns the number of whole elements read; elements past that point keep
/// their previous values.
pub fn read_samples_into<R: Read>(
    reader: &mut R,
    buffer: &mut SampleBuffer,
    order: ByteOrder,
) -> Result<usize> {
    let n = match buffer {
        SampleBuffer::Int8(d) => read_into(reader, d, order)?,
        SampleBuffer::Int16(d) => read_into(reader, d, order)?,
        SampleBuffer::Int32(d) => read_into(reader, d, order)?,
        SampleBuffer::Int64(d) => read_into(reader, d, order)?,
        SampleBuffer::Float32(d) => read_into(reader, d, order)?,
        SampleBuffer::Float64(d) => read_into(reader, d, order)?,
    };
    debug!("read_samples_into: {} of {} elements", n, buffer.len());
    Ok(n)
}

/// Decode a whole file of `data_type` elements.
///
/// Unsigned types are widened into the next signed kind; the returned flag is
/// true when that happened.
pub fn read_samples_file(
    path: &Path,
    data_type: DataType,
    order: ByteOrder,
) -> Result<(SampleBuffer, bool)> {
    let (_, is_unsigned) = data_type.storage()?;
    let bytes = fs::read(path)?;
    let size = data_type.file_size_in_bytes();
    if bytes.len() % size != 0 {
        return Err(Error::InvalidArgument {
            arg: "file size",
            value: format!("{} bytes is not a multiple of {} ({})", bytes.len(), size, data_type),
        });
    }

    let buffer = match data_type {
        DataType::I8 => SampleBuffer::Int8(decode(&bytes, order)),
        DataType::U8 => SampleBuffer::Int16(
            decode::<u8>(&bytes, order).into_iter().map(i16::from).collect(),
        ),
        DataType::I16 => SampleBuffer::Int16(decode(&bytes, order)),
        DataType::U16 => SampleBuffer::Int32(
            decode::<u16>(&bytes, order).into_iter().map(i32::from).collect(),
        ),
        DataType::I32 => SampleBuffer::Int32(decode(&bytes, order)),
        DataType::U32 => SampleBuffer::Int64(
            decode::<u32>(&bytes, order).into_iter().map(i64::from).collect(),
        ),
        DataType::I64 => SampleBuffer::Int64(decode(&bytes, order)),
        DataType::F32 => SampleBuffer::Float32(decode(&bytes, order)),
        DataType::F64 => SampleBuffer::Float64(decode(&bytes, order)),
        DataType::U64 => return Err(Error::unsupported("uint64")),
    };

    info!(
        "Loaded {} {} samples from {:?} ({:?} endian)",
        buffer.len(),
        data_type,
        path,
        order
    );
    Ok((buffer, is_unsigned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read to exercise split elements
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_big_endian_layout() {
        let mut out = Vec::new();
        write_samples(&mut out, Samples::Int16(&[0x0102, -2]), ByteOrder::Big).unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0xFF, 0xFE]);

        let mut out = Vec::new();
        write_samples(&mut out, Samples::Int32(&[0x0102_0304]), ByteOrder::Little).unwrap();
        assert_eq!(out, vec![0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_read_into_handles_split_elements() {
        let values = [1.5f64, -2.25, 1e300];
        let mut bytes = Vec::new();
        write_samples(&mut bytes, Samples::Float64(&values), ByteOrder::Big).unwrap();

        let mut reader = Trickle { data: &bytes, step: 3 };
        let mut buf = SampleBuffer::zeros(crate::types::SampleKind::Float64, 3);
        let n = read_samples_into(&mut reader, &mut buf, ByteOrder::Big).unwrap();
        assert_eq!(n, 3);
        assert_eq!(buf, SampleBuffer::Float64(values.to_vec()));
    }

    #[test]
    fn test_short_stream_leaves_tail_untouched() {
        let mut reader = Cursor::new(vec![7u8, 0, 9, 0, 1]);
        let mut buf = SampleBuffer::Int16(vec![-1; 4]);
        let n = read_samples_into(&mut reader, &mut buf, ByteOrder::Little).unwrap();
        assert_eq!(n, 2);
        assert_eq!(buf, SampleBuffer::Int16(vec![7, 9, -1, -1]));
    }

    #[test]
    fn test_read_file_upgrades_unsigned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u16.bin");
        fs::write(&path, [0xFF, 0xFF, 0x00, 0x01]).unwrap();

        let (buf, unsigned) = read_samples_file(&path, DataType::U16, ByteOrder::Little).unwrap();
        assert!(unsigned);
        assert_eq!(buf, SampleBuffer::Int32(vec![65535, 256]));
    }

    #[test]
    fn test_read_file_rejects_partial_element_and_u64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.bin");
        fs::write(&path, [1, 2, 3]).unwrap();
        assert!(matches!(
            read_samples_file(&path, DataType::I16, ByteOrder::Little),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            read_samples_file(&path, DataType::U64, ByteOrder::Little),
            Err(Error::UnsupportedType { .. })
        ));
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::samples::{IntSample, SamplesMut};
use crate::error::{Error, Result};
use crate::types::BitmaskOp;

/// Set of bit positions `0..=63`, bit 0 being the least significant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitMask(u64);

impl BitMask {
    pub fn from_value(bits: u64) -> Self {
        Self(bits)
    }

    pub fn from_positions<I: IntoIterator<Item = u32>>(positions: I) -> Result<Self> {
        let mut bits = 0u64;
        for p in positions {
            if p > 63 {
                return Err(Error::InvalidArgument {
                    arg: "bit position",
                    value: p.to_string(),
                });
            }
            bits |= 1u64 << p;
        }
        Ok(Self(bits))
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn is_set(&self, pos: u32) -> bool {
        pos < 64 && (self.0 >> pos) & 1 == 1
    }

    /// Index of the highest set bit plus one; zero for an empty mask.
    pub fn len(&self) -> u32 {
        64 - self.0.leading_zeros()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Selected positions in ascending order
    pub fn positions(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).filter(move |&p| self.is_set(p))
    }

    /// No bits, or every bit of a `width`-bit element: both leave values unchanged.
    pub fn is_degenerate(&self, width: u32) -> bool {
        let all = if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        let selected = self.0 & all;
        selected == 0 || selected == all
    }
}

#[inline]
fn extract_bits(value: u64, mask: BitMask) -> u64 {
    let mut packed = 0u64;
    let mut pos = 0u32;
    for p in mask.positions() {
        packed |= ((value >> p) & 1) << pos;
        pos += 1;
    }
    packed
}

fn apply_to<T: IntSample>(data: &mut [T], mask: BitMask, op: BitmaskOp) {
    let bmask = mask.bits();
    for v in data.iter_mut() {
        let the_value = (v.to_i64() as u64) & bmask;
        let packed = match op {
            BitmaskOp::And => the_value,
            BitmaskOp::Extract => extract_bits(the_value, mask),
        };
        *v = T::from_i64_wrapping(packed as i64);
    }
}

/// Apply `mask` to every element in place. There is no undo; keep a copy if the
/// original values are needed.
///
/// Returns `Ok(true)` if the data was rewritten and `Ok(false)` if there was nothing
/// to do (empty data, or a mask that is degenerate for the element width).
/// Floating-point data is rejected with `Error::UnsupportedType`.
pub fn apply_bitmask(data: SamplesMut<'_>, mask: &BitMask, op: BitmaskOp) -> Result<bool> {
    let kind = data.kind();
    if !kind.is_integer() {
        return Err(Error::unsupported(kind));
    }
    if mask.is_degenerate(kind.bits()) {
        debug!("Bitmask {:#x} is degenerate for {} - skipped", mask.bits(), kind);
        return Ok(false);
    }

    let applied = match data {
        SamplesMut::Int8(d) if !d.is_empty() => {
            apply_to(d, *mask, op);
            true
        }
        SamplesMut::Int16(d) if !d.is_empty() => {
            apply_to(d, *mask, op);
            true
        }
        SamplesMut::Int32(d) if !d.is_empty() => {
            apply_to(d, *mask, op);
            true
        }
        SamplesMut::Int64(d) if !d.is_empty() => {
            apply_to(d, *mask, op);
            true
        }
        _ => false,
    };

    if applied {
        debug!(
            "Applied bitmask {} ({}) to {} data",
            to_binary_string(mask.bits(), kind.size_in_bytes()).unwrap_or_default(),
            op,
            kind
        );
    }
    Ok(applied)
}

/// Zero-padded base-2 rendering of the low `nbytes` bytes of `v`, one space
/// between bytes, e.g. `15, 1` -> `"00001111"`.
pub fn to_binary_string(v: u64, nbytes: usize) -> Option<String> {
    if nbytes == 0 || nbytes > 8 {
        return None;
    }
    let groups: Vec<String> = (0..nbytes)
        .rev()
        .map(|b| format!("{:08b}", (v >> (b * 8)) & 0xFF))
        .collect();
    Some(groups.join(" "))
}

/// Zero-padded upper-case base-16 rendering of the low `nbytes` bytes of `v`,
/// e.g. `42543, 4` -> `"0000A62F"`.
pub fn to_hex_string(v: u64, nbytes: usize) -> Option<String> {
    if nbytes == 0 || nbytes > 8 {
        return None;
    }
    let masked = if nbytes == 8 {
        v
    } else {
        v & ((1u64 << (nbytes * 8)) - 1)
    };
    Some(format!("{:0width$X}", masked, width = nbytes * 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_234() -> BitMask {
        BitMask::from_positions([2, 3, 4]).unwrap()
    }

    #[test]
    fn test_and_keeps_selected_bits() {
        let mut data = [0b1001_0101u8 as i8];
        let applied = apply_bitmask(SamplesMut::Int8(&mut data), &mask_234(), BitmaskOp::And).unwrap();
        assert!(applied);
        assert_eq!(data[0], 0b0001_0100);
        assert_eq!(data[0], 20);
    }

    #[test]
    fn test_extract_packs_selected_bits() {
        let mut data = [0b1001_0101u8 as i8];
        apply_bitmask(SamplesMut::Int8(&mut data), &mask_234(), BitmaskOp::Extract).unwrap();
        assert_eq!(data[0], 0b101);
    }

    #[test]
    fn test_extract_non_contiguous_bits_wide_kinds() {
        // bits 1, 5 and 40: value has 1 and 40 set
        let mask = BitMask::from_positions([1, 5, 40]).unwrap();
        let mut data = [(1i64 << 40) | 0b10, 0b10_0000];
        apply_bitmask(SamplesMut::Int64(&mut data), &mask, BitmaskOp::Extract).unwrap();
        assert_eq!(data, [0b101, 0b010]);
    }

    #[test]
    fn test_sign_bit_of_narrow_kind() {
        let mask = BitMask::from_positions([15]).unwrap();
        let mut data = [-1i16, 1];
        apply_bitmask(SamplesMut::Int16(&mut data), &mask, BitmaskOp::Extract).unwrap();
        assert_eq!(data, [1, 0]);

        let mut data = [-1i16, 1];
        apply_bitmask(SamplesMut::Int16(&mut data), &mask, BitmaskOp::And).unwrap();
        assert_eq!(data, [i16::MIN, 0]);
    }

    #[test]
    fn test_degenerate_masks_are_identity() {
        let mut data = [0x5Ai8, -3];
        let none = BitMask::default();
        assert!(!apply_bitmask(SamplesMut::Int8(&mut data), &none, BitmaskOp::And).unwrap());
        let all = BitMask::from_value(0xFF);
        assert!(!apply_bitmask(SamplesMut::Int8(&mut data), &all, BitmaskOp::Extract).unwrap());
        assert_eq!(data, [0x5A, -3]);

        // 0xFF is not all-ones for a 16-bit element
        assert!(!all.is_degenerate(16));
        assert!(BitMask::from_value(u64::MAX).is_degenerate(64));
    }

    #[test]
    fn test_float_data_is_rejected() {
        let mut data = [1.0f32];
        assert!(matches!(
            apply_bitmask(SamplesMut::Float32(&mut data), &mask_234(), BitmaskOp::And),
            Err(Error::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_empty_data_is_not_applied() {
        let mut data: [i32; 0] = [];
        assert!(!apply_bitmask(SamplesMut::Int32(&mut data), &mask_234(), BitmaskOp::And).unwrap());
    }

    #[test]
    fn test_mask_positions_and_len() {
        let m = mask_234();
        assert_eq!(m.bits(), 0b1_1100);
        assert_eq!(m.len(), 5);
        assert_eq!(m.positions().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(BitMask::from_positions([64]).is_err());
        assert_eq!(BitMask::default().len(), 0);
    }

    #[test]
    fn test_binary_and_hex_strings() {
        assert_eq!(to_binary_string(15, 1).as_deref(), Some("00001111"));
        assert_eq!(to_binary_string(0x0102, 2).as_deref(), Some("00000001 00000010"));
        assert_eq!(to_hex_string(42543, 4).as_deref(), Some("0000A62F"));
        assert_eq!(to_hex_string(u64::MAX, 8).as_deref(), Some("FFFFFFFFFFFFFFFF"));
        assert_eq!(to_hex_string(0x1FF, 1).as_deref(), Some("FF"));
        assert_eq!(to_binary_string(1, 0), None);
    }
}

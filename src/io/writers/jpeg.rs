use jpeg_encoder::{ColorType, Encoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{Error, Result};
use crate::io::writers::check_frame_len;

/// Baseline JPEG preview at quality 100. Both dimensions must fit in a `u16`.
pub fn write_gray_jpeg(output: &Path, cols: usize, rows: usize, data: &[u8]) -> Result<()> {
    check_frame_len(cols, rows, data)?;
    let width = u16::try_from(cols).map_err(|_| Error::InvalidArgument {
        arg: "width",
        value: format!("{} exceeds the JPEG limit of {}", cols, u16::MAX),
    })?;
    let height = u16::try_from(rows).map_err(|_| Error::InvalidArgument {
        arg: "height",
        value: format!("{} exceeds the JPEG limit of {}", rows, u16::MAX),
    })?;

    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let encoder = Encoder::new(&mut writer, 100);
    encoder.encode(data, width, height, ColorType::Luma)?;
    Ok(())
}

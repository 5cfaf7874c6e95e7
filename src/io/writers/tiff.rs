use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tiff::encoder::{TiffEncoder, colortype};
use tracing::debug;

use crate::error::Result;
use crate::io::writers::check_frame_len;

/// Write a single-band 8-bit grayscale TIFF; `data` is row-major.
pub fn write_gray_tiff(output: &Path, cols: usize, rows: usize, data: &[u8]) -> Result<()> {
    check_frame_len(cols, rows, data)?;
    let width = u32::try_from(cols).map_err(|_| crate::Error::InvalidArgument {
        arg: "width",
        value: cols.to_string(),
    })?;
    let height = u32::try_from(rows).map_err(|_| crate::Error::InvalidArgument {
        arg: "height",
        value: rows.to_string(),
    })?;

    let file = File::create(output)?;
    let mut encoder = TiffEncoder::new(BufWriter::new(file))?;
    encoder.write_image::<colortype::Gray8>(width, height, data)?;
    debug!("Wrote {}x{} TIFF to {:?}", cols, rows, output);
    Ok(())
}

//! Grayscale image writers for rendered display frames.
pub mod jpeg;
pub mod tiff;

pub use jpeg::write_gray_jpeg;
pub use tiff::write_gray_tiff;

use crate::error::{Error, Result};

fn check_frame_len(cols: usize, rows: usize, data: &[u8]) -> Result<()> {
    if cols == 0 || rows == 0 {
        return Err(Error::InvalidArgument {
            arg: "dimensions",
            value: format!("{}x{}", cols, rows),
        });
    }
    let expected = cols.checked_mul(rows).unwrap_or(usize::MAX);
    if expected != data.len() {
        return Err(Error::DimensionMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

use ndarray::Array2;
use tracing::{debug, info, warn};

use crate::core::params::DisplayParams;
use crate::core::processing::autocontrast::{
    ContrastParams, auto_contrast_apply, auto_contrast_compute, auto_contrast_convert_image_buffer,
};
use crate::core::processing::bitmask::apply_bitmask;
use crate::core::processing::reduce::{
    ReduceOptions, grid_len, reduce_to_bytes, to_display_array, transpose_bytes,
};
use crate::core::processing::stats::{ValueRange, find_min_max};
use crate::core::samples::SampleBuffer;
use crate::error::Result;

/// Display-ready bytes for one sample grid
#[derive(Debug, Clone)]
pub struct DisplayFrame {
    pub width: usize,
    pub height: usize,
    pub bytes: Vec<u8>,
    /// Window the bytes were scaled with
    pub range: ValueRange,
    /// Source indices rendered as 0 because they were invalid
    pub invalid_indices: Vec<usize>,
    /// Set when the auto-contrast path produced the bytes
    pub contrast: Option<ContrastParams>,
}

impl DisplayFrame {
    /// Bytes as a `(height, width)` grid.
    pub fn to_array(&self) -> Result<Array2<u8>> {
        to_display_array(self.bytes.clone(), self.width, self.height)
    }
}

fn auto_contrast_bytes(
    buffer: &SampleBuffer,
    params: &DisplayParams,
    out: &mut Vec<u8>,
) -> Result<ContrastParams> {
    let data = buffer.as_samples();
    grid_len(params.width, params.height, data.len())?;
    let gain_bias = auto_contrast_compute(data, params.is_unsigned)?;
    let stretched = auto_contrast_apply(
        data,
        gain_bias,
        params.contrast_clamp,
        params.is_unsigned,
        None,
    )?;
    out.clear();
    out.resize(stretched.len(), 0);
    auto_contrast_convert_image_buffer(stretched.as_samples(), out, params.is_unsigned)?;
    if params.transpose {
        *out = transpose_bytes(out, params.width, params.height)?;
    }
    Ok(gain_bias)
}

/// Render a sample grid into display bytes.
///
/// A configured bitmask is applied to `buffer` in place first and, when it changes
/// the data, disables auto-contrast. Auto-contrast runs for integer kinds only;
/// if it fails the grid is rendered through the linear byte reducer instead.
pub fn render_display_bytes(
    buffer: &mut SampleBuffer,
    params: &DisplayParams,
) -> Result<DisplayFrame> {
    let mut auto_contrast = params.auto_contrast;

    if let Some(mask) = params.bitmask.as_ref() {
        match apply_bitmask(buffer.as_samples_mut(), mask, params.bitmask_op) {
            Ok(true) => auto_contrast = false,
            Ok(false) => {}
            Err(e) => warn!("Bitmask not applied: {}", e),
        }
    }

    let kind = buffer.kind();
    if auto_contrast && !kind.is_integer() {
        debug!("Auto-contrast skipped for {} data", kind);
        auto_contrast = false;
    }

    let mut bytes = Vec::with_capacity(buffer.len());
    let mut invalid_indices = Vec::new();

    if auto_contrast {
        match auto_contrast_bytes(buffer, params, &mut bytes) {
            Ok(gain_bias) => {
                let range = match params.range {
                    Some(r) if !r.is_degenerate() => r,
                    _ => find_min_max(buffer.as_samples(), None)?,
                };
                info!(
                    "Rendered {}x{} {} grid with auto-contrast",
                    params.width, params.height, kind
                );
                return Ok(DisplayFrame {
                    width: params.width,
                    height: params.height,
                    bytes,
                    range,
                    invalid_indices,
                    contrast: Some(gain_bias),
                });
            }
            Err(e) => warn!("Auto-contrast unavailable ({}); using linear scaling", e),
        }
    }

    let opts = ReduceOptions {
        range: params.range,
        width: params.width,
        height: params.height,
        transpose: params.transpose,
        fill_values: &params.fill_values,
        force_convert: params.force_convert,
    };
    let range = reduce_to_bytes(buffer.as_samples(), &opts, &mut bytes, &mut invalid_indices)?;

    info!(
        "Rendered {}x{} {} grid, range=[{}, {}], invalid={}",
        params.width,
        params.height,
        kind,
        range.min,
        range.max,
        invalid_indices.len()
    );

    Ok(DisplayFrame {
        width: params.width,
        height: params.height,
        bytes,
        range,
        invalid_indices,
        contrast: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::processing::bitmask::BitMask;
    use crate::types::BitmaskOp;

    fn params(width: usize, height: usize) -> DisplayParams {
        DisplayParams {
            width,
            height,
            ..DisplayParams::default()
        }
    }

    #[test]
    fn test_linear_path_reports_invalid_fill_values() {
        let mut buf = SampleBuffer::from(vec![1i32, 2, -9999, 4]);
        let p = DisplayParams {
            fill_values: vec![-9999.0],
            range: Some(ValueRange::new(1.0, 4.0).unwrap()),
            ..params(2, 2)
        };
        let frame = render_display_bytes(&mut buf, &p).unwrap();
        assert_eq!(frame.bytes, vec![0, 85, 0, 255]);
        assert_eq!(frame.invalid_indices, vec![2]);
        assert!(frame.contrast.is_none());
        let grid = frame.to_array().unwrap();
        assert_eq!(grid[[1, 1]], 255);
    }

    #[test]
    fn test_auto_contrast_path_for_unsigned_bytes() {
        // u8 data upgraded to Int16
        let mut buf = SampleBuffer::from(vec![100i16, 101, 102, 103, 104, 105]);
        let p = DisplayParams {
            auto_contrast: true,
            is_unsigned: true,
            ..params(3, 2)
        };
        let frame = render_display_bytes(&mut buf, &p).unwrap();
        let gb = frame.contrast.expect("auto-contrast applied");
        assert!(gb.gain > 1.0);
        assert_eq!(frame.bytes.len(), 6);
        assert!(frame.bytes.windows(2).all(|w| w[0] <= w[1]));
        // window mean±3σ padded by 10%: [95.77, 109.24], gain ~18.93
        assert_eq!(frame.bytes[0], 80);
        assert_eq!(frame.bytes[5], 174);
    }

    #[test]
    fn test_auto_contrast_skipped_for_floats() {
        let mut buf = SampleBuffer::from(vec![0.0f64, 0.5, 1.0, 1.5]);
        let p = DisplayParams {
            auto_contrast: true,
            ..params(2, 2)
        };
        let frame = render_display_bytes(&mut buf, &p).unwrap();
        assert!(frame.contrast.is_none());
        assert_eq!(frame.bytes, vec![0, 85, 170, 255]);
    }

    #[test]
    fn test_bitmask_disables_auto_contrast() {
        let mut buf = SampleBuffer::from(vec![0b1001_0101i16, 0b0000_1100]);
        let p = DisplayParams {
            auto_contrast: true,
            is_unsigned: true,
            bitmask: Some(BitMask::from_positions([2, 3, 4]).unwrap()),
            bitmask_op: BitmaskOp::Extract,
            ..params(1, 2)
        };
        let frame = render_display_bytes(&mut buf, &p).unwrap();
        assert!(frame.contrast.is_none());
        assert_eq!(buf, SampleBuffer::Int16(vec![0b101, 0b011]));
        assert_eq!(frame.range, ValueRange { min: 3.0, max: 5.0 });
    }
}

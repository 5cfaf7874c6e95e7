//! Byte Reducer: rescale a typed sample grid into an 8-bit display buffer.
//!
//! Source samples are laid out column-major (`src = j * height + i` for row `i`,
//! column `j`). Without transposition each sample stays at its source index; with
//! transposition the output is row-major (`dst = i * width + j`).
use ndarray::Array2;
use tracing::debug;

use crate::core::processing::stats::{ValueRange, find_min_max};
use crate::core::samples::{Sample, Samples};
use crate::error::{Error, Result};

/// The byte fast path is a no-op for this range.
const FULL_BYTE_RANGE: ValueRange = ValueRange {
    min: 0.0,
    max: 255.0,
};

/// Options for a single reduction.
#[derive(Clone, Debug)]
pub struct ReduceOptions<'a> {
    /// Display window; `None` or a degenerate range is recomputed from the data
    pub range: Option<ValueRange>,
    pub width: usize,
    pub height: usize,
    pub transpose: bool,
    /// Sentinels mapped to 0 and reported as invalid (wide kinds only)
    pub fill_values: &'a [f64],
    /// Rescale Int8 data instead of passing the raw bytes through
    pub force_convert: bool,
}

impl<'a> ReduceOptions<'a> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            range: None,
            width,
            height,
            transpose: false,
            fill_values: &[],
            force_convert: false,
        }
    }
}

#[inline]
fn ratio_for(range: ValueRange) -> f64 {
    if range.is_degenerate() {
        1.0
    } else {
        255.0 / range.span()
    }
}

/// Truncate toward zero into a 32-bit integer, then keep the low byte. A
/// degenerate ratio of 1.0 is deliberately not clamped here.
#[inline]
fn scaled_byte(v: f64, min: f64, ratio: f64) -> u8 {
    ((v - min) * ratio) as i32 as u8
}

#[inline]
fn to_byte<T: Sample>(
    v: T,
    ratio: f64,
    range: ValueRange,
    fill: &[f64],
    idx: usize,
    invalid: &mut Vec<usize>,
) -> u8 {
    let x = v.to_f64();
    if x < range.min || x > range.max || fill.contains(&x) || v.is_nan_inf() {
        invalid.push(idx);
        0
    } else {
        scaled_byte(x, range.min, ratio)
    }
}

fn reduce_wide<T: Sample>(
    data: &[T],
    range: ValueRange,
    opts: &ReduceOptions<'_>,
    out: &mut [u8],
    invalid: &mut Vec<usize>,
) {
    let ratio = ratio_for(range);
    let (w, h) = (opts.width, opts.height);
    for i in 0..h {
        for j in 0..w {
            let src = j * h + i;
            let dst = if opts.transpose { i * w + j } else { src };
            out[dst] = to_byte(data[src], ratio, range, opts.fill_values, src, invalid);
        }
    }
}

fn reduce_int8(
    data: &[i8],
    opts: &ReduceOptions<'_>,
    out: &mut [u8],
    invalid: &mut Vec<usize>,
) -> Result<ValueRange> {
    let mut convert = opts.force_convert;
    let mut range = opts.range.unwrap_or(ValueRange { min: 0.0, max: 0.0 });

    if convert && range.is_degenerate() {
        range = find_min_max(Samples::Int8(data), None)?;
    }
    if range == FULL_BYTE_RANGE {
        convert = false;
    }

    let (w, h) = (opts.width, opts.height);

    if !convert {
        if opts.transpose {
            for i in 0..h {
                for j in 0..w {
                    out[i * w + j] = data[j * h + i] as u8;
                }
            }
        } else {
            for (d, &s) in out.iter_mut().zip(data) {
                *d = s as u8;
            }
        }
        return Ok(FULL_BYTE_RANGE);
    }

    // Explicit window: rescale, no fill or NaN handling for bytes
    let ratio = ratio_for(range);
    for i in 0..h {
        for j in 0..w {
            let src = j * h + i;
            let dst = if opts.transpose { i * w + j } else { src };
            let x = data[src] as f64;
            out[dst] = if range.contains(x) {
                scaled_byte(x, range.min, ratio)
            } else {
                invalid.push(src);
                0
            };
        }
    }
    Ok(range)
}

/// Number of samples in a `width x height` grid, checked against `actual`.
pub fn grid_len(width: usize, height: usize, actual: usize) -> Result<usize> {
    let expected = width
        .checked_mul(height)
        .filter(|&n| n > 0)
        .ok_or_else(|| Error::InvalidArgument {
            arg: "dimensions",
            value: format!("{}x{}", width, height),
        })?;
    if expected != actual {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Ok(expected)
}

/// Remap column-major bytes into row-major display order.
pub fn transpose_bytes(src: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    grid_len(width, height, src.len())?;
    let mut out = vec![0u8; src.len()];
    for i in 0..height {
        for j in 0..width {
            out[i * width + j] = src[j * height + i];
        }
    }
    Ok(out)
}

/// Convert `data` into `width * height` display bytes.
///
/// `out` is resized to exactly `width * height` bytes and keeps its allocation
/// across calls. Source indices of out-of-range, fill and NaN/Inf samples are
/// appended to `invalid`; it is never cleared here, so callers pass an empty sink
/// unless they want indices to accumulate across calls.
///
/// Returns the range the bytes were scaled with.
pub fn reduce_to_bytes(
    data: Samples<'_>,
    opts: &ReduceOptions<'_>,
    out: &mut Vec<u8>,
    invalid: &mut Vec<usize>,
) -> Result<ValueRange> {
    let expected = grid_len(opts.width, opts.height, data.len())?;

    out.clear();
    out.resize(expected, 0);

    if let Samples::Int8(d) = data {
        return reduce_int8(d, opts, out, invalid);
    }

    let range = match opts.range {
        Some(r) if !r.is_degenerate() => r,
        _ => find_min_max(data, None)?,
    };
    debug!(
        "reduce_to_bytes: kind={}, {}x{}, range=[{}, {}], transpose={}, fills={}",
        data.kind(),
        opts.width,
        opts.height,
        range.min,
        range.max,
        opts.transpose,
        opts.fill_values.len()
    );

    match data {
        Samples::Int16(d) => reduce_wide(d, range, opts, out, invalid),
        Samples::Int32(d) => reduce_wide(d, range, opts, out, invalid),
        Samples::Int64(d) => reduce_wide(d, range, opts, out, invalid),
        Samples::Float32(d) => reduce_wide(d, range, opts, out, invalid),
        Samples::Float64(d) => reduce_wide(d, range, opts, out, invalid),
        Samples::Int8(_) => unreachable!("handled by the byte fast path"),
    }
    Ok(range)
}

/// View row-major display bytes as a `(height, width)` grid.
pub fn to_display_array(bytes: Vec<u8>, width: usize, height: usize) -> Result<Array2<u8>> {
    let actual = bytes.len();
    Array2::from_shape_vec((height, width), bytes).map_err(|_| Error::DimensionMismatch {
        expected: width * height,
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(data: Samples<'_>, opts: &ReduceOptions<'_>) -> (Vec<u8>, Vec<usize>, ValueRange) {
        let mut out = Vec::new();
        let mut invalid = Vec::new();
        let range = reduce_to_bytes(data, opts, &mut out, &mut invalid).unwrap();
        (out, invalid, range)
    }

    #[test]
    fn test_linear_rescale_over_computed_range() {
        let data = [0i16, 51, 102, 255];
        let (out, invalid, range) = reduce(Samples::Int16(&data), &ReduceOptions::new(2, 2));
        assert_eq!(range, ValueRange { min: 0.0, max: 255.0 });
        assert_eq!(out, vec![0, 51, 102, 255]);
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_out_of_range_fill_and_nan_are_zero_and_recorded() {
        let data = [f32::NAN, 10.0, -1.0, 5.0, 20.0, 99.0];
        let fills = [99.0];
        let opts = ReduceOptions {
            range: Some(ValueRange::new(0.0, 10.0).unwrap()),
            fill_values: &fills,
            ..ReduceOptions::new(3, 2)
        };
        let (out, invalid, _) = reduce(Samples::Float32(&data), &opts);
        assert_eq!(out, vec![0, 255, 0, 127, 0, 0]);
        let mut sorted = invalid.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 2, 4, 5]);
    }

    #[test]
    fn test_output_stays_in_byte_range() {
        let data: Vec<f64> = (0..100).map(|i| (i as f64) * 1.37 - 20.0).collect();
        let (out, invalid, _) = reduce(Samples::Float64(&data), &ReduceOptions::new(10, 10));
        assert_eq!(out.len(), 100);
        assert!(invalid.is_empty());
        assert_eq!(out[0], 0);
        // the maximum may land a rounding step below 255
        assert!(*out.iter().max().unwrap() >= 254);
    }

    #[test]
    fn test_degenerate_range_uses_unit_ratio() {
        let data = [5i32; 4];
        let (out, invalid, range) = reduce(Samples::Int32(&data), &ReduceOptions::new(2, 2));
        assert!(range.is_degenerate());
        assert_eq!(out, vec![0, 0, 0, 0]);
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_unit_ratio_wraps_instead_of_clamping() {
        assert_eq!(scaled_byte(300.0, 0.0, 1.0), 44);
        assert_eq!(scaled_byte(255.9, 0.0, 1.0), 255);
    }

    #[test]
    fn test_transpose_remaps_column_major_to_row_major() {
        // width 4, height 3; source column-major, values 0..11
        let data: Vec<i32> = (0..12).collect();
        let opts = ReduceOptions {
            range: Some(ValueRange::new(0.0, 255.0).unwrap()),
            transpose: true,
            ..ReduceOptions::new(4, 3)
        };
        let (out, _, _) = reduce(Samples::Int32(&data), &opts);
        for i in 0..3 {
            for j in 0..4 {
                assert_eq!(out[i * 4 + j] as usize, j * 3 + i);
            }
        }
    }

    #[test]
    fn test_invalid_sink_accumulates_across_calls() {
        let data = [0i16, 100];
        let opts = ReduceOptions {
            range: Some(ValueRange::new(10.0, 90.0).unwrap()),
            ..ReduceOptions::new(1, 2)
        };
        let mut out = Vec::new();
        let mut invalid = Vec::new();
        reduce_to_bytes(Samples::Int16(&data), &opts, &mut out, &mut invalid).unwrap();
        reduce_to_bytes(Samples::Int16(&data), &opts, &mut out, &mut invalid).unwrap();
        assert_eq!(invalid, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let data = [1i16, 2, 3];
        let mut out = Vec::new();
        let mut invalid = Vec::new();
        let err = reduce_to_bytes(
            Samples::Int16(&data),
            &ReduceOptions::new(2, 2),
            &mut out,
            &mut invalid,
        );
        assert!(matches!(
            err,
            Err(Error::DimensionMismatch { expected: 4, actual: 3 })
        ));
        assert!(
            reduce_to_bytes(Samples::Int16(&data), &ReduceOptions::new(0, 3), &mut out, &mut invalid)
                .is_err()
        );
    }

    #[test]
    fn test_int8_passthrough_without_conversion() {
        let data = [-1i8, 0, 1, 127];
        let (out, invalid, range) = reduce(Samples::Int8(&data), &ReduceOptions::new(2, 2));
        assert_eq!(out, vec![255, 0, 1, 127]);
        assert_eq!(range, FULL_BYTE_RANGE);
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_int8_transpose_only() {
        let data: Vec<i8> = (0..6).collect();
        let opts = ReduceOptions {
            transpose: true,
            ..ReduceOptions::new(3, 2)
        };
        let (out, _, _) = reduce(Samples::Int8(&data), &opts);
        // rows of the column-major 2x3 grid
        assert_eq!(out, vec![0, 2, 4, 1, 3, 5]);
    }

    #[test]
    fn test_int8_forced_conversion() {
        let data = [0i8, 10, 20, 30];
        let opts = ReduceOptions {
            force_convert: true,
            range: Some(ValueRange::new(10.0, 20.0).unwrap()),
            ..ReduceOptions::new(2, 2)
        };
        let (out, invalid, range) = reduce(Samples::Int8(&data), &opts);
        assert_eq!(range, ValueRange { min: 10.0, max: 20.0 });
        assert_eq!(out, vec![0, 0, 255, 0]);
        assert_eq!(invalid, vec![0, 3]);

        let opts = ReduceOptions {
            force_convert: true,
            ..ReduceOptions::new(2, 2)
        };
        let (out, _, range) = reduce(Samples::Int8(&data), &opts);
        assert_eq!(range, ValueRange { min: 0.0, max: 30.0 });
        assert_eq!(out, vec![0, 85, 170, 255]);
    }

    #[test]
    fn test_output_buffer_is_resized_and_reused() {
        let data = [1.0f64, 2.0];
        let mut out = Vec::with_capacity(128);
        out.extend_from_slice(&[9u8; 40]);
        let mut invalid = Vec::new();
        reduce_to_bytes(Samples::Float64(&data), &ReduceOptions::new(2, 1), &mut out, &mut invalid)
            .unwrap();
        assert_eq!(out, vec![0, 255]);
        assert!(out.capacity() >= 128);
    }

    #[test]
    fn test_display_array_shape() {
        let grid = to_display_array(vec![1, 2, 3, 4, 5, 6], 3, 2).unwrap();
        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid[(1, 0)], 4);
        assert!(to_display_array(vec![1, 2, 3], 2, 2).is_err());
    }
}

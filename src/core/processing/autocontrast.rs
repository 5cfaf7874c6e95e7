use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::processing::stats::{ValueRange, compute_statistics, find_min_max};
use crate::core::samples::{IntSample, SampleBuffer, Samples};
use crate::error::{Error, Result};
use crate::types::SampleKind;

pub const MAX_INT8: i64 = 127;
pub const MAX_UINT8: i64 = 255;
pub const MAX_INT16: i64 = 32767;
pub const MAX_UINT16: i64 = 65535;
pub const MAX_INT32: i64 = 2147483647;
pub const MAX_UINT32: i64 = 4294967295;
pub const MAX_INT64: i64 = i64::MAX;

/// Candidate windows narrower than this fall back to the exact min/max.
const MIN_DISCRIMINATING_SPAN: f64 = 10.0;

/// Fraction of the span added on each side before computing the gain.
const RANGE_PADDING: f64 = 0.1;

/// Linear gain/bias correction: `out = (in + bias) * gain`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContrastParams {
    pub gain: f64,
    pub bias: f64,
}

impl Default for ContrastParams {
    fn default() -> Self {
        Self {
            gain: 1.0,
            bias: 0.0,
        }
    }
}

/// Largest output value for an integer kind. Unsigned data is stored one kind
/// wider than declared, so its ceiling is the declared type's maximum.
pub fn max_data_value(kind: SampleKind, is_unsigned: bool) -> Result<i64> {
    match (kind, is_unsigned) {
        (SampleKind::Int8, _) => Ok(MAX_INT8),
        (SampleKind::Int16, false) => Ok(MAX_INT16),
        (SampleKind::Int16, true) => Ok(MAX_UINT8),
        (SampleKind::Int32, false) => Ok(MAX_INT32),
        (SampleKind::Int32, true) => Ok(MAX_UINT16),
        (SampleKind::Int64, false) => Ok(MAX_INT64),
        (SampleKind::Int64, true) => Ok(MAX_UINT32),
        (SampleKind::Float32 | SampleKind::Float64, _) => Err(Error::unsupported(kind)),
    }
}

/// Window of mean ± 3 standard deviations.
pub fn auto_contrast_compute_min_max(data: Samples<'_>) -> Result<ValueRange> {
    let stats = compute_statistics(data, None)?;
    Ok(ValueRange {
        min: stats.mean - 3.0 * stats.std_dev,
        max: stats.mean + 3.0 * stats.std_dev,
    })
}

/// Derive gain/bias for `data` from its distribution.
pub fn auto_contrast_compute(data: Samples<'_>, is_unsigned: bool) -> Result<ContrastParams> {
    let max_value = max_data_value(data.kind(), is_unsigned)? as f64;

    let range = match auto_contrast_compute_min_max(data) {
        Ok(r) if r.span() >= MIN_DISCRIMINATING_SPAN => r,
        Ok(r) => {
            debug!(
                "Auto-contrast window [{:.2}, {:.2}] too narrow - using exact min/max",
                r.min, r.max
            );
            find_min_max(data, None)?
        }
        Err(e) => {
            debug!("Auto-contrast statistics failed ({}) - using exact min/max", e);
            find_min_max(data, None)?
        }
    };

    if range.is_degenerate() {
        return Ok(ContrastParams::default());
    }

    // The 3-sigma window tends to overshoot, so pad outward to keep the gain in check.
    // Each padded end is only taken while it stays representable.
    let diff = range.span();
    let mut min = range.min;
    let mut max = range.max;
    let padded_max = max + diff * RANGE_PADDING;
    let padded_min = min - diff * RANGE_PADDING;
    if padded_max <= max_value {
        max = padded_max;
    }
    if padded_min >= 0.0 {
        min = padded_min;
    }

    let params = ContrastParams {
        gain: max_value / (max - min),
        bias: -min,
    };
    info!(
        "Auto-contrast: kind={}, unsigned={}, window=[{:.2}, {:.2}], gain={:.4}, bias={:.2}",
        data.kind(),
        is_unsigned,
        min,
        max,
        params.gain,
        params.bias
    );
    Ok(params)
}

fn apply_into<T: IntSample>(
    input: &[T],
    out: &mut Vec<T>,
    params: ContrastParams,
    clamp: Option<ValueRange>,
    max_out: f64,
) {
    let (lo, hi) = match clamp {
        Some(r) => (r.min, r.max),
        None => (f64::NEG_INFINITY, f64::INFINITY),
    };

    out.clear();
    out.extend(input.iter().map(|&v| {
        let value_in = v.to_f64().max(lo).min(hi);
        let value_out = ((value_in + params.bias) * params.gain).clamp(0.0, max_out);
        T::from_f64_truncating(value_out)
    }));
}

/// Apply `params` to every element. The output keeps the input's kind and length;
/// `reuse` lends its allocation when it has the same kind, otherwise a fresh buffer
/// is allocated.
pub fn auto_contrast_apply(
    input: Samples<'_>,
    params: ContrastParams,
    clamp: Option<ValueRange>,
    is_unsigned: bool,
    reuse: Option<SampleBuffer>,
) -> Result<SampleBuffer> {
    let max_out = max_data_value(input.kind(), is_unsigned)? as f64;

    let out = match (input, reuse) {
        (Samples::Int8(d), Some(SampleBuffer::Int8(mut v))) => {
            apply_into(d, &mut v, params, clamp, max_out);
            SampleBuffer::Int8(v)
        }
        (Samples::Int16(d), Some(SampleBuffer::Int16(mut v))) => {
            apply_into(d, &mut v, params, clamp, max_out);
            SampleBuffer::Int16(v)
        }
        (Samples::Int32(d), Some(SampleBuffer::Int32(mut v))) => {
            apply_into(d, &mut v, params, clamp, max_out);
            SampleBuffer::Int32(v)
        }
        (Samples::Int64(d), Some(SampleBuffer::Int64(mut v))) => {
            apply_into(d, &mut v, params, clamp, max_out);
            SampleBuffer::Int64(v)
        }
        (Samples::Int8(d), _) => {
            let mut v = Vec::with_capacity(d.len());
            apply_into(d, &mut v, params, clamp, max_out);
            SampleBuffer::Int8(v)
        }
        (Samples::Int16(d), _) => {
            let mut v = Vec::with_capacity(d.len());
            apply_into(d, &mut v, params, clamp, max_out);
            SampleBuffer::Int16(v)
        }
        (Samples::Int32(d), _) => {
            let mut v = Vec::with_capacity(d.len());
            apply_into(d, &mut v, params, clamp, max_out);
            SampleBuffer::Int32(v)
        }
        (Samples::Int64(d), _) => {
            let mut v = Vec::with_capacity(d.len());
            apply_into(d, &mut v, params, clamp, max_out);
            SampleBuffer::Int64(v)
        }
        (Samples::Float32(_) | Samples::Float64(_), _) => {
            return Err(Error::unsupported(input.kind()));
        }
    };
    Ok(out)
}

/// Reduce contrast-stretched integers to bytes by keeping the top eight
/// significant bits of the output range:
///
/// | kind  | unsigned (upgraded) | signed            |
/// |-------|---------------------|-------------------|
/// | Int8  | `x`                 | `(x & 0x7F) << 1` |
/// | Int16 | `x`                 | `(x >> 7) & 0xFF` |
/// | Int32 | `(x >> 8) & 0xFF`   | `(x >> 23) & 0xFF`|
/// | Int64 | `(x >> 24) & 0xFF`  | `(x >> 55) & 0xFF`|
pub fn auto_contrast_convert_image_buffer(
    src: Samples<'_>,
    dst: &mut [u8],
    is_unsigned: bool,
) -> Result<()> {
    if dst.len() != src.len() {
        return Err(Error::DimensionMismatch {
            expected: src.len(),
            actual: dst.len(),
        });
    }

    match src {
        Samples::Int8(s) => {
            for (d, &x) in dst.iter_mut().zip(s) {
                *d = if is_unsigned {
                    x as u8
                } else {
                    ((x & 0x7F) as u8) << 1
                };
            }
        }
        Samples::Int16(s) => {
            for (d, &x) in dst.iter_mut().zip(s) {
                *d = if is_unsigned { x as u8 } else { ((x >> 7) & 0xFF) as u8 };
            }
        }
        Samples::Int32(s) => {
            for (d, &x) in dst.iter_mut().zip(s) {
                *d = if is_unsigned {
                    ((x >> 8) & 0xFF) as u8
                } else {
                    ((x >> 23) & 0xFF) as u8
                };
            }
        }
        Samples::Int64(s) => {
            for (d, &x) in dst.iter_mut().zip(s) {
                *d = if is_unsigned {
                    ((x >> 24) & 0xFF) as u8
                } else {
                    ((x >> 55) & 0xFF) as u8
                };
            }
        }
        Samples::Float32(_) | Samples::Float64(_) => {
            return Err(Error::unsupported(src.kind()));
        }
    }
    Ok(())
}

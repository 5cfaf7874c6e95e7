use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::samples::{Sample, Samples};
use crate::error::{Error, Result};

/// Closed value interval used to rescale samples into `[0, 255]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(Error::InvalidArgument {
                arg: "range",
                value: format!("[{}, {}]", min, max),
            });
        }
        Ok(Self { min, max })
    }

    /// A range with `min == max` carries no scale; callers treat it as unset.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Mean and sample standard deviation over the valid points of an array.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Statistics {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

#[inline]
fn is_excluded<T: Sample>(v: T, fill: Option<f64>) -> bool {
    v.is_nan_inf() || fill.is_some_and(|f| v.to_f64() == f)
}

fn min_max_of<T: Sample>(data: &[T], fill: Option<f64>) -> Result<ValueRange> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;

    for &v in data {
        if is_excluded(v, fill) {
            continue;
        }
        let x = v.to_f64();
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
        seen = true;
    }

    if !seen {
        return Err(Error::EmptyRange);
    }
    Ok(ValueRange { min, max })
}

fn statistics_of<T: Sample>(data: &[T], fill: Option<f64>) -> Result<Statistics> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    // First pass: sum and count of valid points
    let mut sum = 0.0_f64;
    let mut count = 0usize;
    for &v in data {
        if is_excluded(v, fill) {
            continue;
        }
        sum += v.to_f64();
        count += 1;
    }

    if count == 0 {
        return Err(Error::EmptyRange);
    }
    let mean = sum / count as f64;
    if count == 1 {
        return Ok(Statistics {
            mean,
            std_dev: 0.0,
            count,
        });
    }

    // Second pass: squared deviations from the mean
    let mut var = 0.0_f64;
    for &v in data {
        if is_excluded(v, fill) {
            continue;
        }
        let diff = v.to_f64() - mean;
        var += diff * diff;
    }

    Ok(Statistics {
        mean,
        std_dev: (var / (count - 1) as f64).sqrt(),
        count,
    })
}

fn data_dist_of<T: Sample>(data: &[T], range: ValueRange, hist: &mut [usize]) {
    let delta = if range.is_degenerate() {
        1.0
    } else {
        (hist.len() - 1) as f64 / range.span()
    };

    for &v in data {
        let x = v.to_f64();
        // Out-of-range and NaN values are not counted
        if range.contains(x) {
            let idx = ((x - range.min) * delta) as usize;
            hist[idx.min(hist.len() - 1)] += 1;
        }
    }
}

/// Tightest range over the values that are neither `fill` nor NaN/Inf.
pub fn find_min_max(data: Samples<'_>, fill: Option<f64>) -> Result<ValueRange> {
    trace!("find_min_max kind={} len={}", data.kind(), data.len());
    match data {
        Samples::Int8(d) => min_max_of(d, fill),
        Samples::Int16(d) => min_max_of(d, fill),
        Samples::Int32(d) => min_max_of(d, fill),
        Samples::Int64(d) => min_max_of(d, fill),
        Samples::Float32(d) => min_max_of(d, fill),
        Samples::Float64(d) => min_max_of(d, fill),
    }
}

/// Two-pass mean / standard deviation (n-1 denominator), skipping `fill` and NaN/Inf.
pub fn compute_statistics(data: Samples<'_>, fill: Option<f64>) -> Result<Statistics> {
    trace!("compute_statistics kind={} len={}", data.kind(), data.len());
    match data {
        Samples::Int8(d) => statistics_of(d, fill),
        Samples::Int16(d) => statistics_of(d, fill),
        Samples::Int32(d) => statistics_of(d, fill),
        Samples::Int64(d) => statistics_of(d, fill),
        Samples::Float32(d) => statistics_of(d, fill),
        Samples::Float64(d) => statistics_of(d, fill),
    }
}

/// Histogram of `data` over `range` with `bucket_count` linear buckets.
/// Values outside `range` are dropped rather than clamped into the edge buckets.
pub fn find_data_dist(
    data: Samples<'_>,
    range: ValueRange,
    bucket_count: usize,
) -> Result<Vec<usize>> {
    if bucket_count == 0 {
        return Err(Error::InvalidArgument {
            arg: "bucket_count",
            value: bucket_count.to_string(),
        });
    }

    let mut hist = vec![0usize; bucket_count];
    match data {
        Samples::Int8(d) => data_dist_of(d, range, &mut hist),
        Samples::Int16(d) => data_dist_of(d, range, &mut hist),
        Samples::Int32(d) => data_dist_of(d, range, &mut hist),
        Samples::Int64(d) => data_dist_of(d, range, &mut hist),
        Samples::Float32(d) => data_dist_of(d, range, &mut hist),
        Samples::Float64(d) => data_dist_of(d, range, &mut hist),
    }
    Ok(hist)
}

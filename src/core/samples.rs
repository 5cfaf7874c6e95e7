//! Typed sample arrays.
//!
//! `Samples`, `SamplesMut` and `SampleBuffer` are closed tagged unions over the six
//! supported element kinds. Numeric behaviour per kind comes from the `Sample` and
//! `IntSample` traits; callers match once at the boundary and hand a concrete slice
//! to a generic routine.
use std::fmt::Debug;

use crate::types::SampleKind;

pub trait Sample: Copy + PartialEq + PartialOrd + Debug + Default {
    const KIND: SampleKind;

    fn to_f64(self) -> f64;

    fn is_nan_inf(self) -> bool {
        false
    }
}

/// Integer element kinds; the operands of bitmasks and auto-contrast.
pub trait IntSample: Sample {
    const BITS: u32;
    const MAX: i64;

    /// Sign-extending widen
    fn to_i64(self) -> i64;

    /// Two's complement truncation to the element width
    fn from_i64_wrapping(v: i64) -> Self;

    /// Truncation toward zero, saturating at the element bounds
    fn from_f64_truncating(v: f64) -> Self;
}

macro_rules! impl_int_sample {
    ($t:ty, $kind:expr) => {
        impl Sample for $t {
            const KIND: SampleKind = $kind;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }

        impl IntSample for $t {
            const BITS: u32 = <$t>::BITS;
            const MAX: i64 = <$t>::MAX as i64;

            #[inline]
            fn to_i64(self) -> i64 {
                self as i64
            }

            #[inline]
            fn from_i64_wrapping(v: i64) -> Self {
                v as $t
            }

            #[inline]
            fn from_f64_truncating(v: f64) -> Self {
                v as $t
            }
        }
    };
}

impl_int_sample!(i8, SampleKind::Int8);
impl_int_sample!(i16, SampleKind::Int16);
impl_int_sample!(i32, SampleKind::Int32);
impl_int_sample!(i64, SampleKind::Int64);

impl Sample for f32 {
    const KIND: SampleKind = SampleKind::Float32;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn is_nan_inf(self) -> bool {
        !self.is_finite()
    }
}

impl Sample for f64 {
    const KIND: SampleKind = SampleKind::Float64;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn is_nan_inf(self) -> bool {
        !self.is_finite()
    }
}

/// Read-only view of a typed sample array
#[derive(Copy, Clone, Debug)]
pub enum Samples<'a> {
    Int8(&'a [i8]),
    Int16(&'a [i16]),
    Int32(&'a [i32]),
    Int64(&'a [i64]),
    Float32(&'a [f32]),
    Float64(&'a [f64]),
}

impl<'a> Samples<'a> {
    pub fn kind(&self) -> SampleKind {
        match self {
            Samples::Int8(_) => SampleKind::Int8,
            Samples::Int16(_) => SampleKind::Int16,
            Samples::Int32(_) => SampleKind::Int32,
            Samples::Int64(_) => SampleKind::Int64,
            Samples::Float32(_) => SampleKind::Float32,
            Samples::Float64(_) => SampleKind::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Samples::Int8(d) => d.len(),
            Samples::Int16(d) => d.len(),
            Samples::Int32(d) => d.len(),
            Samples::Int64(d) => d.len(),
            Samples::Float32(d) => d.len(),
            Samples::Float64(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `idx` widened to f64, if in bounds
    pub fn get_f64(&self, idx: usize) -> Option<f64> {
        match self {
            Samples::Int8(d) => d.get(idx).map(|v| v.to_f64()),
            Samples::Int16(d) => d.get(idx).map(|v| v.to_f64()),
            Samples::Int32(d) => d.get(idx).map(|v| v.to_f64()),
            Samples::Int64(d) => d.get(idx).map(|v| v.to_f64()),
            Samples::Float32(d) => d.get(idx).map(|v| v.to_f64()),
            Samples::Float64(d) => d.get(idx).map(|v| v.to_f64()),
        }
    }
}

/// Mutable view of a typed sample array
#[derive(Debug)]
pub enum SamplesMut<'a> {
    Int8(&'a mut [i8]),
    Int16(&'a mut [i16]),
    Int32(&'a mut [i32]),
    Int64(&'a mut [i64]),
    Float32(&'a mut [f32]),
    Float64(&'a mut [f64]),
}

impl<'a> SamplesMut<'a> {
    pub fn kind(&self) -> SampleKind {
        match self {
            SamplesMut::Int8(_) => SampleKind::Int8,
            SamplesMut::Int16(_) => SampleKind::Int16,
            SamplesMut::Int32(_) => SampleKind::Int32,
            SamplesMut::Int64(_) => SampleKind::Int64,
            SamplesMut::Float32(_) => SampleKind::Float32,
            SamplesMut::Float64(_) => SampleKind::Float64,
        }
    }
}

/// Owned typed sample array
#[derive(Clone, Debug, PartialEq)]
pub enum SampleBuffer {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl SampleBuffer {
    /// Zero-filled buffer of `len` elements
    pub fn zeros(kind: SampleKind, len: usize) -> Self {
        match kind {
            SampleKind::Int8 => SampleBuffer::Int8(vec![0; len]),
            SampleKind::Int16 => SampleBuffer::Int16(vec![0; len]),
            SampleKind::Int32 => SampleBuffer::Int32(vec![0; len]),
            SampleKind::Int64 => SampleBuffer::Int64(vec![0; len]),
            SampleKind::Float32 => SampleBuffer::Float32(vec![0.0; len]),
            SampleKind::Float64 => SampleBuffer::Float64(vec![0.0; len]),
        }
    }

    pub fn kind(&self) -> SampleKind {
        self.as_samples().kind()
    }

    pub fn len(&self) -> usize {
        self.as_samples().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_samples(&self) -> Samples<'_> {
        match self {
            SampleBuffer::Int8(v) => Samples::Int8(v),
            SampleBuffer::Int16(v) => Samples::Int16(v),
            SampleBuffer::Int32(v) => Samples::Int32(v),
            SampleBuffer::Int64(v) => Samples::Int64(v),
            SampleBuffer::Float32(v) => Samples::Float32(v),
            SampleBuffer::Float64(v) => Samples::Float64(v),
        }
    }

    pub fn as_samples_mut(&mut self) -> SamplesMut<'_> {
        match self {
            SampleBuffer::Int8(v) => SamplesMut::Int8(v),
            SampleBuffer::Int16(v) => SamplesMut::Int16(v),
            SampleBuffer::Int32(v) => SamplesMut::Int32(v),
            SampleBuffer::Int64(v) => SamplesMut::Int64(v),
            SampleBuffer::Float32(v) => SamplesMut::Float32(v),
            SampleBuffer::Float64(v) => SamplesMut::Float64(v),
        }
    }
}

impl From<Vec<i8>> for SampleBuffer {
    fn from(v: Vec<i8>) -> Self {
        SampleBuffer::Int8(v)
    }
}

impl From<Vec<i16>> for SampleBuffer {
    fn from(v: Vec<i16>) -> Self {
        SampleBuffer::Int16(v)
    }
}

impl From<Vec<i32>> for SampleBuffer {
    fn from(v: Vec<i32>) -> Self {
        SampleBuffer::Int32(v)
    }
}

impl From<Vec<i64>> for SampleBuffer {
    fn from(v: Vec<i64>) -> Self {
        SampleBuffer::Int64(v)
    }
}

impl From<Vec<f32>> for SampleBuffer {
    fn from(v: Vec<f32>) -> Self {
        SampleBuffer::Float32(v)
    }
}

impl From<Vec<f64>> for SampleBuffer {
    fn from(v: Vec<f64>) -> Self {
        SampleBuffer::Float64(v)
    }
}

impl<'a> From<&'a [i8]> for Samples<'a> {
    fn from(v: &'a [i8]) -> Self {
        Samples::Int8(v)
    }
}

impl<'a> From<&'a [i16]> for Samples<'a> {
    fn from(v: &'a [i16]) -> Self {
        Samples::Int16(v)
    }
}

impl<'a> From<&'a [i32]> for Samples<'a> {
    fn from(v: &'a [i32]) -> Self {
        Samples::Int32(v)
    }
}

impl<'a> From<&'a [i64]> for Samples<'a> {
    fn from(v: &'a [i64]) -> Self {
        Samples::Int64(v)
    }
}

impl<'a> From<&'a [f32]> for Samples<'a> {
    fn from(v: &'a [f32]) -> Self {
        Samples::Float32(v)
    }
}

impl<'a> From<&'a [f64]> for Samples<'a> {
    fn from(v: &'a [f64]) -> Self {
        Samples::Float64(v)
    }
}

impl<'a> From<&'a mut [i8]> for SamplesMut<'a> {
    fn from(v: &'a mut [i8]) -> Self {
        SamplesMut::Int8(v)
    }
}

impl<'a> From<&'a mut [i16]> for SamplesMut<'a> {
    fn from(v: &'a mut [i16]) -> Self {
        SamplesMut::Int16(v)
    }
}

impl<'a> From<&'a mut [i32]> for SamplesMut<'a> {
    fn from(v: &'a mut [i32]) -> Self {
        SamplesMut::Int32(v)
    }
}

impl<'a> From<&'a mut [i64]> for SamplesMut<'a> {
    fn from(v: &'a mut [i64]) -> Self {
        SamplesMut::Int64(v)
    }
}

impl<'a> From<&'a mut [f32]> for SamplesMut<'a> {
    fn from(v: &'a mut [f32]) -> Self {
        SamplesMut::Float32(v)
    }
}

impl<'a> From<&'a mut [f64]> for SamplesMut<'a> {
    fn from(v: &'a mut [f64]) -> Self {
        SamplesMut::Float64(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_views_agree_on_kind_and_len() {
        let buf = SampleBuffer::from(vec![1i32, 2, 3]);
        assert_eq!(buf.kind(), SampleKind::Int32);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_samples().get_f64(2), Some(3.0));
        assert_eq!(buf.as_samples().get_f64(3), None);
    }

    #[test]
    fn test_float_nan_inf_detection() {
        assert!(f32::NAN.is_nan_inf());
        assert!(f64::INFINITY.is_nan_inf());
        assert!(f64::NEG_INFINITY.is_nan_inf());
        assert!(!1.5f64.is_nan_inf());
        assert!(!i16::MAX.is_nan_inf());
    }

    #[test]
    fn test_int_truncation_helpers() {
        assert_eq!(i8::from_i64_wrapping(0x1FF), -1);
        assert_eq!(i16::from_f64_truncating(254.9), 254);
        assert_eq!(i8::from_f64_truncating(1e9), i8::MAX);
        assert_eq!((-5i8).to_i64(), -5);
        assert_eq!(<i32 as IntSample>::MAX, i32::MAX as i64);
    }
}

//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Semantic variants cover the conversion failures (empty ranges, unsupported
//! element types, dimension mismatches); I/O and encoder errors are converted.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF encoder error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("JPEG encoder error: {0}")]
    Jpeg(#[from] jpeg_encoder::EncodingError),

    #[error("Preset error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input sample array is empty")]
    EmptyInput,

    #[error("No valid samples remain after excluding fill values and NaN/Inf")]
    EmptyRange,

    #[error("Unsupported element type: {kind}")]
    UnsupportedType { kind: String },

    #[error("Dimension mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },
}

impl Error {
    pub fn unsupported<K: std::fmt::Display>(kind: K) -> Self {
        Error::UnsupportedType {
            kind: kind.to_string(),
        }
    }
}

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("--min and --max must be given together")]
    HalfRange,

    #[error("Invalid display range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Conversion(#[from] sampleview::Error),
}

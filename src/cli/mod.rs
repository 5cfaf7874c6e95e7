//! Command line interface for sampleview.
//!
//! `args` defines the flags, `errors` the CLI-level failures and `runner`
//! turns the flags into `ConversionParams` and dispatches to single-file or
//! batch conversion through `sampleview::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;

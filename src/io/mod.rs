//! I/O layer: raw binary sample files in and grayscale images out.
pub mod binary;
pub use binary::{read_samples_file, read_samples_into, write_samples};

pub mod writers;

pub mod autocontrast;
pub mod bitmask;
pub mod pipeline;
pub mod reduce;
pub mod stats;

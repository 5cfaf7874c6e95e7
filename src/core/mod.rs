//! Core conversion building blocks: typed sample arrays, statistics,
//! auto-contrast, byte reduction, bitmasks and the display pipeline. These are
//! the primitives consumed by the high-level `api` module.
pub mod params;
pub mod processing;
pub mod samples;

#![doc = r#"
sampleview: turn raw numeric sample grids into 8-bit grayscale images.

The crate reads flat binary arrays of signed/unsigned integers or floats, computes
their statistics, and maps them onto the 0..=255 display range, either linearly
against a data or user window or through a mean±3σ auto-contrast stretch. Integer
data can first be reduced to selected bit fields with a bitmask. Results are kept
in memory as a `DisplayFrame` or written as grayscale TIFF/JPEG.

Unsigned types
--------------
Samples are held in signed kinds only. Unsigned inputs are widened on load
(`u8` to `i16`, `u16` to `i32`, `u32` to `i64`) and carried with an
`is_unsigned` flag; `u64` is rejected.

Quick start: convert a file to an image
---------------------------------------
```rust,no_run
use std::path::Path;
use sampleview::{convert_file_to_path, ConversionParams, DataType, OutputFormat};

fn main() -> sampleview::Result<()> {
    let mut params = ConversionParams::default();
    params.data_type = DataType::U16;
    params.format = OutputFormat::TIFF;
    params.display.width = 1024;
    params.display.height = 768;
    params.display.auto_contrast = true;

    let frame = convert_file_to_path(
        Path::new("/data/scan.u16"),
        Path::new("/out/scan.tiff"),
        &params,
    )?;
    println!("window [{}, {}]", frame.range.min, frame.range.max);
    Ok(())
}
```

Working on in-memory samples
----------------------------
```rust
use sampleview::{find_min_max, reduce_to_bytes, ReduceOptions, Samples};

fn main() -> sampleview::Result<()> {
    let data = [0i32, 50, -9999, 100];
    let fill = [-9999.0];
    let range = find_min_max(Samples::Int32(&data), Some(-9999.0))?;
    assert_eq!((range.min, range.max), (0.0, 100.0));

    let mut opts = ReduceOptions::new(2, 2);
    opts.fill_values = &fill;
    let (mut bytes, mut invalid) = (Vec::new(), Vec::new());
    reduce_to_bytes(Samples::Int32(&data), &opts, &mut bytes, &mut invalid)?;
    assert_eq!(invalid, vec![2]);
    Ok(())
}
```

Error handling
--------------
All public functions return `sampleview::Result<T>`; match on `sampleview::Error`:

```rust,no_run
use std::path::Path;
use sampleview::{convert_file_to_buffer, ConversionParams, Error};

fn main() {
    match convert_file_to_buffer(Path::new("/bad/input.bin"), &ConversionParams::default()) {
        Ok(frame) => println!("{} bytes", frame.bytes.len()),
        Err(Error::DimensionMismatch { expected, actual }) => {
            eprintln!("grid needs {expected} samples, file has {actual}")
        }
        Err(Error::Io(e)) => eprintln!("I/O error: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level file conversion entry points.
- [`core`]: sample containers, statistics, auto-contrast, byte reduction and bitmasks.
- [`types`]: element kinds, declared data types and option enums.
- [`io`]: binary sample readers/writers and image writers.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::params::{ConversionParams, DisplayParams};
pub use core::samples::{Sample, SampleBuffer, Samples, SamplesMut};
pub use error::{Error, Result};
pub use types::{BitmaskOp, ByteOrder, DataType, OutputFormat, SampleKind};

// Processing
pub use core::processing::autocontrast::{
    ContrastParams, auto_contrast_apply, auto_contrast_compute, auto_contrast_compute_min_max,
    auto_contrast_convert_image_buffer,
};
pub use core::processing::bitmask::{BitMask, apply_bitmask, to_binary_string, to_hex_string};
pub use core::processing::pipeline::{DisplayFrame, render_display_bytes};
pub use core::processing::reduce::{ReduceOptions, reduce_to_bytes, to_display_array};
pub use core::processing::stats::{
    Statistics, ValueRange, compute_statistics, find_data_dist, find_min_max,
};

// High-level API re-exports
pub use api::{
    BatchReport, convert_directory_to_path, convert_file_to_buffer, convert_file_to_path,
    load_preset,
};

//! High-level library API: convert raw sample files to display frames in memory
//! or straight to TIFF/JPEG files, plus a directory batch helper. Prefer these
//! entrypoints over the low-level processing modules when embedding the crate.
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::params::ConversionParams;
use crate::core::processing::pipeline::{DisplayFrame, render_display_bytes};
use crate::error::{Error, Result};
use crate::io::binary::read_samples_file;
use crate::io::writers::{write_gray_jpeg, write_gray_tiff};
use crate::types::OutputFormat;

/// Read `path` as `params.data_type` samples and render it.
///
/// The declared type decides the unsigned flag; any `is_unsigned` value in
/// `params.display` is overridden.
pub fn convert_file_to_buffer(path: &Path, params: &ConversionParams) -> Result<DisplayFrame> {
    let (mut buffer, is_unsigned) = read_samples_file(path, params.data_type, params.byte_order)?;
    let mut display = params.display.clone();
    display.is_unsigned = is_unsigned;
    render_display_bytes(&mut buffer, &display)
}

/// Convert `input` and write the frame to `output` in `params.format`.
pub fn convert_file_to_path(
    input: &Path,
    output: &Path,
    params: &ConversionParams,
) -> Result<DisplayFrame> {
    let frame = convert_file_to_buffer(input, params)?;
    match params.format {
        OutputFormat::TIFF => write_gray_tiff(output, frame.width, frame.height, &frame.bytes)?,
        OutputFormat::JPEG => write_gray_jpeg(output, frame.width, frame.height, &frame.bytes)?,
    }
    info!("Saved {:?} ({}x{})", output, frame.width, frame.height);
    Ok(frame)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Regular files directly under `input_dir`, sorted by name.
pub fn iterate_sample_files(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files.into_iter())
}

/// Convert every sample file in `input_dir` into `output_dir`.
///
/// Files whose size does not match `width * height` elements of the declared
/// type are skipped. Output names keep the input file stem.
pub fn convert_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    params: &ConversionParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)?;
    let expected_bytes = params
        .display
        .width
        .checked_mul(params.display.height)
        .and_then(|n| n.checked_mul(params.data_type.file_size_in_bytes()))
        .ok_or_else(|| Error::InvalidArgument {
            arg: "dimensions",
            value: format!("{}x{}", params.display.width, params.display.height),
        })?;

    let mut report = BatchReport::default();
    for path in iterate_sample_files(input_dir)? {
        let len = std::fs::metadata(&path)?.len();
        if len != expected_bytes as u64 {
            warn!("Skipping {:?}: {} bytes, expected {}", path, len, expected_bytes);
            report.skipped += 1;
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let output_path = output_dir.join(format!("{}.{}", stem, params.format.extension()));

        match convert_file_to_path(&path, &output_path, params) {
            Ok(_) => report.processed += 1,
            Err(e) => {
                report.errors += 1;
                warn!("Failed to convert {:?}: {}", path, e);
                if !continue_on_error {
                    return Err(e);
                }
            }
        }
    }

    info!(
        "Batch done: processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(report)
}

/// Load a JSON conversion preset from disk.
pub fn load_preset(path: &Path) -> Result<ConversionParams> {
    let json = std::fs::read_to_string(path)?;
    ConversionParams::from_json(&json)
}

use std::fs;
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::errors::AppError;
use sampleview::api::{convert_directory_to_path, convert_file_to_path, load_preset};
use sampleview::core::processing::bitmask::BitMask;
use sampleview::core::processing::stats::ValueRange;
use sampleview::ConversionParams;

/// Preset (or defaults) with command line flags layered on top.
pub fn build_params(args: &CliArgs) -> Result<ConversionParams, AppError> {
    let mut params = match &args.preset {
        Some(path) => load_preset(path)?,
        None => ConversionParams::default(),
    };

    if let Some(t) = args.data_type {
        params.data_type = t;
    }
    if let Some(order) = args.byte_order {
        params.byte_order = order;
    }
    if let Some(format) = args.format {
        params.format = format;
    }

    let display = &mut params.display;
    if let Some(w) = args.width {
        display.width = w;
    }
    if let Some(h) = args.height {
        display.height = h;
    }
    match (args.min, args.max) {
        (Some(min), Some(max)) => {
            display.range = Some(
                ValueRange::new(min, max).map_err(|_| AppError::InvalidRange { min, max })?,
            );
        }
        (None, None) => {}
        _ => return Err(AppError::HalfRange),
    }
    if !args.fill_values.is_empty() {
        display.fill_values = args.fill_values.clone();
    }
    display.transpose |= args.transpose;
    display.force_convert |= args.force_convert;
    display.auto_contrast |= args.auto_contrast;
    if !args.bits.is_empty() {
        display.bitmask = Some(BitMask::from_positions(args.bits.iter().copied())?);
    }
    if let Some(op) = args.bitmask_op {
        display.bitmask_op = op;
    }

    if display.width == 0 {
        return Err(AppError::MissingArgument {
            arg: "--width".to_string(),
        });
    }
    if display.height == 0 {
        return Err(AppError::MissingArgument {
            arg: "--height".to_string(),
        });
    }
    Ok(params)
}

fn convert_single_file(
    input: &Path,
    output: &Path,
    params: &ConversionParams,
) -> Result<(), AppError> {
    let frame = convert_file_to_path(input, output, params)?;
    info!(
        "Display window [{}, {}], {} invalid samples",
        frame.range.min,
        frame.range.max,
        frame.invalid_indices.len()
    );
    if let Some(gb) = frame.contrast {
        info!("Auto-contrast gain={:.4} bias={:.4}", gb.gain, gb.bias);
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init();
    }

    let params = build_params(&args)?;
    let batch_mode = args.batch || args.input_dir.is_some();

    if batch_mode {
        let input_dir = args.input_dir.ok_or(AppError::MissingArgument {
            arg: "--input-dir".to_string(),
        })?;
        let output_dir = args.output_dir.ok_or(AppError::MissingArgument {
            arg: "--output-dir".to_string(),
        })?;

        fs::create_dir_all(&output_dir)?;
        info!("Starting batch conversion from directory: {:?}", input_dir);
        info!("Output directory: {:?}", output_dir);

        let report = convert_directory_to_path(&input_dir, &output_dir, &params, true)?;
        info!("Batch conversion complete!");
        info!("Processed: {}", report.processed);
        info!("Skipped: {}", report.skipped);
        info!("Errors: {}", report.errors);
    } else {
        let input = args.input.ok_or(AppError::MissingArgument {
            arg: "--input".to_string(),
        })?;
        let output = match args.output {
            Some(o) => o,
            None => input.with_extension(params.format.extension()),
        };

        convert_single_file(&input, &output, &params)?;
        info!("Successfully converted: {:?} -> {:?}", input, output);
    }

    Ok(())
}

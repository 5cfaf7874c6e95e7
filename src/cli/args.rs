use clap::Parser;
use std::path::PathBuf;

use sampleview::types::{BitmaskOp, ByteOrder, DataType, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "sampleview",
    version,
    about = "Render raw numeric sample files as 8-bit grayscale images"
)]
pub struct CliArgs {
    /// Input raw sample file (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input directory of raw sample files (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output image (single file mode)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output directory (batch mode)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// JSON preset with conversion parameters; flags below override it
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Grid width in elements
    #[arg(short = 'W', long)]
    pub width: Option<usize>,

    /// Grid height in elements
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Declared element type of the input
    #[arg(short = 't', long, value_enum)]
    pub data_type: Option<DataType>,

    /// Byte order of the input
    #[arg(long, value_enum)]
    pub byte_order: Option<ByteOrder>,

    /// Output format (tiff or jpeg)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Lower end of a fixed display window
    #[arg(long, allow_hyphen_values = true)]
    pub min: Option<f64>,

    /// Upper end of a fixed display window
    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<f64>,

    /// Fill value rendered as invalid; may be repeated
    #[arg(long = "fill", allow_hyphen_values = true)]
    pub fill_values: Vec<f64>,

    /// Input is column-major; write row-major output
    #[arg(long, default_value_t = false)]
    pub transpose: bool,

    /// Rescale int8 data instead of passing it through
    #[arg(long, default_value_t = false)]
    pub force_convert: bool,

    /// Stretch integer data with mean±3σ auto-contrast
    #[arg(long, default_value_t = false)]
    pub auto_contrast: bool,

    /// Bit positions to select before display, e.g. `--bits 2,3,4`
    #[arg(long, value_delimiter = ',')]
    pub bits: Vec<u32>,

    /// How selected bits are combined
    #[arg(long, value_enum)]
    pub bitmask_op: Option<BitmaskOp>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Batch mode: keep going when a file fails
    #[arg(long, default_value_t = false)]
    pub batch: bool,
}

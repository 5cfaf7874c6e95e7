//! sampleview CLI entrypoint.
//!
//! Thin wrapper over the `cli` module: parse args, dispatch to single-file or
//! batch conversion, and exit with the appropriate status.
//! For programmatic use, prefer the library API (`sampleview::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}

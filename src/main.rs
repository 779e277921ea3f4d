//! s2ndvi CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, build and
//! export the requested product, and exit with appropriate status.
//! For programmatic use, prefer the library API (`s2ndvi::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}

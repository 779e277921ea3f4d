//! Command Line Interface (CLI) layer for s2ndvi.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that turns flags into request
//! parameters and an export region, then either prints the serialized
//! request (`--dry-run`) or submits it and inspects the written raster.
//!
//! If you are embedding s2ndvi into another application, prefer using
//! the high-level `s2ndvi::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;

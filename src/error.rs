//! Crate-level error type and `Result` alias.
//! Converts underlying I/O, GDAL, HTTP and JSON errors, and provides semantic
//! variants for argument validation and remote service failures. The remote
//! service owns its own failure modes; they surface here unchanged as
//! `Service` or `Http`.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] crate::io::GdalError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date: {0}")]
    Date(#[from] chrono::ParseError),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    #[error("Processing error: {0}")]
    Processing(String),
}

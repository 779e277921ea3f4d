use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid scale: {scale}. Must be a positive number of meters per pixel")]
    InvalidScale { scale: f64 },

    #[error("Invalid {arg} value '{value}': {reason}")]
    InvalidCoordinates {
        arg: &'static str,
        value: String,
        reason: String,
    },

    #[error("Missing required argument: {arg}")]
    MissingArgument { arg: String },

    #[error("Region file {path} contains no features")]
    EmptyRegion { path: String },

    #[error(transparent)]
    Library(#[from] s2ndvi::Error),
}

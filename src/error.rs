use std::io;
use thiserror::Error;
use url;

/// Error types for the application.
///
/// Splits the failure modes into two families:
/// - recoverable prompt errors (invalid identifier, out-of-range selection,
///   bad directory) that the interaction loop prints and retries
/// - fatal provider/transfer errors that propagate to the top level

/// Represents all possible errors that can occur in the application.
///
/// # Error Categories
///
/// - IO: File system operations
/// - InvalidIdentifier / OutOfRange / Directory: prompt validation failures
/// - Provider / Transfer: stream provider and download failures
/// - Custom: Application-specific errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    InvalidIdentifier(String),

    #[error(
        "Invalid # selected. Make sure you select a valid number from the # column of the above table"
    )]
    OutOfRange { chosen: usize, count: usize },

    #[error("{0}")]
    Directory(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Manifest parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

impl From<&str> for AppError {
    fn from(error: &str) -> Self {
        AppError::Custom(error.to_string())
    }
}

impl From<String> for AppError {
    fn from(error: String) -> Self {
        AppError::Custom(error)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

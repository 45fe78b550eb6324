//! Error type for report parsing

use thiserror::Error;

/// Shared error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Invalid report: {0}")]
    Invalid(String),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;

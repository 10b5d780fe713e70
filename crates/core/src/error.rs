use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised at the edges of the version engine (parsing, record files).
///
/// The engine's own operations are total; these only surface from the
/// explicitly fallible helpers.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed version list: {0}")]
    MalformedList(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown versioned field: {0}")]
    UnknownField(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = StdResult<T, VersionError>;

//! Error type shared by every fallible operation in `ldsync-core`.
//!
//! Structural problems with a payload (`MalformedPayload`) and rejected logins
//! (`Authentication`) abort a run before any data is written remotely. A rejected
//! import surfaces as `ImportRejected` only after the outgoing payload was preserved.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("remote error: {0}")]
    Remote(String),

    #[error("import rejected: {message}{}", artifact_suffix(.artifact))]
    ImportRejected {
        message: String,
        artifact: Option<PathBuf>,
    },

    #[error("duplicate field `{0}` in field list")]
    DuplicateField(String),

    #[error("column mismatch on line {line}: expected {expected} columns, found {found}")]
    ColumnMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

fn artifact_suffix(artifact: &Option<PathBuf>) -> String {
    match artifact {
        Some(path) => format!(" (payload preserved at {})", path.display()),
        None => " (payload could not be preserved)".to_string(),
    }
}

impl Error {
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedPayload(message.into())
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Error::Remote(message.into())
    }
}

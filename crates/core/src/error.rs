use thiserror::Error;

/// Errors from parsing core domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid level: {0} (expected one of N5, N4, N3, N2, N1 or \"all\")")]
    InvalidLevel(String),

    #[error("invalid sort key: {0} (expected original, title, level or id)")]
    InvalidSortKey(String),

    #[error("invalid content kind: {0}")]
    InvalidContentKind(String),
}

/// Text did not contain JSON that could be recovered.
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error("empty reply")]
    Empty,

    #[error("reply contains no JSON object or array")]
    NoJson,

    #[error("JSON span never closes (truncated reply)")]
    Unbalanced,

    #[error("invalid JSON: {0}")]
    Invalid(#[source] serde_json::Error),
}

/// A generated payload could not be used.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("parse failure: {0}")]
    Parse(#[from] ParseFailure),

    /// JSON parsed but required fields are missing or inconsistent.
    #[error("validation failure: {0}")]
    Validation(String),
}

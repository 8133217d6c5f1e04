//! Typed error enum for the storage layer.
//!
//! Only opening the persistent cache can fail; cache reads and writes log and
//! degrade to misses instead of returning these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// SQL or connection failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Creating the database directory failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored payload could not be decoded.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    #[error("database lock poisoned")]
    LockPoisoned,
}

//! The error taxonomy shared by the repository and the analytics engine.
use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// The errors the core may report.
///
/// "Nothing matched" is not an error for lookups: those return `Option`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database file could not be opened, created, or its schema is not
    /// the one this program expects. Fatal at startup.
    #[error("could not open the transaction store at {}: {reason}", .path.display())]
    StorageUnavailable { path: PathBuf, reason: String },

    /// A single read or write failed. The store is still usable.
    #[error("storage operation failed: {0}")]
    StorageOperationFailed(#[from] rusqlite::Error),

    /// The caller supplied a record or parameter that breaks a field
    /// constraint. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An update targeted an ID that has no row.
    #[error("no transaction with ID {0}")]
    NotFound(i64),
}

/// Field constraints checked before touching storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("category cannot be empty")]
    EmptyCategory,

    /// Updates are keyed by ID, so a record that was never stored cannot be
    /// updated.
    #[error("transaction has no ID; store it before updating")]
    MissingId,

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

//! Core data types for numbers, messages, and errors.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A disposable phone line, either scraped from the listing page or
/// loaded from the local registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Number {
    /// Country name as shown on the listing.
    pub country: String,
    /// Phone number including the leading `+`. Identifies the entry.
    pub number: String,
    /// Local time the number was scraped, `%Y-%m-%d %H:%M:%S %A`.
    pub created_at: String,
}

impl Number {
    pub fn new(
        country: impl Into<String>,
        number: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            number: number.into(),
            created_at: created_at.into(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number, self.country)
    }
}

/// One SMS received on a queried number.
///
/// Field order matches the export format: `body`, `created_at`, `originator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message text with inner markup flattened.
    pub body: String,
    /// Relative age as reported by the site, e.g. `2 minutes ago`.
    pub created_at: String,
    /// Sender name or number.
    pub originator: String,
}

impl Message {
    pub fn new(
        originator: impl Into<String>,
        body: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            body: body.into(),
            created_at: created_at.into(),
            originator: originator.into(),
        }
    }
}

/// Errors that can occur while scraping, storing, or filtering.
#[derive(thiserror::Error, Debug)]
pub enum SmsError {
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to parse page: {0}")]
    ParsePage(String),

    #[error("Store document {} is corrupt: {message}", .path.display())]
    StoreCorrupt { path: PathBuf, message: String },

    #[error("Index {index} out of range for store with {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid regular expression '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Number {0} is already registered")]
    DuplicateNumber(String),

    #[error("Number {0} is not registered")]
    NumberNotFound(String),

    #[error("Store error at {}: {message}", .path.display())]
    Store { path: PathBuf, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SmsError {
    /// Whether the operator can reasonably try the same operation again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SmsError::Fetch { .. } | SmsError::InvalidPattern { .. })
    }

    pub(crate) fn store(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        SmsError::Store {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Convenience result type.
pub type SmsResult<T> = Result<T, SmsError>;

//! Error types for the quality-guard engine.
//!
//! All fallible operations in the crate return [`QualityError`] through the
//! [`Result`] alias. The variants map onto the three failure classes the
//! engine distinguishes: unusable input, a column that does not exist, and
//! a statistic that cannot be computed for the data at hand.

use thiserror::Error;

/// The main error type for the quality-guard engine.
#[derive(Error, Debug)]
pub enum QualityError {
    /// The input file or table cannot be analyzed.
    ///
    /// Covers unreadable files, malformed delimited data and tables whose
    /// score would require dividing by a zero column count.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A requested column does not exist in the table.
    #[error("Column '{column}' not found in dataset")]
    UnsupportedColumn { column: String },

    /// A statistic is undefined for the column (for example zero spread).
    #[error("Computation not applicable for column '{column}': {reason}")]
    ComputationDegenerate { column: String, reason: String },

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from serialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A type alias for `Result<T, QualityError>`.
pub type Result<T> = std::result::Result<T, QualityError>;

impl QualityError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an unsupported column error.
    pub fn unsupported_column(column: impl Into<String>) -> Self {
        Self::UnsupportedColumn {
            column: column.into(),
        }
    }

    /// Creates a degenerate computation error.
    pub fn degenerate(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ComputationDegenerate {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Returns true when the error means "not applicable" rather than a fault.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::ComputationDegenerate { .. })
    }
}

impl From<serde_json::Error> for QualityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::fmt::Error> for QualityError {
    fn from(err: std::fmt::Error) -> Self {
        Self::Serialization(format!("Failed to write report: {err}"))
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<QualityError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| wrap(msg, e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(&f(), e.into()))
    }
}

fn wrap(msg: &str, error: QualityError) -> QualityError {
    match error {
        QualityError::InvalidInput(inner) => QualityError::InvalidInput(format!("{msg}: {inner}")),
        // Typed variants keep their shape so callers can still match on them.
        other @ (QualityError::UnsupportedColumn { .. }
        | QualityError::ComputationDegenerate { .. }) => other,
        other => QualityError::InvalidInput(format!("{msg}: {other}")),
    }
}

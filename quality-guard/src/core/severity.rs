//! Finding severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity of a finding.
///
/// Levels are ordered by severity: Error > Warning > Info.
///
/// - **Error**: high-confidence defect. Each one costs five score points.
/// - **Warning**: likely defect. Each one costs two score points.
/// - **Info**: notable but not necessarily wrong. Does not affect the score.
///
/// # Examples
///
/// ```rust
/// use quality_guard::core::Severity;
///
/// assert!(Severity::Error > Severity::Warning);
/// assert!(Severity::Warning > Severity::Info);
/// assert_eq!(Severity::Warning.to_string(), "warning");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Notable observation
    Info = 0,
    /// Likely defect
    Warning = 1,
    /// High-confidence defect
    Error = 2,
}

impl Severity {
    /// Returns the string representation of the severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Checks if this severity is at least as high as another.
    pub fn is_at_least(&self, other: Severity) -> bool {
        *self >= other
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

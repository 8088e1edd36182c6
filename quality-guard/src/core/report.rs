//! Analysis results and their export shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Finding, IssueKind, Severity};
use crate::analyzers::ColumnProfile;
use crate::error::Result;

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// The full result of analyzing one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Name of the analyzed file
    pub filename: String,
    /// Formatted file size, e.g. `"12.34 MB"`
    pub file_size: String,
    /// When the analysis ran (UTC, ISO 8601)
    pub timestamp: String,
    pub total_rows: usize,
    pub total_columns: usize,
    /// One profile per column, in table order
    pub columns: Vec<ColumnProfile>,
    /// Findings in detector order
    pub issues: Vec<Finding>,
    /// Score between 0 and 100
    pub quality_score: u8,
}

/// Compact listing entry for stored analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub filename: String,
    pub quality_score: u8,
    pub timestamp: String,
    pub total_rows: usize,
    pub total_columns: usize,
    pub issues_count: usize,
}

impl AnalysisResult {
    /// Returns the first finding of `kind` whose column matches `column`.
    ///
    /// Column names are compared after trimming and lowercasing. A `None`
    /// column only matches dataset-level findings.
    pub fn find_issue(&self, kind: IssueKind, column: Option<&str>) -> Option<&Finding> {
        let wanted = column.map(normalize_column);
        self.issues
            .iter()
            .find(|issue| issue.kind() == kind && issue.column().map(normalize_column) == wanted)
    }

    /// Number of findings at or above `severity`.
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity().is_at_least(severity))
            .count()
    }

    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            filename: self.filename.clone(),
            quality_score: self.quality_score,
            timestamp: self.timestamp.clone(),
            total_rows: self.total_rows,
            total_columns: self.total_columns,
            issues_count: self.issues.len(),
        }
    }

    /// Indented JSON export of the whole result.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn normalize_column(column: &str) -> String {
    column.trim().to_lowercase()
}

/// Human-readable byte size: `"0 B"`, `"512.00 B"`, `"1.50 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.2} {}", SIZE_UNITS[unit])
}

/// ISO 8601 timestamp without offset, microsecond precision.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

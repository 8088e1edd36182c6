//! Issue kinds and findings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Percentage, Severity};

/// The type tag of a finding.
///
/// The string forms (`"Missing Values"`, ...) are the identifiers callers pass
/// back to the affected-row resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    #[serde(rename = "Missing Values")]
    MissingValues,
    #[serde(rename = "Invalid Format")]
    InvalidFormat,
    #[serde(rename = "Invalid Date")]
    InvalidDate,
    #[serde(rename = "Statistical Outlier")]
    StatisticalOutlier,
    #[serde(rename = "Logical Inconsistency")]
    LogicalInconsistency,
    #[serde(rename = "Business Rule Violation")]
    BusinessRuleViolation,
    #[serde(rename = "Duplicate Records")]
    DuplicateRecords,
}

impl IssueKind {
    /// Every kind, in detector execution order.
    pub const ALL: [IssueKind; 7] = [
        IssueKind::MissingValues,
        IssueKind::InvalidFormat,
        IssueKind::InvalidDate,
        IssueKind::StatisticalOutlier,
        IssueKind::LogicalInconsistency,
        IssueKind::BusinessRuleViolation,
        IssueKind::DuplicateRecords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingValues => "Missing Values",
            IssueKind::InvalidFormat => "Invalid Format",
            IssueKind::InvalidDate => "Invalid Date",
            IssueKind::StatisticalOutlier => "Statistical Outlier",
            IssueKind::LogicalInconsistency => "Logical Inconsistency",
            IssueKind::BusinessRuleViolation => "Business Rule Violation",
            IssueKind::DuplicateRecords => "Duplicate Records",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known issue type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownIssueKind(pub String);

impl fmt::Display for UnknownIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown issue type '{}'", self.0)
    }
}

impl std::error::Error for UnknownIssueKind {}

impl FromStr for IssueKind {
    type Err = UnknownIssueKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownIssueKind(s.to_string()))
    }
}

/// One detected data-quality issue.
///
/// Findings are built through the named constructors, which also render the
/// description from the same fields, and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    kind: IssueKind,
    severity: Severity,
    count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percentage: Option<Percentage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column: Option<String>,
    description: String,
}

impl Finding {
    pub fn missing_values(
        column: impl Into<String>,
        count: usize,
        percentage: Percentage,
        severity: Severity,
    ) -> Self {
        let column = column.into();
        Self {
            kind: IssueKind::MissingValues,
            severity,
            count,
            description: format!("{percentage}% of values are missing in column \"{column}\""),
            percentage: Some(percentage),
            column: Some(column),
        }
    }

    pub fn invalid_email_format(column: impl Into<String>, count: usize) -> Self {
        let column = column.into();
        Self::for_column(
            IssueKind::InvalidFormat,
            Severity::Error,
            count,
            format!("{count} invalid email formats in column \"{column}\""),
            column,
        )
    }

    pub fn future_dates(column: impl Into<String>, count: usize) -> Self {
        let column = column.into();
        Self::for_column(
            IssueKind::InvalidDate,
            Severity::Warning,
            count,
            format!("{count} future dates detected in column \"{column}\""),
            column,
        )
    }

    pub fn statistical_outliers(column: impl Into<String>, count: usize) -> Self {
        let column = column.into();
        Self::for_column(
            IssueKind::StatisticalOutlier,
            Severity::Info,
            count,
            format!("{count} statistical outliers detected in column \"{column}\""),
            column,
        )
    }

    pub fn negative_values(column: impl Into<String>, count: usize) -> Self {
        let column = column.into();
        Self::for_column(
            IssueKind::LogicalInconsistency,
            Severity::Error,
            count,
            format!("{count} negative values in column \"{column}\" where positive expected"),
            column,
        )
    }

    pub fn selling_below_cost(count: usize) -> Self {
        Self::for_dataset(
            IssueKind::LogicalInconsistency,
            Severity::Error,
            count,
            format!("{count} products with selling price below cost price"),
        )
    }

    pub fn stock_below_reorder(count: usize) -> Self {
        Self::for_dataset(
            IssueKind::BusinessRuleViolation,
            Severity::Warning,
            count,
            format!("{count} products with stock level below reorder threshold"),
        )
    }

    pub fn duplicate_records(count: usize) -> Self {
        Self::for_dataset(
            IssueKind::DuplicateRecords,
            Severity::Warning,
            count,
            format!("{count} duplicate records detected in dataset"),
        )
    }

    fn for_column(
        kind: IssueKind,
        severity: Severity,
        count: usize,
        description: String,
        column: String,
    ) -> Self {
        Self {
            kind,
            severity,
            count,
            percentage: None,
            column: Some(column),
            description,
        }
    }

    fn for_dataset(kind: IssueKind, severity: Severity, count: usize, description: String) -> Self {
        Self {
            kind,
            severity,
            count,
            percentage: None,
            column: None,
            description,
        }
    }

    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn percentage(&self) -> Option<Percentage> {
        self.percentage
    }

    /// Column the finding is about; `None` for dataset-level findings.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

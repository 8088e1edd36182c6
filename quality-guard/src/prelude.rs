//! Prelude for commonly used types and traits in quality-guard.

pub use crate::analysis::QualityAnalyzer;
pub use crate::analyzers::{ColumnProfile, SemanticType};
pub use crate::core::{AnalysisResult, Finding, IssueKind, Severity};
pub use crate::detectors::{Detector, DetectorSuite};
pub use crate::error::{ErrorContext, QualityError, Result};
pub use crate::formatters::{FormatterConfig, ReportFormatter};
pub use crate::resolver::{AffectedRowResolver, AffectedRows, AffectedRowsQuery};
pub use crate::sources::{CsvOptions, CsvSource, DataSource};
pub use crate::table::Table;

//! Core result types for the quality engine.
//!
//! ## Overview
//!
//! - **[`Severity`]**: how serious a finding is (Error, Warning, Info)
//! - **[`IssueKind`]**: the type tag of a finding
//! - **[`Finding`]**: one detected issue with its count and description
//! - **[`AnalysisResult`]**: everything one analysis produced
//!
//! ```text
//! AnalysisResult
//!     ├── ColumnProfile (one per column)
//!     └── Finding (detector order)
//!         ├── IssueKind
//!         ├── Severity
//!         └── Percentage (missing values only)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use quality_guard::core::{Finding, IssueKind, Severity};
//!
//! let finding = Finding::invalid_email_format("email", 2);
//! assert_eq!(finding.kind(), IssueKind::InvalidFormat);
//! assert_eq!(finding.severity(), Severity::Error);
//! assert_eq!(
//!     finding.description(),
//!     "2 invalid email formats in column \"email\""
//! );
//! ```

mod issue;
mod percentage;
mod report;
mod severity;

pub use issue::{Finding, IssueKind, UnknownIssueKind};
pub use percentage::Percentage;
pub use report::{format_file_size, format_timestamp, AnalysisResult, AnalysisSummary};
pub use severity::Severity;

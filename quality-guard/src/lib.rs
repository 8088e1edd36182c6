//! # quality-guard - Data Quality Analysis for Rust
//!
//! quality-guard inspects a tabular dataset and reports what is wrong with it:
//! missing values, malformed emails, dates in the future, statistical
//! outliers, negative quantities, pricing and stock rule violations and
//! duplicate rows. Every dataset gets a 0-100 quality score, and every finding
//! can be traced back to the exact rows that caused it.
//!
//! ## Quick Start
//!
//! ```rust
//! use quality_guard::prelude::*;
//!
//! # fn example() -> quality_guard::error::Result<()> {
//! let table = Table::from_rows(
//!     &["product", "cost_price", "selling_price"],
//!     &[
//!         vec![Some("widget"), Some("10.00"), Some("15.00")],
//!         vec![Some("gadget"), Some("12.50"), Some("9.99")],
//!         vec![Some("gizmo"), Some("8.00"), None],
//!     ],
//! )?;
//!
//! let result = QualityAnalyzer::new().analyze_table(&table, "products.csv", 96)?;
//! for issue in &result.issues {
//!     println!("[{}] {}", issue.severity(), issue.description());
//! }
//!
//! // Fetch the rows behind the pricing finding
//! let query = AffectedRowsQuery::new("Logical Inconsistency");
//! let page = AffectedRowResolver::new().resolve_table(&table, &query)?;
//! assert_eq!(page.total_count, 1);
//! assert_eq!(page.rows[0].row_index(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Load**: a [`sources::DataSource`] reads the data into an Arrow-backed
//!    [`table::Table`]. Numeric columns are typed as integers or floats, and
//!    everything else is text.
//! 2. **Profile**: [`analyzers::ColumnProfiler`] counts missing and distinct
//!    values and infers a semantic type (email, date, numeric, text) from a
//!    sample of each column.
//! 3. **Detect**: the [`detectors::DetectorSuite`] runs the standard
//!    detectors in a fixed order and produces [`core::Finding`]s.
//! 4. **Score**: [`scoring::QualityScorer`] folds missingness and finding
//!    severities into a single score.
//!
//! Row lookup in [`resolver`] shares its predicates with the detectors, so a
//! finding's count always equals the number of rows the resolver returns for
//! it (duplicates excepted, where the resolver returns every group member).
//!
//! ## Architecture
//!
//! - **`analysis`**: the end-to-end [`analysis::QualityAnalyzer`]
//! - **`analyzers`**: column profiling and semantic type inference
//! - **`core`**: findings, severities, percentages and the analysis result
//! - **`detectors`**: the issue detectors
//! - **`formatters`**: JSON, console and Markdown reports
//! - **`outliers`**: three-sigma bounds and per-column outlier summaries
//! - **`predicates`**: row-level checks shared by detectors and the resolver
//! - **`resolver`**: paginated affected-row retrieval
//! - **`scoring`**: quality score computation
//! - **`sources`**: data loading
//! - **`thresholds`**: the numeric constants behind every decision

pub mod analysis;
pub mod analyzers;
pub mod core;
pub mod detectors;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod outliers;
pub mod predicates;
pub mod prelude;
pub mod resolver;
pub mod scoring;
pub mod sources;
pub mod table;
pub mod thresholds;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

//! Affected-row retrieval for findings.
//!
//! The resolver re-reads a dataset and pages through the rows behind a finding,
//! identified by its issue type and optional column. Rows are selected with the
//! same [`IssuePredicate`] the detectors count with.
//!
//! # Example
//!
//! ```rust
//! use quality_guard::resolver::{AffectedRowResolver, AffectedRowsQuery};
//! use quality_guard::table::Table;
//!
//! # fn example() -> quality_guard::error::Result<()> {
//! let table = Table::from_rows(
//!     &["age"],
//!     &[vec![Some("25")], vec![None], vec![Some("40")]],
//! )?;
//!
//! let query = AffectedRowsQuery::new("Missing Values").column("age");
//! let page = AffectedRowResolver::new().resolve_table(&table, &query)?;
//! assert_eq!(page.total_count, 1);
//! assert_eq!(page.rows[0].row_index(), 2);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::core::IssueKind;
use crate::error::Result;
use crate::predicates::IssuePredicate;
use crate::sources::{CsvOptions, CsvSource, DataSource};
use crate::table::Table;
use crate::thresholds::DEFAULT_PAGE_LIMIT;

const ROW_INDEX_COLUMN: &str = "row_index";

/// Which rows to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedRowsQuery {
    /// Issue type string, e.g. `"Missing Values"`
    pub issue_type: String,
    pub column: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl AffectedRowsQuery {
    /// A query for the first page of an issue type.
    pub fn new(issue_type: impl Into<String>) -> Self {
        Self {
            issue_type: issue_type.into(),
            column: None,
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }

    /// A query matching a finding's identity.
    pub fn for_finding(finding: &crate::core::Finding) -> Self {
        let query = Self::new(finding.kind().as_str());
        match finding.column() {
            Some(column) => query.column(column),
            None => query,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// The column, with blank names treated as absent.
    fn effective_column(&self) -> Option<&str> {
        self.column.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// One matched row with its original 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct AffectedRow {
    row_index: usize,
    values: Vec<(String, Value)>,
}

impl AffectedRow {
    /// Position of the row in the file, starting at 1.
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    /// Cell value by column name; missing cells are `Value::Null`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn values(&self) -> &[(String, Value)] {
        &self.values
    }
}

impl Serialize for AffectedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry(ROW_INDEX_COLUMN, &self.row_index)?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// One page of affected rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffectedRows {
    pub rows: Vec<AffectedRow>,
    /// `row_index` followed by the table's columns
    pub columns: Vec<String>,
    /// Matching rows across all pages
    pub total_count: usize,
    pub has_more: bool,
    pub affected_column: Option<String>,
}

impl AffectedRows {
    fn empty(table: &Table, query: &AffectedRowsQuery) -> Self {
        Self {
            rows: Vec::new(),
            columns: output_columns(table),
            total_count: 0,
            has_more: false,
            affected_column: query.column.clone(),
        }
    }
}

fn output_columns(table: &Table) -> Vec<String> {
    std::iter::once(ROW_INDEX_COLUMN)
        .chain(table.column_names())
        .map(str::to_string)
        .collect()
}

/// Recomputes finding predicates and pages through the matching rows.
#[derive(Debug, Clone, Default)]
pub struct AffectedRowResolver {
    csv_options: CsvOptions,
    reference_time: Option<NaiveDateTime>,
}

impl AffectedRowResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for reading files in [`resolve_file`](Self::resolve_file).
    pub fn with_csv_options(mut self, options: CsvOptions) -> Self {
        self.csv_options = options;
        self
    }

    /// Fixes "now" for future-date checks. Defaults to the local clock.
    pub fn with_reference_time(mut self, now: NaiveDateTime) -> Self {
        self.reference_time = Some(now);
        self
    }

    /// Reads a delimited file and resolves the query against it.
    pub fn resolve_file(
        &self,
        path: impl AsRef<Path>,
        query: &AffectedRowsQuery,
    ) -> Result<AffectedRows> {
        let source = CsvSource::with_options(path.as_ref(), self.csv_options.clone());
        self.resolve_source(&source, query)
    }

    /// Loads a source and resolves the query against it.
    pub fn resolve_source(
        &self,
        source: &dyn DataSource,
        query: &AffectedRowsQuery,
    ) -> Result<AffectedRows> {
        let table = source.load()?;
        self.resolve_table(&table, query)
    }

    /// Resolves the query against an in-memory table.
    ///
    /// Unknown issue types and type/column combinations without a predicate
    /// give an empty page. A named column missing from the table is
    /// `UnsupportedColumn`.
    #[instrument(skip(self, table), fields(issue_type = %query.issue_type, column = ?query.column))]
    pub fn resolve_table(&self, table: &Table, query: &AffectedRowsQuery) -> Result<AffectedRows> {
        let Ok(kind) = query.issue_type.parse::<IssueKind>() else {
            debug!("Unknown issue type, returning no rows");
            return Ok(AffectedRows::empty(table, query));
        };

        let Some(predicate) = IssuePredicate::for_issue(kind, query.effective_column(), table)?
        else {
            debug!("No predicate for this issue type and column");
            return Ok(AffectedRows::empty(table, query));
        };

        let now = self
            .reference_time
            .unwrap_or_else(|| Local::now().naive_local());
        let matching = match predicate.matching_rows(table, now) {
            Ok(rows) => rows,
            Err(e) if e.is_degenerate() => {
                debug!(reason = %e, "Predicate not applicable");
                return Ok(AffectedRows::empty(table, query));
            }
            Err(e) => return Err(e),
        };

        let total_count = matching.len();
        let names = table.column_names();
        let rows: Vec<AffectedRow> = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|row| AffectedRow {
                row_index: row + 1,
                values: names
                    .iter()
                    .enumerate()
                    .map(|(col, name)| (name.to_string(), table.cell(row, col).to_json()))
                    .collect(),
            })
            .collect();

        info!(
            total = total_count,
            returned = rows.len(),
            offset = query.offset,
            "Resolved affected rows"
        );

        Ok(AffectedRows {
            rows,
            columns: output_columns(table),
            total_count,
            has_more: query.offset.saturating_add(query.limit) < total_count,
            affected_column: query.column.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QualityError;
    use chrono::NaiveDate;
    use serde_json::json;

    fn resolver() -> AffectedRowResolver {
        AffectedRowResolver::new().with_reference_time(
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    fn people() -> Table {
        Table::from_rows(
            &["name", "age", "email"],
            &[
                vec![Some("ann"), Some("25"), Some("ann@x.com")],
                vec![Some("bob"), None, Some("bob-at-x")],
                vec![Some("cy"), Some("-3"), Some("cy@x.com")],
                vec![Some("bob"), None, Some("bob-at-x")],
                vec![Some("di"), Some("40"), None],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_missing_values_rows() {
        let query = AffectedRowsQuery::new("Missing Values").column("age");
        let page = resolver().resolve_table(&people(), &query).unwrap();
        assert_eq!(page.total_count, 2);
        let indexes: Vec<usize> = page.rows.iter().map(|r| r.row_index()).collect();
        assert_eq!(indexes, vec![2, 4]);
        assert_eq!(page.rows[0].get("age"), Some(&Value::Null));
        assert_eq!(page.columns, vec!["row_index", "name", "age", "email"]);
        assert_eq!(page.affected_column.as_deref(), Some("age"));
        assert!(!page.has_more);
    }

    #[test]
    fn test_invalid_email_skips_missing_cells() {
        let query = AffectedRowsQuery::new("Invalid Format").column("email");
        let page = resolver().resolve_table(&people(), &query).unwrap();
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn test_duplicates_return_whole_groups() {
        let query = AffectedRowsQuery::new("Duplicate Records");
        let page = resolver().resolve_table(&people(), &query).unwrap();
        let indexes: Vec<usize> = page.rows.iter().map(|r| r.row_index()).collect();
        assert_eq!(indexes, vec![2, 4]);
        assert_eq!(page.affected_column, None);
    }

    #[test]
    fn test_pagination() {
        let query = AffectedRowsQuery::new("Duplicate Records").limit(1);
        let first = resolver().resolve_table(&people(), &query).unwrap();
        assert_eq!(first.rows.len(), 1);
        assert!(first.has_more);

        let second = resolver()
            .resolve_table(&people(), &query.clone().offset(1))
            .unwrap();
        assert_eq!(second.rows[0].row_index(), 4);
        assert!(!second.has_more);

        let beyond = resolver()
            .resolve_table(&people(), &query.offset(10))
            .unwrap();
        assert!(beyond.rows.is_empty());
        assert_eq!(beyond.total_count, 2);
    }

    #[test]
    fn test_unknown_issue_type_is_empty() {
        let query = AffectedRowsQuery::new("Cosmic Rays").column("age");
        let page = resolver().resolve_table(&people(), &query).unwrap();
        assert_eq!(page.total_count, 0);
        assert!(page.rows.is_empty());
        assert_eq!(page.columns.len(), 4);
    }

    #[test]
    fn test_blank_column_counts_as_absent() {
        let query = AffectedRowsQuery::new("Missing Values").column("  ");
        let page = resolver().resolve_table(&people(), &query).unwrap();
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn test_unknown_column_is_error() {
        let query = AffectedRowsQuery::new("Missing Values").column("salary");
        let err = resolver().resolve_table(&people(), &query).unwrap_err();
        assert!(matches!(err, QualityError::UnsupportedColumn { .. }));
    }

    #[test]
    fn test_row_serialization_keeps_column_order() {
        let query = AffectedRowsQuery::new("Logical Inconsistency").column("age");
        let page = resolver().resolve_table(&people(), &query).unwrap();
        let text = serde_json::to_string(&page.rows[0]).unwrap();
        assert_eq!(
            text,
            r#"{"row_index":3,"name":"cy","age":-3,"email":"cy@x.com"}"#
        );
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["total_count"], json!(1));
        assert_eq!(value["has_more"], json!(false));
    }
}

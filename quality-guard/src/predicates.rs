//! Row predicates shared by the detectors and the affected-row resolver.
//!
//! Every issue type maps to exactly one [`IssuePredicate`]. Detectors count the
//! rows a predicate matches; the resolver pages through the same rows. Column
//! selection for cross-column checks also happens here, so both sides always
//! pick the same leftmost qualifying column.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::IssueKind;
use crate::error::Result;
use crate::outliers::OutlierBounds;
use crate::table::{CellKey, CellValue, Table};
use crate::thresholds::{
    COST_PRICE_FRAGMENTS, CURRENT_STOCK_FRAGMENTS, NON_NEGATIVE_KEYWORDS, REORDER_FRAGMENTS,
    SELLING_PRICE_FRAGMENTS,
};

/// `local@domain.tld`: no whitespace, one `@`, a dot after it.
pub static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

pub fn is_valid_email(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

/// Parses a text cell as a date or timestamp.
///
/// Numeric and missing cells are never dates. Offsets in RFC 3339 values are
/// converted to local time so the result compares against a local "now".
pub fn parse_date(cell: &CellValue<'_>) -> Option<NaiveDateTime> {
    let CellValue::Text(raw) = cell else {
        return None;
    };
    let text = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// True when a column name implies values that can't be negative.
pub fn is_non_negative_column(name: &str) -> bool {
    let lower = name.to_lowercase();
    NON_NEGATIVE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Leftmost column whose lowercased name contains every fragment.
pub fn first_column_containing(table: &Table, fragments: &[&str]) -> Option<usize> {
    table.column_names().iter().position(|name| {
        let lower = name.to_lowercase();
        fragments.iter().all(|f| lower.contains(f))
    })
}

/// Rows that repeat an earlier row across every column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateGroups {
    /// Every row belonging to a group of identical rows, in table order
    members: Vec<usize>,
    /// Occurrences after the first in each group
    repeated: usize,
}

impl DuplicateGroups {
    pub fn compute(table: &Table) -> Self {
        let mut first_seen: HashMap<Vec<CellKey>, usize> = HashMap::new();
        let mut in_group = vec![false; table.num_rows()];
        let mut repeated = 0;

        for row in 0..table.num_rows() {
            match first_seen.entry(table.row_key(row)) {
                Entry::Occupied(first) => {
                    in_group[*first.get()] = true;
                    in_group[row] = true;
                    repeated += 1;
                }
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
            }
        }

        let members = in_group
            .iter()
            .enumerate()
            .filter_map(|(row, member)| member.then_some(row))
            .collect();
        Self { members, repeated }
    }

    /// Duplicate count with the first occurrence of each group excluded.
    pub fn duplicate_count(&self) -> usize {
        self.repeated
    }

    /// All rows of every duplicated group, first occurrences included.
    pub fn member_rows(&self) -> &[usize] {
        &self.members
    }
}

/// The row predicate behind one issue type.
///
/// Column fields are positions in the table the predicate was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuePredicate {
    /// Cell is missing
    Missing { column: usize },
    /// Present cell whose text is not an email address
    InvalidEmail { column: usize },
    /// Cell parses to a date after the reference time
    FutureDate { column: usize },
    /// Numeric value more than three standard deviations from the mean
    Outlier { column: usize },
    /// Numeric value below zero
    NegativeValue { column: usize },
    /// Selling price lower than cost price, both present
    SellingBelowCost { cost: usize, selling: usize },
    /// Current stock lower than the reorder level, both present
    StockBelowReorder { stock: usize, reorder: usize },
    /// Row identical to another row
    Duplicate,
}

impl IssuePredicate {
    /// Resolves the predicate for an issue type and optional column.
    ///
    /// Returns `Ok(None)` when the combination has no predicate (for example a
    /// per-column type without a column, or a logical check on a column whose
    /// name carries no non-negative keyword). A named column that does not
    /// exist is `UnsupportedColumn`.
    pub fn for_issue(kind: IssueKind, column: Option<&str>, table: &Table) -> Result<Option<Self>> {
        let column = column
            .map(|name| table.require_column(name).map(|index| (name, index)))
            .transpose()?;

        let predicate = match (kind, column) {
            (IssueKind::MissingValues, Some((_, column))) => Some(Self::Missing { column }),
            (IssueKind::InvalidFormat, Some((_, column))) => Some(Self::InvalidEmail { column }),
            (IssueKind::InvalidDate, Some((_, column))) => Some(Self::FutureDate { column }),
            (IssueKind::StatisticalOutlier, Some((_, column))) => Some(Self::Outlier { column }),
            (IssueKind::LogicalInconsistency, Some((name, column))) => {
                is_non_negative_column(name).then_some(Self::NegativeValue { column })
            }
            (IssueKind::LogicalInconsistency, None) => Self::selling_below_cost(table),
            (IssueKind::BusinessRuleViolation, _) => Self::stock_below_reorder(table),
            (IssueKind::DuplicateRecords, _) => Some(Self::Duplicate),
            _ => None,
        };
        Ok(predicate)
    }

    /// Cross-column price check over the first cost and selling price columns.
    pub fn selling_below_cost(table: &Table) -> Option<Self> {
        let cost = first_column_containing(table, &COST_PRICE_FRAGMENTS)?;
        let selling = first_column_containing(table, &SELLING_PRICE_FRAGMENTS)?;
        Some(Self::SellingBelowCost { cost, selling })
    }

    /// Stock check over the first current stock and reorder columns.
    pub fn stock_below_reorder(table: &Table) -> Option<Self> {
        let stock = first_column_containing(table, &CURRENT_STOCK_FRAGMENTS)?;
        let reorder = first_column_containing(table, &REORDER_FRAGMENTS)?;
        Some(Self::StockBelowReorder { stock, reorder })
    }

    /// The issue type this predicate reproduces.
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::Missing { .. } => IssueKind::MissingValues,
            Self::InvalidEmail { .. } => IssueKind::InvalidFormat,
            Self::FutureDate { .. } => IssueKind::InvalidDate,
            Self::Outlier { .. } => IssueKind::StatisticalOutlier,
            Self::NegativeValue { .. } | Self::SellingBelowCost { .. } => {
                IssueKind::LogicalInconsistency
            }
            Self::StockBelowReorder { .. } => IssueKind::BusinessRuleViolation,
            Self::Duplicate => IssueKind::DuplicateRecords,
        }
    }

    /// Row positions (0-based, table order) matched by the predicate.
    ///
    /// Cells that cannot be coerced never match. The only error is
    /// `ComputationDegenerate` from an outlier predicate on a column with no
    /// spread.
    pub fn matching_rows(&self, table: &Table, now: NaiveDateTime) -> Result<Vec<usize>> {
        let rows = match *self {
            Self::Missing { column } => {
                filter_rows(table, |row| table.cell(row, column).is_missing())
            }
            Self::InvalidEmail { column } => filter_rows(table, |row| {
                table
                    .cell(row, column)
                    .text()
                    .is_some_and(|text| !is_valid_email(&text))
            }),
            Self::FutureDate { column } => filter_rows(table, |row| {
                parse_date(&table.cell(row, column)).is_some_and(|date| date > now)
            }),
            Self::Outlier { column } => {
                let bounds = OutlierBounds::for_column(table, column)?;
                filter_rows(table, |row| {
                    table
                        .cell(row, column)
                        .as_number()
                        .is_some_and(|v| bounds.is_outlier(v))
                })
            }
            Self::NegativeValue { column } => filter_rows(table, |row| {
                table.cell(row, column).as_number().is_some_and(|v| v < 0.0)
            }),
            Self::SellingBelowCost { cost, selling } => {
                filter_rows(table, |row| less_than(table, row, selling, cost))
            }
            Self::StockBelowReorder { stock, reorder } => {
                filter_rows(table, |row| less_than(table, row, stock, reorder))
            }
            Self::Duplicate => DuplicateGroups::compute(table).member_rows().to_vec(),
        };
        Ok(rows)
    }
}

fn filter_rows(table: &Table, matches: impl Fn(usize) -> bool) -> Vec<usize> {
    (0..table.num_rows()).filter(|row| matches(*row)).collect()
}

fn less_than(table: &Table, row: usize, left: usize, right: usize) -> bool {
    match (
        table.cell(row, left).as_number(),
        table.cell(row, right).as_number(),
    ) {
        (Some(l), Some(r)) => l < r,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn products() -> Table {
        Table::from_rows(
            &["sku", "Cost Price", "Selling Price", "Current Stock", "Reorder Level"],
            &[
                vec![Some("A"), Some("10"), Some("12"), Some("5"), Some("3")],
                vec![Some("B"), Some("10"), Some("8"), Some("1"), Some("3")],
                vec![Some("C"), None, Some("8"), Some("oops"), Some("3")],
                vec![Some("D"), Some("9"), Some("4"), Some("2"), Some("2")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("bad"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a@bcom"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for text in ["2024-03-05", "2024/03/05", "03/05/2024", "05.03.2024", "March 05, 2024"] {
            assert_eq!(parse_date(&CellValue::Text(text)), Some(expected), "{text}");
        }
        assert!(parse_date(&CellValue::Text("2024-03-05 10:30:00")).is_some());
        assert!(parse_date(&CellValue::Text("not a date")).is_none());
        assert!(parse_date(&CellValue::Int(20240305)).is_none());
        assert!(parse_date(&CellValue::Null).is_none());
    }

    #[test]
    fn test_first_column_containing_is_leftmost() {
        let table = Table::from_rows(
            &["unit_cost_price", "cost price (old)", "selling_price"],
            &[vec![Some("1"), Some("2"), Some("3")]],
        )
        .unwrap();
        assert_eq!(first_column_containing(&table, &COST_PRICE_FRAGMENTS), Some(0));
        assert_eq!(first_column_containing(&table, &REORDER_FRAGMENTS), None);
    }

    #[test]
    fn test_cross_column_predicates() {
        let table = products();
        let price = IssuePredicate::for_issue(IssueKind::LogicalInconsistency, None, &table)
            .unwrap()
            .unwrap();
        assert_eq!(price, IssuePredicate::SellingBelowCost { cost: 1, selling: 2 });
        assert_eq!(price.matching_rows(&table, now()).unwrap(), vec![1, 3]);

        let stock = IssuePredicate::for_issue(IssueKind::BusinessRuleViolation, None, &table)
            .unwrap()
            .unwrap();
        assert_eq!(stock.matching_rows(&table, now()).unwrap(), vec![1]);
    }

    #[test]
    fn test_logical_column_requires_keyword() {
        let table = products();
        assert_eq!(
            IssuePredicate::for_issue(IssueKind::LogicalInconsistency, Some("sku"), &table)
                .unwrap(),
            None
        );
        assert_eq!(
            IssuePredicate::for_issue(IssueKind::LogicalInconsistency, Some("Cost Price"), &table)
                .unwrap(),
            Some(IssuePredicate::NegativeValue { column: 1 })
        );
    }

    #[test]
    fn test_per_column_types_need_a_column() {
        let table = products();
        for kind in [
            IssueKind::MissingValues,
            IssueKind::InvalidFormat,
            IssueKind::InvalidDate,
            IssueKind::StatisticalOutlier,
        ] {
            assert_eq!(IssuePredicate::for_issue(kind, None, &table).unwrap(), None);
        }
    }

    #[test]
    fn test_unknown_column_is_unsupported() {
        let table = products();
        let err = IssuePredicate::for_issue(IssueKind::MissingValues, Some("nope"), &table)
            .unwrap_err();
        assert!(matches!(err, crate::error::QualityError::UnsupportedColumn { .. }));
    }

    #[test]
    fn test_duplicate_groups() {
        let table = Table::from_rows(
            &["a", "b"],
            &[
                vec![Some("1"), Some("x")],
                vec![Some("2"), Some("y")],
                vec![Some("1"), Some("x")],
                vec![Some("3"), None],
                vec![Some("1"), Some("x")],
                vec![Some("3"), None],
            ],
        )
        .unwrap();
        let groups = DuplicateGroups::compute(&table);
        assert_eq!(groups.duplicate_count(), 3);
        assert_eq!(groups.member_rows(), &[0, 2, 3, 4, 5]);
    }

    #[test]
    fn test_future_date_predicate() {
        let table = Table::from_rows(
            &["joined"],
            &[
                vec![Some("2024-01-01")],
                vec![Some("2030-01-01")],
                vec![Some("garbage")],
                vec![None],
            ],
        )
        .unwrap();
        let predicate = IssuePredicate::FutureDate { column: 0 };
        assert_eq!(predicate.matching_rows(&table, now()).unwrap(), vec![1]);
    }

    #[test]
    fn test_outlier_predicate_on_constant_column_is_degenerate() {
        let table = Table::from_rows(
            &["n"],
            &[vec![Some("4")], vec![Some("4")], vec![Some("4")]],
        )
        .unwrap();
        let err = IssuePredicate::Outlier { column: 0 }
            .matching_rows(&table, now())
            .unwrap_err();
        assert!(err.is_degenerate());
    }
}

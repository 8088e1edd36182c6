//! In-memory table backed by a single Arrow [`RecordBatch`].
//!
//! Columns are stored as `Boolean`, `Int64`, `Float64` or `Utf8` arrays. Text
//! columns are promoted to a boolean or numeric array when every present value
//! parses, which mirrors how dataframe readers pick a column dtype. Everything the engine needs to
//! know about a single cell goes through [`CellValue`], so missingness, numeric
//! coercion and text rendering have exactly one definition.

use std::borrow::Cow;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, StringArray};
use arrow::compute::{cast, cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;

use crate::error::{QualityError, Result};

/// Tokens read as missing values, matching the default NA set of common
/// dataframe readers. Whitespace-only cells are missing as well.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns true when a raw text cell stands for a missing value.
pub fn is_na_token(raw: &str) -> bool {
    raw.trim().is_empty() || NA_TOKENS.contains(&raw)
}

/// Literals read as booleans when a whole column consists of them.
const TRUE_LITERALS: [&str; 3] = ["True", "TRUE", "true"];
const FALSE_LITERALS: [&str; 3] = ["False", "FALSE", "false"];

fn parse_bool_literal(raw: &str) -> Option<bool> {
    if TRUE_LITERALS.contains(&raw) {
        Some(true)
    } else if FALSE_LITERALS.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

/// One cell of a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl<'a> CellValue<'a> {
    /// True for null cells.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric coercion: numbers pass through, booleans count as 1 and 0,
    /// text is trimmed and parsed.
    ///
    /// Anything that does not parse, or parses to NaN, is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
        }
    }

    /// String rendering of the cell, `None` for missing cells.
    ///
    /// Integral floats keep one fractional digit (`10.0`) so numeric columns
    /// read back the way they were typed.
    pub fn text(&self) -> Option<Cow<'a, str>> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(v) => Some(Cow::Borrowed(if *v { "True" } else { "False" })),
            CellValue::Int(v) => Some(Cow::Owned(v.to_string())),
            CellValue::Float(v) => Some(Cow::Owned(format_float(*v))),
            CellValue::Text(s) => Some(Cow::Borrowed(*s)),
        }
    }

    /// Hashable identity used for distinct counts and duplicate rows.
    pub fn key(&self) -> CellKey {
        match self {
            CellValue::Null => CellKey::Null,
            CellValue::Bool(v) => CellKey::Bool(*v),
            CellValue::Int(v) => CellKey::Int(*v),
            // -0.0 and 0.0 are the same value.
            CellValue::Float(v) => CellKey::Float(if *v == 0.0 { 0 } else { v.to_bits() }),
            CellValue::Text(s) => CellKey::Text((*s).to_string()),
        }
    }

    /// JSON rendering with an explicit `null` for missing cells.
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Bool(v) => Value::Bool(*v),
            CellValue::Int(v) => Value::from(*v),
            CellValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Text(s) => Value::String((*s).to_string()),
        }
    }
}

/// Value identity of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// A fully materialized, read-only table.
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Wraps a record batch, normalizing column types.
    ///
    /// `Boolean`, `Int64`, `Float64` and `Utf8` columns are kept as they are;
    /// any other Arrow type is rendered to `Utf8`.
    pub fn try_new(batch: RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut columns = Vec::with_capacity(schema.fields().len());

        for (field, column) in schema.fields().iter().zip(batch.columns()) {
            let column = match column.data_type() {
                DataType::Boolean | DataType::Int64 | DataType::Float64 | DataType::Utf8 => {
                    column.clone()
                }
                _ => cast(column.as_ref(), &DataType::Utf8)?,
            };
            fields.push(Field::new(field.name(), column.data_type().clone(), true));
            columns.push(column);
        }

        let batch = if columns.is_empty() {
            RecordBatch::new_empty(Arc::new(Schema::empty()))
        } else {
            RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?
        };
        Ok(Self { batch })
    }

    /// Builds a table from text columns, promoting numeric ones.
    ///
    /// Column names are de-duplicated (`a`, `a.1`, `a.2`).
    pub fn from_text_columns(names: Vec<String>, columns: Vec<StringArray>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(QualityError::invalid_input(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        if names.is_empty() {
            return Err(QualityError::invalid_input("No columns to parse from file"));
        }

        let names = dedupe_names(names);
        let fields_and_arrays: Vec<(Field, ArrayRef)> = names
            .into_iter()
            .zip(columns)
            .map(|(name, column)| {
                let array = promote_column(Arc::new(column));
                (Field::new(name, array.data_type().clone(), true), array)
            })
            .collect();

        let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = fields_and_arrays.into_iter().unzip();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
        Ok(Self { batch })
    }

    /// Builds a table from string rows. `None` and NA tokens become missing.
    pub fn from_rows(headers: &[&str], rows: &[Vec<Option<&str>>]) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(QualityError::invalid_input(format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    i + 2,
                    row.len()
                )));
            }
        }

        let columns = (0..headers.len())
            .map(|col| {
                rows.iter()
                    .map(|row| row[col].filter(|raw| !is_na_token(raw)))
                    .collect::<StringArray>()
            })
            .collect();

        Self::from_text_columns(headers.iter().map(|h| h.to_string()).collect(), columns)
    }

    /// The underlying record batch.
    pub fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .position(|f| f.name() == name)
    }

    /// Position of a column, or `UnsupportedColumn` when it does not exist.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| QualityError::unsupported_column(name))
    }

    /// Reads one cell.
    pub fn cell(&self, row: usize, column: usize) -> CellValue<'_> {
        let array = self.batch.column(column);
        if array.is_null(row) {
            return CellValue::Null;
        }
        match array.data_type() {
            DataType::Boolean => CellValue::Bool(array.as_boolean().value(row)),
            DataType::Int64 => CellValue::Int(array.as_primitive::<Int64Type>().value(row)),
            DataType::Float64 => {
                let value = array.as_primitive::<Float64Type>().value(row);
                if value.is_nan() {
                    CellValue::Null
                } else {
                    CellValue::Float(value)
                }
            }
            _ => CellValue::Text(array.as_string::<i32>().value(row)),
        }
    }

    /// All cells of a column, top to bottom.
    pub fn column_cells(&self, column: usize) -> impl Iterator<Item = CellValue<'_>> + '_ {
        (0..self.num_rows()).map(move |row| self.cell(row, column))
    }

    /// Numeric coercion of a whole column, one entry per row.
    pub fn numeric_column(&self, column: usize) -> Vec<Option<f64>> {
        self.column_cells(column).map(|c| c.as_number()).collect()
    }

    /// Identity of a full row, used for duplicate detection.
    pub fn row_key(&self, row: usize) -> Vec<CellKey> {
        (0..self.num_columns())
            .map(|col| self.cell(row, col).key())
            .collect()
    }
}

fn promote_column(array: ArrayRef) -> ArrayRef {
    if let Some(flags) = promote_bool_column(&array) {
        return Arc::new(flags);
    }
    let strict = CastOptions {
        safe: false,
        ..Default::default()
    };
    [DataType::Int64, DataType::Float64]
        .iter()
        .find_map(|target| cast_with_options(array.as_ref(), target, &strict).ok())
        .unwrap_or(array)
}

/// A text column whose present values are all boolean literals.
///
/// Arrow's own string-to-boolean cast also accepts `yes`, `1` and similar,
/// which would turn ordinary integer columns into flags.
fn promote_bool_column(array: &ArrayRef) -> Option<BooleanArray> {
    let text = array.as_string_opt::<i32>()?;
    if text.null_count() == text.len() {
        return None;
    }
    text.iter()
        .map(|cell| match cell {
            Some(raw) => parse_bool_literal(raw).map(Some),
            None => Some(None),
        })
        .collect()
}

fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}.{suffix}");
            suffix += 1;
        }
        seen.push(candidate);
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            &["id", "price", "name"],
            &[
                vec![Some("1"), Some("10.5"), Some("alpha")],
                vec![Some("2"), None, Some("NA")],
                vec![Some("3"), Some("7"), Some("   ")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_promotion() {
        let table = sample();
        let batch = table.record_batch();
        assert_eq!(batch.column(0).data_type(), &DataType::Int64);
        assert_eq!(batch.column(1).data_type(), &DataType::Float64);
        assert_eq!(batch.column(2).data_type(), &DataType::Utf8);
    }

    #[test]
    fn test_boolean_literal_columns() {
        let table = Table::from_rows(
            &["flag", "mixed", "digits"],
            &[
                vec![Some("True"), Some("True"), Some("1")],
                vec![None, Some("maybe"), Some("0")],
                vec![Some("false"), Some("False"), Some("1")],
            ],
        )
        .unwrap();
        let batch = table.record_batch();
        assert_eq!(batch.column(0).data_type(), &DataType::Boolean);
        assert_eq!(batch.column(1).data_type(), &DataType::Utf8);
        assert_eq!(batch.column(2).data_type(), &DataType::Int64);

        assert_eq!(table.cell(0, 0), CellValue::Bool(true));
        assert!(table.cell(1, 0).is_missing());
        assert_eq!(table.numeric_column(0), vec![Some(1.0), None, Some(0.0)]);
        assert_eq!(table.cell(2, 0).text().unwrap(), "False");
        assert_eq!(table.cell(0, 0).to_json(), serde_json::json!(true));
        assert_eq!(CellValue::Text("True").as_number(), None);
    }

    #[test]
    fn test_na_tokens_are_missing() {
        let table = sample();
        assert!(table.cell(1, 1).is_missing());
        assert!(table.cell(1, 2).is_missing());
        assert!(table.cell(2, 2).is_missing());
        assert_eq!(table.cell(0, 2), CellValue::Text("alpha"));
    }

    #[test]
    fn test_text_rendering() {
        let table = sample();
        assert_eq!(table.cell(2, 1).text().unwrap(), "7.0");
        assert_eq!(table.cell(0, 0).text().unwrap(), "1");
        assert!(table.cell(1, 1).text().is_none());
    }

    #[test]
    fn test_numeric_coercion_degrades_per_cell() {
        assert_eq!(CellValue::Text(" 42 ").as_number(), Some(42.0));
        assert_eq!(CellValue::Text("4x2").as_number(), None);
        assert_eq!(CellValue::Text("nan").as_number(), None);
        assert_eq!(CellValue::Int(-3).as_number(), Some(-3.0));
    }

    #[test]
    fn test_duplicate_header_names() {
        let table = Table::from_rows(&["a", "a", "a"], &[vec![Some("1"), Some("2"), Some("3")]])
            .unwrap();
        assert_eq!(table.column_names(), vec!["a", "a.1", "a.2"]);
    }

    #[test]
    fn test_require_column() {
        let table = sample();
        assert_eq!(table.require_column("price").unwrap(), 1);
        assert!(matches!(
            table.require_column("missing"),
            Err(QualityError::UnsupportedColumn { .. })
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Table::from_rows(&["a", "b"], &[vec![Some("1")]]).unwrap_err();
        assert!(matches!(err, QualityError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_zero_key() {
        assert_eq!(CellValue::Float(-0.0).key(), CellValue::Float(0.0).key());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(CellValue::Null.to_json(), Value::Null);
        assert_eq!(CellValue::Int(3).to_json(), serde_json::json!(3));
        assert_eq!(CellValue::Text("x").to_json(), serde_json::json!("x"));
    }
}

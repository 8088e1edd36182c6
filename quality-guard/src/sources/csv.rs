//! CSV file source implementation.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, StringArray};
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

use super::DataSource;
use crate::error::{ErrorContext, QualityError, Result};
use crate::table::{Table, NA_TOKENS};

/// Matches cells that stand for a missing value: NA tokens and blank cells.
static NULL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternatives = NA_TOKENS
        .iter()
        .filter(|token| !token.is_empty())
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"^(?:\s*|{alternatives})$")).expect("NA token pattern is valid")
});

/// Options for configuring CSV file reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the CSV file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Rows decoded per Arrow batch before concatenation
    pub batch_size: usize,
    /// Pad short rows with missing values instead of rejecting the file
    pub allow_truncated_rows: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            batch_size: 8192,
            allow_truncated_rows: true,
        }
    }
}

/// A delimited text file loaded into a [`Table`].
///
/// # Examples
///
/// ```rust,no_run
/// use quality_guard::sources::{CsvOptions, CsvSource, DataSource};
///
/// # fn example() -> quality_guard::error::Result<()> {
/// let source = CsvSource::new("data/products.csv");
/// let table = source.load()?;
///
/// let tsv = CsvSource::with_options(
///     "data/products.tsv",
///     CsvOptions {
///         delimiter: b'\t',
///         ..Default::default()
///     },
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    options: CsvOptions,
}

impl CsvSource {
    /// Creates a new CSV source from a file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: CsvOptions::default(),
        }
    }

    /// Creates a new CSV source with custom options.
    pub fn with_options(path: impl Into<PathBuf>, options: CsvOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options used when reading.
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Reads delimited data from any reader.
    ///
    /// Every column is decoded as text first and promoted to a numeric type
    /// afterwards, so numeric detection follows [`Table`] rules rather than the
    /// CSV decoder's own inference.
    pub fn read_table<R: Read>(mut reader: R, options: &CsvOptions) -> Result<Table> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let format = Format::default()
            .with_header(options.has_header)
            .with_delimiter(options.delimiter)
            .with_quote(options.quote);

        let (inferred, _) = format
            .clone()
            .infer_schema(Cursor::new(&bytes), Some(0))
            .map_err(|e| QualityError::invalid_input(format!("Malformed delimited data: {e}")))?;

        if inferred.fields().is_empty() {
            return Err(QualityError::invalid_input("No columns to parse from file"));
        }

        let names: Vec<String> = inferred
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| {
                if options.has_header {
                    f.name().clone()
                } else {
                    i.to_string()
                }
            })
            .collect();

        // Positional decoding; names are applied after de-duplication.
        let text_schema = Arc::new(Schema::new(
            (0..names.len())
                .map(|i| Field::new(format!("c{i}"), DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));

        let csv_reader = ReaderBuilder::new(text_schema.clone())
            .with_format(format)
            .with_null_regex(NULL_PATTERN.clone())
            .with_truncated_rows(options.allow_truncated_rows)
            .with_batch_size(options.batch_size)
            .build(Cursor::new(&bytes))?;

        let batches = csv_reader
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| QualityError::invalid_input(format!("Malformed delimited data: {e}")))?;
        let batch = concat_batches(&text_schema, &batches)?;

        let columns = batch
            .columns()
            .iter()
            .map(|column| {
                column
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .cloned()
                    .ok_or_else(|| QualityError::invalid_input("Expected text column from reader"))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            rows = batch.num_rows(),
            columns = columns.len(),
            batches = batches.len(),
            "Decoded delimited data"
        );

        Table::from_text_columns(names, columns)
    }
}

impl DataSource for CsvSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Table> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let table = Self::read_table(file, &self.options)?;

        info!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Loaded CSV file"
        );
        Ok(table)
    }

    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn size_bytes(&self) -> Result<u64> {
        let metadata = std::fs::metadata(&self.path)
            .with_context(|| format!("Failed to stat {}", self.path.display()))?;
        Ok(metadata.len())
    }
}

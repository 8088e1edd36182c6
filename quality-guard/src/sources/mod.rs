//! Data sources that materialize a [`Table`](crate::table::Table).
//!
//! The engine operates on fully loaded tables; a source only has to know how
//! to read its data once and describe itself for the analysis report.

mod csv;

pub use csv::{CsvOptions, CsvSource};

use crate::error::Result;
use crate::table::Table;

/// A source of tabular data.
///
/// # Examples
///
/// ```rust,no_run
/// use quality_guard::sources::{CsvSource, DataSource};
///
/// # fn example() -> quality_guard::error::Result<()> {
/// let source = CsvSource::new("data/users.csv");
/// let table = source.load()?;
/// println!("{} rows from {}", table.num_rows(), source.name());
/// # Ok(())
/// # }
/// ```
pub trait DataSource: std::fmt::Debug {
    /// Reads the whole dataset into memory.
    fn load(&self) -> Result<Table>;

    /// Display name used in reports (the file name for file sources).
    fn name(&self) -> String;

    /// Size of the raw data in bytes.
    fn size_bytes(&self) -> Result<u64>;
}

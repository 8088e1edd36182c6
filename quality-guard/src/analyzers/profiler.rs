//! Per-column profiling.
//!
//! A [`ColumnProfile`] records how many cells of a column are present, how
//! many distinct values they hold and which [`SemanticType`] the column has.
//! Percentages are rounded to one decimal and are zero when their denominator
//! is zero.
//!
//! # Example
//!
//! ```rust
//! use quality_guard::analyzers::{ColumnProfiler, SemanticType};
//! use quality_guard::table::Table;
//!
//! # fn example() -> quality_guard::error::Result<()> {
//! let table = Table::from_rows(
//!     &["age"],
//!     &[vec![Some("25")], vec![Some("30")], vec![None], vec![Some("40")]],
//! )?;
//!
//! let profile = ColumnProfiler::new().profile_column(&table, "age")?;
//! assert_eq!(profile.semantic_type, SemanticType::Numeric);
//! assert_eq!(profile.missing_count, 1);
//! assert_eq!(profile.missing_percentage.to_string(), "25.0");
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::inference::{SemanticType, TypeInferenceEngine};
use crate::core::Percentage;
use crate::error::Result;
use crate::table::Table;

/// Summary statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    pub name: String,
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub total_values: usize,
    pub non_empty_values: usize,
    pub missing_count: usize,
    /// Relative to `total_values`
    pub missing_percentage: Percentage,
    /// Distinct non-missing values
    pub unique_count: usize,
    /// Relative to `non_empty_values`
    pub unique_percentage: Percentage,
}

/// Builds [`ColumnProfile`]s for the columns of a table.
#[derive(Debug, Clone, Default)]
pub struct ColumnProfiler {
    inference: TypeInferenceEngine,
}

impl ColumnProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom inference engine.
    pub fn with_inference(inference: TypeInferenceEngine) -> Self {
        Self { inference }
    }

    /// Profiles a column by name.
    pub fn profile_column(&self, table: &Table, column_name: &str) -> Result<ColumnProfile> {
        let index = table.require_column(column_name)?;
        Ok(self.profile_index(table, index))
    }

    /// Profiles the column at `index`.
    pub fn profile_index(&self, table: &Table, index: usize) -> ColumnProfile {
        let name = table.column_names()[index].to_string();
        let total_values = table.num_rows();

        let mut distinct = HashSet::new();
        let mut non_empty_values = 0;
        for cell in table.column_cells(index).filter(|cell| !cell.is_missing()) {
            non_empty_values += 1;
            distinct.insert(cell.key());
        }
        let missing_count = total_values - non_empty_values;

        ColumnProfile {
            semantic_type: self.inference.infer_column(table, index),
            total_values,
            non_empty_values,
            missing_count,
            missing_percentage: Percentage::of(missing_count, total_values),
            unique_count: distinct.len(),
            unique_percentage: Percentage::of(distinct.len(), non_empty_values),
            name,
        }
    }

    /// Profiles every column in table order.
    #[instrument(skip(self, table), fields(columns = table.num_columns(), rows = table.num_rows()))]
    pub fn profile_table(&self, table: &Table) -> Vec<ColumnProfile> {
        let profiles: Vec<ColumnProfile> = (0..table.num_columns())
            .map(|index| self.profile_index(table, index))
            .collect();

        info!(
            columns = profiles.len(),
            incomplete_columns = profiles.iter().filter(|p| p.missing_count > 0).count(),
            "Completed column profiling"
        );
        profiles
    }
}

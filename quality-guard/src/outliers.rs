//! Standard-deviation outlier statistics.
//!
//! A value is an outlier when it lies more than
//! [`OUTLIER_STD_MULTIPLIER`](crate::thresholds::OUTLIER_STD_MULTIPLIER) sample
//! standard deviations from the column mean. The detector, the resolver and
//! [`OutlierSummary`] all derive from [`OutlierBounds`].

use serde::{Deserialize, Serialize};

use crate::error::{QualityError, Result};
use crate::table::Table;
use crate::thresholds::{OUTLIER_SAMPLE_VALUES, OUTLIER_STD_MULTIPLIER};

/// Mean and sample standard deviation of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    mean: f64,
    std_dev: f64,
}

impl OutlierBounds {
    /// Computes the bounds from the non-null values of a series.
    ///
    /// Returns `ComputationDegenerate` when the standard deviation is zero or
    /// undefined (fewer than two values).
    pub fn from_values(column: &str, values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(QualityError::degenerate(
                column,
                format!("standard deviation needs at least 2 values, found {}", values.len()),
            ));
        }

        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let constant = values.iter().all(|v| *v == values[0]);
        let std_dev = if constant {
            0.0
        } else {
            let sum_of_squared_deviations: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_of_squared_deviations / (count - 1.0)).sqrt()
        };

        if std_dev.is_nan() || std_dev == 0.0 {
            return Err(QualityError::degenerate(column, "zero standard deviation"));
        }
        Ok(Self { mean, std_dev })
    }

    /// Computes the bounds for a table column after numeric coercion.
    pub fn for_column(table: &Table, column: usize) -> Result<Self> {
        let name = table.column_names()[column].to_string();
        let values: Vec<f64> = table.numeric_column(column).into_iter().flatten().collect();
        Self::from_values(&name, &values)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Largest allowed distance from the mean.
    pub fn max_deviation(&self) -> f64 {
        OUTLIER_STD_MULTIPLIER * self.std_dev
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        (value - self.mean).abs() > self.max_deviation()
    }
}

/// Outlier statistics for one column, used to explain an outlier finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub column_name: String,
    pub mean: f64,
    pub std_dev: f64,
    /// Number of outlier values
    pub count: usize,
    /// Rows in the table, including those that are not numeric
    pub total_records: usize,
    /// `count / total_records * 100`, unrounded
    pub percentage: f64,
    /// First outlier values in row order
    pub sample_values: Vec<f64>,
    pub min_outlier: f64,
    pub max_outlier: f64,
}

impl OutlierSummary {
    /// Summarizes the outliers of `column`.
    ///
    /// Returns `Ok(None)` when the column has no outliers.
    pub fn compute(table: &Table, column: &str) -> Result<Option<Self>> {
        let index = table.require_column(column)?;
        let bounds = OutlierBounds::for_column(table, index)?;

        let outliers: Vec<f64> = table
            .numeric_column(index)
            .into_iter()
            .flatten()
            .filter(|v| bounds.is_outlier(*v))
            .collect();
        if outliers.is_empty() {
            return Ok(None);
        }

        let total_records = table.num_rows();
        let min_outlier = outliers.iter().copied().fold(f64::INFINITY, f64::min);
        let max_outlier = outliers.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Some(Self {
            column_name: column.to_string(),
            mean: bounds.mean(),
            std_dev: bounds.std_dev(),
            count: outliers.len(),
            total_records,
            percentage: outliers.len() as f64 / total_records as f64 * 100.0,
            sample_values: outliers.iter().copied().take(OUTLIER_SAMPLE_VALUES).collect(),
            min_outlier,
            max_outlier,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spiky_values() -> Vec<f64> {
        let mut values = vec![10.0; 20];
        values[3] = 11.0;
        values.push(1000.0);
        values
    }

    #[test]
    fn test_sample_std_dev() {
        let bounds = OutlierBounds::from_values("x", &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .unwrap();
        assert!((bounds.mean() - 5.0).abs() < 1e-12);
        // ddof = 1: sqrt(32 / 7)
        assert!((bounds.std_dev() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(OutlierBounds::from_values("x", &[]).unwrap_err().is_degenerate());
        assert!(OutlierBounds::from_values("x", &[1.0]).unwrap_err().is_degenerate());
        assert!(OutlierBounds::from_values("x", &[0.1, 0.1, 0.1])
            .unwrap_err()
            .is_degenerate());
    }

    #[test]
    fn test_detects_spike() {
        let bounds = OutlierBounds::from_values("x", &spiky_values()).unwrap();
        assert!(bounds.is_outlier(1000.0));
        assert!(!bounds.is_outlier(11.0));
    }

    #[test]
    fn test_summary() {
        let values = spiky_values();
        let cells: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let rows: Vec<Vec<Option<&str>>> = cells.iter().map(|c| vec![Some(c.as_str())]).collect();
        let table = Table::from_rows(&["reading"], &rows).unwrap();

        let summary = OutlierSummary::compute(&table, "reading").unwrap().unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.total_records, 21);
        assert_eq!(summary.sample_values, vec![1000.0]);
        assert_eq!(summary.min_outlier, 1000.0);
        assert_eq!(summary.max_outlier, 1000.0);
        assert!((summary.percentage - 100.0 / 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_without_outliers() {
        let table = Table::from_rows(
            &["n"],
            &[vec![Some("1")], vec![Some("2")], vec![Some("3")]],
        )
        .unwrap();
        assert_eq!(OutlierSummary::compute(&table, "n").unwrap(), None);
    }
}

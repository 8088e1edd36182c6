//! Issue detectors.
//!
//! Each [`Detector`] reads the table and the column profiles and returns its
//! findings in discovery order. [`DetectorSuite`] runs them in a fixed order
//! and concatenates the results:
//!
//! 1. [`MissingValuesDetector`]
//! 2. [`FormatDetector`] (email format, future dates)
//! 3. [`OutlierDetector`]
//! 4. [`LogicalDetector`] (negative values, price and stock rules)
//! 5. [`DuplicateDetector`]
//!
//! Detectors count rows with the predicates in [`crate::predicates`], the
//! same ones the affected-row resolver pages through.
//!
//! A detector that fails contributes no findings; the suite logs the failure
//! and moves on.

use std::fmt::Debug;

use chrono::NaiveDateTime;
use tracing::{debug, instrument, warn};

use crate::analyzers::ColumnProfile;
use crate::core::Finding;
use crate::error::Result;
use crate::logging::truncate_field;
use crate::table::Table;

const MAX_LOGGED_ERROR_LENGTH: usize = 256;

mod duplicates;
mod format;
mod logical;
mod missing;
mod outliers;

pub use duplicates::DuplicateDetector;
pub use format::FormatDetector;
pub use logical::LogicalDetector;
pub use missing::MissingValuesDetector;
pub use outliers::OutlierDetector;

/// Inputs shared by all detectors during one analysis.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    pub table: &'a Table,
    pub profiles: &'a [ColumnProfile],
    /// Reference time for date checks
    pub now: NaiveDateTime,
}

impl<'a> DetectionContext<'a> {
    pub fn new(table: &'a Table, profiles: &'a [ColumnProfile], now: NaiveDateTime) -> Self {
        Self {
            table,
            profiles,
            now,
        }
    }

    /// Profiles paired with their column position in the table.
    pub fn columns(&self) -> impl Iterator<Item = Result<(usize, &'a ColumnProfile)>> + '_ {
        self.profiles.iter().map(|profile| {
            self.table
                .require_column(&profile.name)
                .map(|index| (index, profile))
        })
    }
}

/// A rule module that turns a table into findings.
pub trait Detector: Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Runs the detector.
    fn detect(&self, context: &DetectionContext<'_>) -> Result<Vec<Finding>>;
}

/// Runs detectors in order and concatenates their findings.
#[derive(Debug)]
pub struct DetectorSuite {
    detectors: Vec<Box<dyn Detector>>,
    continue_on_error: bool,
}

impl Default for DetectorSuite {
    fn default() -> Self {
        Self::standard()
    }
}

impl DetectorSuite {
    /// An empty suite.
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            continue_on_error: true,
        }
    }

    /// The five standard detectors in execution order.
    pub fn standard() -> Self {
        Self::new()
            .with_detector(MissingValuesDetector)
            .with_detector(FormatDetector)
            .with_detector(OutlierDetector)
            .with_detector(LogicalDetector)
            .with_detector(DuplicateDetector)
    }

    pub fn with_detector(mut self, detector: impl Detector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Sets whether a failing detector is skipped (the default) or aborts the run.
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    #[instrument(skip(self, context), fields(detectors = self.detectors.len()))]
    pub fn run(&self, context: &DetectionContext<'_>) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for detector in &self.detectors {
            match detector.detect(context) {
                Ok(found) => {
                    debug!(
                        detector = detector.name(),
                        findings = found.len(),
                        "Detector completed"
                    );
                    findings.extend(found);
                }
                Err(e) if self.continue_on_error => {
                    warn!(
                        detector = detector.name(),
                        error = %truncate_field(&e.to_string(), MAX_LOGGED_ERROR_LENGTH),
                        "Detector failed, skipping"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::analyzers::{ColumnProfile, ColumnProfiler};
    use crate::table::Table;

    pub fn reference_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    pub fn profiled(headers: &[&str], rows: &[Vec<Option<&str>>]) -> (Table, Vec<ColumnProfile>) {
        let table = Table::from_rows(headers, rows).unwrap();
        let profiles = ColumnProfiler::new().profile_table(&table);
        (table, profiles)
    }
}

//! Quality score computation.
//!
//! ```text
//! score = 100 - mean(missing %) - 5 * errors - 2 * warnings
//! ```
//!
//! The result is clamped to `[0, 100]` and truncated to an integer. `info`
//! findings cost nothing.

use serde::Serialize;
use tracing::debug;

use crate::analyzers::ColumnProfile;
use crate::core::{Finding, Severity};
use crate::error::{QualityError, Result};
use crate::thresholds::{ERROR_PENALTY, MAX_QUALITY_SCORE, WARNING_PENALTY};

/// The terms that make up a quality score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub average_missing_percentage: f64,
    pub error_count: usize,
    pub warning_count: usize,
    /// Score before clamping and truncation
    pub raw_score: f64,
    pub score: u8,
}

/// Reduces column profiles and findings to a 0-100 score.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Computes the score.
    ///
    /// A table without columns has no average missing percentage and is
    /// rejected with `InvalidInput`.
    pub fn score(&self, profiles: &[ColumnProfile], findings: &[Finding]) -> Result<u8> {
        Ok(self.breakdown(profiles, findings)?.score)
    }

    /// Computes the score along with its terms.
    pub fn breakdown(
        &self,
        profiles: &[ColumnProfile],
        findings: &[Finding],
    ) -> Result<ScoreBreakdown> {
        if profiles.is_empty() {
            return Err(QualityError::invalid_input(
                "Cannot score a table without columns",
            ));
        }

        let average_missing_percentage = profiles
            .iter()
            .map(|p| p.missing_percentage.value())
            .sum::<f64>()
            / profiles.len() as f64;
        let error_count = count_severity(findings, Severity::Error);
        let warning_count = count_severity(findings, Severity::Warning);

        let raw_score = MAX_QUALITY_SCORE
            - average_missing_percentage
            - ERROR_PENALTY * error_count as f64
            - WARNING_PENALTY * warning_count as f64;
        let score = raw_score.clamp(0.0, MAX_QUALITY_SCORE).trunc() as u8;

        debug!(
            average_missing_percentage,
            error_count, warning_count, raw_score, score, "Computed quality score"
        );

        Ok(ScoreBreakdown {
            average_missing_percentage,
            error_count,
            warning_count,
            raw_score,
            score,
        })
    }
}

fn count_severity(findings: &[Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity() == severity).count()
}

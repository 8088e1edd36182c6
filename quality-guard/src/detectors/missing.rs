//! Missing value detection.

use super::{DetectionContext, Detector};
use crate::core::{Finding, Severity};
use crate::error::Result;
use crate::thresholds::MISSING_ERROR_PERCENTAGE;

/// Reports every column with at least one missing cell.
///
/// Severity is `error` above [`MISSING_ERROR_PERCENTAGE`], `warning` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingValuesDetector;

impl Detector for MissingValuesDetector {
    fn name(&self) -> &str {
        "missing_values"
    }

    fn detect(&self, context: &DetectionContext<'_>) -> Result<Vec<Finding>> {
        Ok(context
            .profiles
            .iter()
            .filter(|profile| profile.missing_count > 0)
            .map(|profile| {
                let severity = if profile.missing_percentage.value() > MISSING_ERROR_PERCENTAGE {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                Finding::missing_values(
                    profile.name.clone(),
                    profile.missing_count,
                    profile.missing_percentage,
                    severity,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::test_support::*;

    #[test]
    fn test_severity_threshold() {
        // 1 of 10 missing is exactly 10%, which stays a warning
        let mut rows: Vec<Vec<Option<&str>>> = (0..9).map(|_| vec![Some("x"), Some("1")]).collect();
        rows.push(vec![None, None]);
        rows[0][1] = None;
        let (table, profiles) = profiled(&["name", "age"], &rows);
        let context = DetectionContext::new(&table, &profiles, reference_time());

        let findings = MissingValuesDetector.detect(&context).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].column(), Some("name"));
        assert_eq!(findings[0].severity(), Severity::Warning);
        assert_eq!(findings[1].column(), Some("age"));
        assert_eq!(findings[1].count(), 2);
        assert_eq!(findings[1].severity(), Severity::Error);
        assert_eq!(
            findings[1].description(),
            "20.0% of values are missing in column \"age\""
        );
    }

    #[test]
    fn test_complete_table_has_no_findings() {
        let (table, profiles) = profiled(&["a"], &[vec![Some("1")], vec![Some("2")]]);
        let context = DetectionContext::new(&table, &profiles, reference_time());
        assert!(MissingValuesDetector.detect(&context).unwrap().is_empty());
    }
}

//! Statistical outlier detection.

use tracing::debug;

use super::{DetectionContext, Detector};
use crate::analyzers::SemanticType;
use crate::core::Finding;
use crate::error::Result;
use crate::predicates::IssuePredicate;

/// Flags numeric values more than three sample standard deviations from the
/// column mean.
///
/// Columns without spread are skipped rather than reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlierDetector;

impl Detector for OutlierDetector {
    fn name(&self) -> &str {
        "outliers"
    }

    fn detect(&self, context: &DetectionContext<'_>) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for column in context.columns() {
            let (index, profile) = column?;
            if profile.semantic_type != SemanticType::Numeric {
                continue;
            }

            let predicate = IssuePredicate::Outlier { column: index };
            let outliers = match predicate.matching_rows(context.table, context.now) {
                Ok(rows) => rows.len(),
                Err(e) if e.is_degenerate() => {
                    debug!(column = %profile.name, reason = %e, "Skipping outlier check");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if outliers > 0 {
                findings.push(Finding::statistical_outliers(&profile.name, outliers));
            }
        }

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IssueKind, Severity};
    use crate::detectors::test_support::*;

    fn readings(values: &[&'static str]) -> Vec<Vec<Option<&'static str>>> {
        values.iter().map(|v| vec![Some(*v)]).collect()
    }

    #[test]
    fn test_detects_spike() {
        let mut values = vec!["10"; 20];
        values.push("1000");
        let (table, profiles) = profiled(&["reading"], &readings(&values));
        let context = DetectionContext::new(&table, &profiles, reference_time());

        let findings = OutlierDetector.detect(&context).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind(), IssueKind::StatisticalOutlier);
        assert_eq!(findings[0].severity(), Severity::Info);
        assert_eq!(findings[0].count(), 1);
    }

    #[test]
    fn test_zero_spread_is_not_a_finding() {
        let (table, profiles) = profiled(&["reading"], &readings(&["5", "5", "5", "5"]));
        let context = DetectionContext::new(&table, &profiles, reference_time());
        assert!(OutlierDetector.detect(&context).unwrap().is_empty());
    }

    #[test]
    fn test_flat_column_does_not_stop_later_columns() {
        let mut rows: Vec<Vec<Option<&str>>> = (0..20)
            .map(|_| vec![Some("7"), Some("sensor"), Some("10")])
            .collect();
        rows.push(vec![Some("7"), Some("sensor"), Some("1000")]);
        let (table, profiles) = profiled(&["flat", "label", "reading"], &rows);
        let context = DetectionContext::new(&table, &profiles, reference_time());

        let findings = OutlierDetector.detect(&context).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].column(), Some("reading"));
        assert_eq!(findings[0].count(), 1);
    }

    #[test]
    fn test_small_sample_has_no_outliers() {
        // With n values the largest possible z-score is (n-1)/sqrt(n)
        let (table, profiles) = profiled(&["reading"], &readings(&["1", "2", "3", "100"]));
        let context = DetectionContext::new(&table, &profiles, reference_time());
        assert!(OutlierDetector.detect(&context).unwrap().is_empty());
    }
}

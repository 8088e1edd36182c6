//! Format validity: email addresses and dates in the future.

use super::{DetectionContext, Detector};
use crate::analyzers::SemanticType;
use crate::core::Finding;
use crate::error::Result;
use crate::predicates::IssuePredicate;

/// Checks `email` columns for malformed addresses and `date` columns for
/// dates after the reference time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatDetector;

impl Detector for FormatDetector {
    fn name(&self) -> &str {
        "format"
    }

    fn detect(&self, context: &DetectionContext<'_>) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for column in context.columns() {
            let (index, profile) = column?;
            match profile.semantic_type {
                SemanticType::Email => {
                    let invalid = IssuePredicate::InvalidEmail { column: index }
                        .matching_rows(context.table, context.now)?
                        .len();
                    if invalid > 0 {
                        findings.push(Finding::invalid_email_format(&profile.name, invalid));
                    }
                }
                SemanticType::Date => {
                    let future = IssuePredicate::FutureDate { column: index }
                        .matching_rows(context.table, context.now)?
                        .len();
                    if future > 0 {
                        findings.push(Finding::future_dates(&profile.name, future));
                    }
                }
                _ => {}
            }
        }

        Ok(findings)
    }
}

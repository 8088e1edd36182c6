//! Logical and business-rule consistency.

use super::{DetectionContext, Detector};
use crate::analyzers::SemanticType;
use crate::core::Finding;
use crate::error::Result;
use crate::predicates::{is_non_negative_column, IssuePredicate};

/// Checks that quantities are not negative and that related columns agree.
///
/// - numeric columns named like a quantity (`age`, `price`, `stock`, ...)
///   must not hold negative values
/// - the selling price must not be below the cost price
/// - the current stock must not be below the reorder level
///
/// The cross-column checks use the leftmost qualifying column of each role
/// and emit dataset-level findings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalDetector;

impl LogicalDetector {
    fn count(predicate: Option<IssuePredicate>, context: &DetectionContext<'_>) -> Result<usize> {
        match predicate {
            Some(predicate) => Ok(predicate.matching_rows(context.table, context.now)?.len()),
            None => Ok(0),
        }
    }
}

impl Detector for LogicalDetector {
    fn name(&self) -> &str {
        "logical"
    }

    fn detect(&self, context: &DetectionContext<'_>) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for column in context.columns() {
            let (index, profile) = column?;
            if profile.semantic_type != SemanticType::Numeric
                || !is_non_negative_column(&profile.name)
            {
                continue;
            }
            let negatives =
                Self::count(Some(IssuePredicate::NegativeValue { column: index }), context)?;
            if negatives > 0 {
                findings.push(Finding::negative_values(&profile.name, negatives));
            }
        }

        let below_cost = Self::count(IssuePredicate::selling_below_cost(context.table), context)?;
        if below_cost > 0 {
            findings.push(Finding::selling_below_cost(below_cost));
        }

        let below_reorder =
            Self::count(IssuePredicate::stock_below_reorder(context.table), context)?;
        if below_reorder > 0 {
            findings.push(Finding::stock_below_reorder(below_reorder));
        }

        Ok(findings)
    }
}

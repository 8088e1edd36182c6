//! Duplicate record detection.

use super::{DetectionContext, Detector};
use crate::core::Finding;
use crate::error::Result;
use crate::predicates::DuplicateGroups;

/// Counts rows that repeat an earlier row across all columns.
///
/// The first occurrence of each group is not counted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateDetector;

impl Detector for DuplicateDetector {
    fn name(&self) -> &str {
        "duplicates"
    }

    fn detect(&self, context: &DetectionContext<'_>) -> Result<Vec<Finding>> {
        let duplicates = DuplicateGroups::compute(context.table).duplicate_count();
        if duplicates == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::duplicate_records(duplicates)])
    }
}

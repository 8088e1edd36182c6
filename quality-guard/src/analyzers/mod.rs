//! Column analyzers: semantic type inference and profiling.
//!
//! - **Type Inference Engine** (`inference`): ordered rule chain deciding
//!   between email, date, numeric and text
//! - **Column Profiler** (`profiler`): completeness and distinctness counts
//!   plus the inferred type for each column
//!
//! Profiles are computed once per analysis and feed both the detectors and the
//! quality scorer.

pub mod inference;
pub mod profiler;

pub use inference::{SemanticType, TypeInference, TypeInferenceEngine, TypeRule, DEFAULT_RULES};
pub use profiler::{ColumnProfile, ColumnProfiler};

//! Fixed thresholds and keyword lists used by inference, detection and scoring.
//!
//! These values are part of the engine's observable behavior: the detectors and
//! the affected-row resolver must agree on them, so they live here as
//! constants rather than as runtime configuration.

/// Number of leading non-missing values examined by type inference.
pub const TYPE_SAMPLE_SIZE: usize = 100;

/// A column is `email` when more than this fraction of the sample are emails.
pub const EMAIL_MIN_FRACTION: f64 = 0.5;

/// A column is `date` when more than this fraction of the sample contain `-`.
pub const DATE_MIN_FRACTION: f64 = 0.5;

/// A column is `numeric` when more than this fraction of the sample parse as numbers.
pub const NUMERIC_MIN_FRACTION: f64 = 0.8;

/// Missing percentages strictly above this produce an `error` finding.
pub const MISSING_ERROR_PERCENTAGE: f64 = 10.0;

/// Values further than this many standard deviations from the mean are outliers.
pub const OUTLIER_STD_MULTIPLIER: f64 = 3.0;

/// Column-name fragments for quantities that must never be negative.
pub const NON_NEGATIVE_KEYWORDS: [&str; 7] = [
    "age", "price", "quantity", "stock", "amount", "cost", "selling",
];

/// Score penalty per `error` finding.
pub const ERROR_PENALTY: f64 = 5.0;

/// Score penalty per `warning` finding.
pub const WARNING_PENALTY: f64 = 2.0;

/// Upper bound of the quality score.
pub const MAX_QUALITY_SCORE: f64 = 100.0;

/// Default page size for affected-row queries.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Maximum number of sample outlier values reported in an outlier summary.
pub const OUTLIER_SAMPLE_VALUES: usize = 15;

/// Column-name fragments identifying the cost price column (all must appear).
pub const COST_PRICE_FRAGMENTS: [&str; 2] = ["cost", "price"];

/// Column-name fragments identifying the selling price column.
pub const SELLING_PRICE_FRAGMENTS: [&str; 2] = ["selling", "price"];

/// Column-name fragments identifying the current stock level column.
pub const CURRENT_STOCK_FRAGMENTS: [&str; 2] = ["stock", "current"];

/// Column-name fragments identifying the reorder threshold column.
pub const REORDER_FRAGMENTS: [&str; 1] = ["reorder"];

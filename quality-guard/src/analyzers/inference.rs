//! Semantic type inference for table columns.
//!
//! Inference looks at the first [`TYPE_SAMPLE_SIZE`] non-missing values of a
//! column and walks an ordered list of [`TypeRule`]s. The first rule whose
//! match fraction exceeds its threshold decides the type:
//!
//! 1. **email**: values matching `local@domain.tld`, more than 50%
//! 2. **date**: values whose text contains `-`, more than 50%
//! 3. **numeric**: values that coerce to a number, more than 80%
//! 4. otherwise **text**; an empty sample is **unknown**
//!
//! The date rule only checks for a dash. Identifiers such as `A-102` or
//! negative numbers can therefore be typed as dates.
//!
//! # Example
//!
//! ```rust
//! use quality_guard::analyzers::{SemanticType, TypeInferenceEngine};
//! use quality_guard::table::CellValue;
//!
//! let engine = TypeInferenceEngine::new();
//! let values = [
//!     CellValue::Text("a@b.com"),
//!     CellValue::Text("bad"),
//!     CellValue::Text("c@d.org"),
//! ];
//! assert_eq!(engine.infer(&values), SemanticType::Email);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::predicates::is_valid_email;
use crate::table::{CellValue, Table};
use crate::thresholds::{
    DATE_MIN_FRACTION, EMAIL_MIN_FRACTION, NUMERIC_MIN_FRACTION, TYPE_SAMPLE_SIZE,
};

/// The semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Email,
    Date,
    Numeric,
    Text,
    /// No non-missing values to look at
    Unknown,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Email => "email",
            SemanticType::Date => "date",
            SemanticType::Numeric => "numeric",
            SemanticType::Text => "text",
            SemanticType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the inference chain.
#[derive(Debug, Clone, Copy)]
pub struct TypeRule {
    pub semantic_type: SemanticType,
    /// The rule fires when strictly more than this fraction of the sample matches
    pub min_fraction: f64,
    matcher: fn(&CellValue<'_>) -> bool,
}

impl TypeRule {
    pub const fn new(
        semantic_type: SemanticType,
        min_fraction: f64,
        matcher: fn(&CellValue<'_>) -> bool,
    ) -> Self {
        Self {
            semantic_type,
            min_fraction,
            matcher,
        }
    }

    pub fn matches(&self, value: &CellValue<'_>) -> bool {
        (self.matcher)(value)
    }

    /// Number of sample values the rule matches.
    pub fn count_matches(&self, sample: &[CellValue<'_>]) -> usize {
        sample.iter().filter(|v| self.matches(v)).count()
    }

    fn fires(&self, matched: usize, sampled: usize) -> bool {
        matched as f64 > sampled as f64 * self.min_fraction
    }
}

fn looks_like_email(value: &CellValue<'_>) -> bool {
    value.text().is_some_and(|text| is_valid_email(&text))
}

fn contains_dash(value: &CellValue<'_>) -> bool {
    value.text().is_some_and(|text| text.contains('-'))
}

fn coerces_to_number(value: &CellValue<'_>) -> bool {
    value.as_number().is_some()
}

/// The inference chain in evaluation order.
pub const DEFAULT_RULES: [TypeRule; 3] = [
    TypeRule::new(SemanticType::Email, EMAIL_MIN_FRACTION, looks_like_email),
    TypeRule::new(SemanticType::Date, DATE_MIN_FRACTION, contains_dash),
    TypeRule::new(SemanticType::Numeric, NUMERIC_MIN_FRACTION, coerces_to_number),
];

/// How a type was chosen, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeInference {
    pub semantic_type: SemanticType,
    pub samples_analyzed: usize,
    /// Match fraction of each rule that was evaluated, in order
    pub evaluated: Vec<(SemanticType, f64)>,
}

/// Classifies column values with an ordered rule list.
#[derive(Debug, Clone)]
pub struct TypeInferenceEngine {
    rules: Vec<TypeRule>,
    sample_size: usize,
}

impl Default for TypeInferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInferenceEngine {
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
            sample_size: TYPE_SAMPLE_SIZE,
        }
    }

    pub fn rules(&self) -> &[TypeRule] {
        &self.rules
    }

    /// Infers the type of a sequence of non-missing values.
    ///
    /// Only the first values up to the sample size are examined.
    pub fn infer(&self, values: &[CellValue<'_>]) -> SemanticType {
        self.explain(values).semantic_type
    }

    /// Like [`infer`](Self::infer), but also reports the rule fractions.
    pub fn explain(&self, values: &[CellValue<'_>]) -> TypeInference {
        let sample = &values[..values.len().min(self.sample_size)];
        let mut evaluated = Vec::with_capacity(self.rules.len());

        if sample.is_empty() {
            return TypeInference {
                semantic_type: SemanticType::Unknown,
                samples_analyzed: 0,
                evaluated,
            };
        }

        for rule in &self.rules {
            let matched = rule.count_matches(sample);
            evaluated.push((rule.semantic_type, matched as f64 / sample.len() as f64));
            if rule.fires(matched, sample.len()) {
                return TypeInference {
                    semantic_type: rule.semantic_type,
                    samples_analyzed: sample.len(),
                    evaluated,
                };
            }
        }

        TypeInference {
            semantic_type: SemanticType::Text,
            samples_analyzed: sample.len(),
            evaluated,
        }
    }

    /// Infers the type of a table column from its leading non-missing cells.
    #[instrument(skip(self, table))]
    pub fn infer_column(&self, table: &Table, column: usize) -> SemanticType {
        let sample: Vec<CellValue<'_>> = table
            .column_cells(column)
            .filter(|cell| !cell.is_missing())
            .take(self.sample_size)
            .collect();
        let inference = self.explain(&sample);

        debug!(
            column,
            semantic_type = %inference.semantic_type,
            samples = inference.samples_analyzed,
            "Inferred column type"
        );
        inference.semantic_type
    }
}

//! One-decimal percentages as they appear in reports.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A percentage rounded to one decimal place.
///
/// Serialized as a string (`"25.0"`) to match the report format; deserializes
/// from either a string or a number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Percentage(f64);

impl Percentage {
    /// `part / whole * 100`, rounded to one decimal. Zero when `whole` is zero.
    pub fn of(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self(0.0);
        }
        Self(round_one_decimal(part as f64 / whole as f64 * 100.0))
    }

    /// Wraps an already computed percentage, rounding it to one decimal.
    pub fn from_value(value: f64) -> Self {
        Self(round_one_decimal(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Rounds half-to-even on the exact binary value, the same digits `{:.1}` prints.
fn round_one_decimal(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PercentageVisitor;

        impl Visitor<'_> for PercentageVisitor {
            type Value = Percentage;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a percentage as a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Percentage, E> {
                v.trim()
                    .parse::<f64>()
                    .map(Percentage::from_value)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Percentage, E> {
                Ok(Percentage::from_value(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Percentage, E> {
                Ok(Percentage::from_value(v as f64))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Percentage, E> {
                Ok(Percentage::from_value(v as f64))
            }
        }

        deserializer.deserialize_any(PercentageVisitor)
    }
}

//! Percentage calculation from raw counters

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::{CategoryCoverage, CoverageMetrics};
use crate::error::{CoverageError, CoverageResult};

/// Decimal places for per-category percentages
pub const CATEGORY_PRECISION: usize = 2;
/// Decimal places for the combined total percentage
pub const TOTAL_PRECISION: usize = 3;

/// A percentage rounded to a fixed number of decimal places.
///
/// Displays (and serializes) as a fixed-precision decimal string without a
/// percent sign, e.g. `87.50`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage {
    value: f64,
    precision: usize,
}

impl Percentage {
    /// Round `value` half away from zero to `precision` decimals.
    ///
    /// Rounding applies to the binary value as-is, with no pre-rounding, so
    /// an input like `1.005` (stored as 1.00499...) rounds down to `1.00`.
    pub fn new(value: f64, precision: usize) -> Self {
        let factor = 10f64.powi(precision as i32);
        let rounded = (value * factor).round() / factor;
        Self {
            // Avoid printing "-0.00"
            value: if rounded == 0.0 { 0.0 } else { rounded },
            precision,
        }
    }

    /// The full-coverage value
    pub fn full(precision: usize) -> Self {
        Self::new(100.0, precision)
    }

    /// Parse a decimal string such as `"87.50"`
    pub fn parse(text: &str, precision: usize) -> Option<Self> {
        let value = text.trim().trim_end_matches('%').parse::<f64>().ok()?;
        value.is_finite().then(|| Self::new(value, precision))
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn precision(&self) -> usize {
        self.precision
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.precision, self.value)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Percentage {
    /// Accepts `"87.50"` as well as a bare number, at category precision
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Percentage::parse(&text, CATEGORY_PRECISION).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid percentage: {:?}", text))
            }),
            Raw::Number(value) => Ok(Percentage::new(value, CATEGORY_PRECISION)),
        }
    }
}

/// `covered / total * 100`, or full coverage when there is nothing to cover
pub fn ratio_or_full(covered: u64, total: u64, precision: usize) -> Percentage {
    if total == 0 {
        return Percentage::full(precision);
    }
    if covered > total {
        tracing::warn!(covered, total, "covered count exceeds total");
    }
    Percentage::new(covered as f64 / total as f64 * 100.0, precision)
}

/// Classes, methods and lines coverage for `check-coverage`.
///
/// Classes use the derived fully-covered class count over the summary class
/// total. Lines are the summary statements.
pub fn category_coverage(metrics: &CoverageMetrics) -> CategoryCoverage {
    CategoryCoverage {
        classes: ratio_or_full(metrics.covered_classes, metrics.classes, CATEGORY_PRECISION),
        methods: ratio_or_full(metrics.covered_methods, metrics.methods, CATEGORY_PRECISION),
        lines: ratio_or_full(
            metrics.covered_statements,
            metrics.statements,
            CATEGORY_PRECISION,
        ),
    }
}

/// Combined element, method and statement coverage for `coverage-compare`
pub fn total_coverage(metrics: &CoverageMetrics) -> CoverageResult<Percentage> {
    // Summed in u128 so three u64 counters cannot overflow
    let covered = metrics.covered_elements as u128
        + metrics.covered_methods as u128
        + metrics.covered_statements as u128;
    let total = metrics.elements as u128 + metrics.methods as u128 + metrics.statements as u128;

    if total == 0 {
        return Err(CoverageError::InsufficientData);
    }

    Ok(Percentage::new(
        covered as f64 / total as f64 * 100.0,
        TOTAL_PRECISION,
    ))
}

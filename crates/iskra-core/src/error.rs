use std::fmt;

use crate::metrics::Axis;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A numeric parameter is NaN, infinite, or outside its allowed range.
    OutOfRange {
        field: String,
        value: f64,
        expected: &'static str,
    },
    /// Rhythm weights must sum to one.
    WeightSum(f64),
    /// A regex pattern in the lexicon failed to compile.
    InvalidPattern(String),
    /// A per-axis table lacks an axis.
    MissingAxis { field: &'static str, axis: Axis },
}

impl ConfigError {
    pub(crate) fn out_of_range(field: impl Into<String>, value: f64, expected: &'static str) -> Self {
        ConfigError::OutOfRange {
            field: field.into(),
            value,
            expected,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "{field} = {value} is out of range (expected {expected})"),
            ConfigError::WeightSum(sum) => {
                write!(f, "rhythm weights must sum to 1.0, got {sum}")
            }
            ConfigError::InvalidPattern(msg) => write!(f, "invalid lexicon pattern: {msg}"),
            ConfigError::MissingAxis { field, axis } => write!(f, "{field} has no value for {axis}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<regex::Error> for ConfigError {
    fn from(e: regex::Error) -> Self {
        ConfigError::InvalidPattern(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Check that `value` is finite and inside `[lo, hi]`.
pub(crate) fn check_unit(field: &str, value: f64, lo: f64, hi: f64, expected: &'static str) -> Result<()> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(())
    } else {
        Err(ConfigError::out_of_range(field, value, expected))
    }
}

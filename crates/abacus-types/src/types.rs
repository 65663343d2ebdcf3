use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A numeric operand or result.
///
/// Integers stay integral through `+ - * ** // %` as long as both sides are
/// integral; any float operand (or `/`) produces a float.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A double-precision float.
    Float(f64),
}

/// Returned when an operand token is neither an integer nor a float literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid number literal '{input}'")]
pub struct ParseNumberError {
    /// The rejected token.
    pub input: String,
}

impl Number {
    /// Numeric value widened to `f64`.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    /// The integer payload, if this is an `Integer`.
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(_) => None,
        }
    }

    /// `true` for the `Integer` variant.
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// `true` when the value is zero, regardless of variant.
    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(i) => *i == 0,
            Number::Float(f) => *f == 0.0,
        }
    }

    /// Type checking utility
    pub const fn type_name(&self) -> &'static str {
        match self {
            Number::Integer(_) => "int",
            Number::Float(_) => "float",
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a.partial_cmp(b),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Float(fl) => f.write_str(&format_float(*fl)),
        }
    }
}

/// Shortest round-trip rendering that always shows the value is a float:
/// `4.0`, `3.5`, `1e+16`, `1e-05`, `inf`, `nan`.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{value:e}");
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or_default();
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exponent.abs())
            }
            None => scientific,
        };
    }

    let plain = value.to_string();
    if plain.contains('.') { plain } else { format!("{plain}.0") }
}

impl FromStr for Number {
    type Err = ParseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Ok(i) = token.parse::<i64>() {
            return Ok(Number::Integer(i));
        }
        token
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|_| ParseNumberError { input: s.to_string() })
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(i64::from(value))
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

//! Request payload helpers shared by the resource handlers.
//!
//! Browser forms submit numeric fields as strings, so numbers are accepted either
//! as JSON numbers or as numeric text and converted once, here, before any handler
//! touches storage.

use crate::errors::{Error, Result};
use serde::{Deserialize, de::DeserializeOwned};

/// A JSON value that should be usable as a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    /// Integral JSON number
    Int(i64),
    /// Fractional JSON number
    Float(f64),
    /// Numeric text, e.g. `"5000"` from a form input
    Text(String),
}

impl Numeric {
    /// Converts to a finite float, naming `field` in the error.
    pub fn to_f64(&self, field: &str) -> Result<f64> {
        #[allow(clippy::cast_precision_loss)]
        let value = match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| Error::validation(format!("{field} must be a number")))
    }

    /// Converts to an integer, naming `field` in the error.
    ///
    /// Fractional values are rejected rather than truncated, and whole values
    /// outside the `i64` range are rejected rather than saturated.
    pub fn to_i64(&self, field: &str) -> Result<i64> {
        let invalid = || Error::validation(format!("{field} must be a whole number"));
        let value = match self {
            Self::Int(i) => return Ok(*i),
            Self::Float(f) => *f,
            Self::Text(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(i);
                }
                s.parse::<f64>().map_err(|_| invalid())?
            }
        };
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(invalid());
        }
        whole_to_i64(value).ok_or_else(|| Error::validation(format!("{field} is out of range")))
    }
}

/// 2^63, the first whole float past `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Converts a whole float to `i64`, or None when it does not fit.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn whole_to_i64(value: f64) -> Option<i64> {
    (-I64_BOUND..I64_BOUND)
        .contains(&value)
        .then_some(value as i64)
}

/// Parses a request body into a payload struct.
///
/// An empty body is treated as an empty object so that missing-field checks
/// produce the usual validation message.
pub fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| Error::validation(format!("Invalid JSON body: {e}")))
}

/// Trims a text field and rejects it when nothing is left.
pub fn non_empty(value: String, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

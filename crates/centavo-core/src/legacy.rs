//! # Legacy Column Values
//!
//! The legacy decimal column predates the cents column and was written by
//! several generations of clients. A value read back from it can be text,
//! an integer, a float, or nothing at all.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stored value          LegacyDecimal           Cents                    │
//! │  ─────────────         ─────────────           ─────                    │
//! │  "10.00"           →   Text("10.00")       →   1000                     │
//! │  "10,005"          →   Text("10,005")      →   1001  (half away from 0) │
//! │  10                →   Integer(10)         →   1000                     │
//! │  10.05             →   Real(10.05)         →   1005  (via "10.05")      │
//! │  NULL / true / []  →   Null                →   0                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each shape has exactly one conversion; no runtime type sniffing happens
//! after the value has been classified.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::codec::decimal_text_to_cents_rounded;
use crate::money::MoneyCents;

/// A legacy decimal column value, classified by its stored shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LegacyDecimal {
    /// Decimal text, usually `-?\d+\.\d{2}` but not guaranteed.
    Text(String),
    /// A whole number of major units.
    Integer(i64),
    /// A binary float. Only ever rendered back to text, never multiplied.
    Real(f64),
    /// Absent, or a shape that cannot hold an amount.
    #[default]
    Null,
}

impl LegacyDecimal {
    /// Converts the value to cents, rounding to the nearest cent.
    ///
    /// Never fails: malformed and absent values are zero.
    ///
    /// ```rust
    /// use centavo_core::LegacyDecimal;
    ///
    /// assert_eq!(LegacyDecimal::from("10.00").to_cents().cents(), 1000);
    /// assert_eq!(LegacyDecimal::Real(10.05).to_cents().cents(), 1005);
    /// assert_eq!(LegacyDecimal::Null.to_cents().cents(), 0);
    /// ```
    pub fn to_cents(&self) -> MoneyCents {
        match self {
            LegacyDecimal::Text(text) => text_to_cents(text),
            LegacyDecimal::Integer(units) => integer_to_cents(*units),
            LegacyDecimal::Real(value) => real_to_cents(*value),
            LegacyDecimal::Null => MoneyCents::zero(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, LegacyDecimal::Null)
    }
}

fn text_to_cents(text: &str) -> MoneyCents {
    decimal_text_to_cents_rounded(text)
}

fn integer_to_cents(units: i64) -> MoneyCents {
    MoneyCents::from_units(units)
}

/// Rust renders floats as the shortest decimal that round-trips, without
/// exponent notation, so `10.05` becomes the text `"10.05"` rather than
/// `1004.9999999999999` cents.
fn real_to_cents(value: f64) -> MoneyCents {
    if !value.is_finite() {
        return MoneyCents::zero();
    }
    text_to_cents(&value.to_string())
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for LegacyDecimal {
    fn from(text: &str) -> Self {
        LegacyDecimal::Text(text.to_string())
    }
}

impl From<String> for LegacyDecimal {
    fn from(text: String) -> Self {
        LegacyDecimal::Text(text)
    }
}

impl From<Option<&str>> for LegacyDecimal {
    fn from(text: Option<&str>) -> Self {
        text.map_or(LegacyDecimal::Null, LegacyDecimal::from)
    }
}

impl From<Option<String>> for LegacyDecimal {
    fn from(text: Option<String>) -> Self {
        text.map_or(LegacyDecimal::Null, LegacyDecimal::Text)
    }
}

impl From<i64> for LegacyDecimal {
    fn from(units: i64) -> Self {
        LegacyDecimal::Integer(units)
    }
}

impl From<f64> for LegacyDecimal {
    fn from(value: f64) -> Self {
        LegacyDecimal::Real(value)
    }
}

/// JSON payloads from the backend carry the legacy column untyped.
impl From<&Value> for LegacyDecimal {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(text) => LegacyDecimal::Text(text.clone()),
            Value::Number(number) => {
                if let Some(units) = number.as_i64() {
                    LegacyDecimal::Integer(units)
                } else if number.as_u64().is_some() {
                    LegacyDecimal::Integer(i64::MAX)
                } else {
                    number.as_f64().map_or(LegacyDecimal::Null, LegacyDecimal::Real)
                }
            }
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => LegacyDecimal::Null,
        }
    }
}

impl Serialize for LegacyDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LegacyDecimal::Text(text) => serializer.serialize_str(text),
            LegacyDecimal::Integer(units) => serializer.serialize_i64(*units),
            LegacyDecimal::Real(value) => serializer.serialize_f64(*value),
            LegacyDecimal::Null => serializer.serialize_none(),
        }
    }
}

/// Accepts any JSON shape; unusable shapes become [`LegacyDecimal::Null`].
impl<'de> Deserialize<'de> for LegacyDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(LegacyDecimal::from(&value))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_shape() {
        assert_eq!(LegacyDecimal::from("10.00").to_cents().cents(), 1000);
        assert_eq!(LegacyDecimal::from("1.234,56").to_cents().cents(), 123456);
        assert_eq!(LegacyDecimal::from("-3.50").to_cents().cents(), -350);
        assert_eq!(LegacyDecimal::from("garbage").to_cents().cents(), 0);
        assert_eq!(LegacyDecimal::from("").to_cents().cents(), 0);
    }

    #[test]
    fn test_text_rounds_to_nearest_cent() {
        assert_eq!(LegacyDecimal::from("10.005").to_cents().cents(), 1001);
        assert_eq!(LegacyDecimal::from("10.0049").to_cents().cents(), 1000);
        assert_eq!(LegacyDecimal::from("-10.005").to_cents().cents(), -1001);
    }

    #[test]
    fn test_integer_shape_is_whole_units() {
        assert_eq!(LegacyDecimal::Integer(10).to_cents().cents(), 1000);
        assert_eq!(LegacyDecimal::Integer(-2).to_cents().cents(), -200);
        assert_eq!(LegacyDecimal::Integer(i64::MAX).to_cents().cents(), i64::MAX);
    }

    #[test]
    fn test_real_shape_avoids_float_multiplication() {
        // 10.05 * 100.0 == 1004.9999999999999 in binary floating point
        assert_eq!(LegacyDecimal::Real(10.05).to_cents().cents(), 1005);
        assert_eq!(LegacyDecimal::Real(0.1 + 0.2).to_cents().cents(), 30);
        assert_eq!(LegacyDecimal::Real(-7.5).to_cents().cents(), -750);
        assert_eq!(LegacyDecimal::Real(0.125).to_cents().cents(), 13);
    }

    #[test]
    fn test_real_non_finite_is_zero() {
        assert_eq!(LegacyDecimal::Real(f64::NAN).to_cents().cents(), 0);
        assert_eq!(LegacyDecimal::Real(f64::INFINITY).to_cents().cents(), 0);
        assert_eq!(LegacyDecimal::Real(f64::NEG_INFINITY).to_cents().cents(), 0);
    }

    #[test]
    fn test_null_shape() {
        assert_eq!(LegacyDecimal::Null.to_cents().cents(), 0);
        assert!(LegacyDecimal::from(None::<&str>).is_null());
        assert!(LegacyDecimal::default().is_null());
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(LegacyDecimal::from(&json!("12.30")), LegacyDecimal::Text("12.30".into()));
        assert_eq!(LegacyDecimal::from(&json!(12)), LegacyDecimal::Integer(12));
        assert_eq!(LegacyDecimal::from(&json!(12.5)), LegacyDecimal::Real(12.5));
        assert_eq!(LegacyDecimal::from(&json!(u64::MAX)), LegacyDecimal::Integer(i64::MAX));
        assert!(LegacyDecimal::from(&json!(null)).is_null());
        assert!(LegacyDecimal::from(&json!(true)).is_null());
        assert!(LegacyDecimal::from(&json!([1, 2])).is_null());
        assert!(LegacyDecimal::from(&json!({"amount": 1})).is_null());
    }

    #[test]
    fn test_deserialize_any_shape() {
        #[derive(Deserialize)]
        struct Row {
            amount: LegacyDecimal,
        }

        let row: Row = serde_json::from_str(r#"{"amount": "7.25"}"#).unwrap();
        assert_eq!(row.amount.to_cents().cents(), 725);

        let row: Row = serde_json::from_str(r#"{"amount": false}"#).unwrap();
        assert!(row.amount.is_null());
    }

    #[test]
    fn test_serialize_keeps_shape() {
        assert_eq!(serde_json::to_string(&LegacyDecimal::from("1.00")).unwrap(), r#""1.00""#);
        assert_eq!(serde_json::to_string(&LegacyDecimal::Integer(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&LegacyDecimal::Null).unwrap(), "null");
    }
}

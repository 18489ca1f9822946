//! Typed cell values for aggregation
//!
//! Cells are stored as text. Aggregation coerces each cell into a [`Value`]
//! with a fixed fallback order: a value with exactly one `.` is a float, a
//! value made only of ASCII digits is an integer, anything else stays text.

use std::cmp::Ordering;
use std::fmt;

/// A coerced cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value (64-bit)
    Integer(i64),
    /// Float value (64-bit)
    Float(f64),
    /// Anything that is not numeric
    Text(String),
}

impl Value {
    /// Coerce a stored cell
    pub fn coerce(raw: &str) -> Value {
        if raw.matches('.').count() == 1 {
            return match raw.parse::<f64>() {
                Ok(f) => Value::Float(f),
                Err(_) => Value::Text(raw.to_string()),
            };
        }

        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            return match raw.parse::<i64>() {
                Ok(i) => Value::Integer(i),
                // Too many digits for i64
                Err(_) => raw
                    .parse::<f64>()
                    .map(Value::Float)
                    .unwrap_or_else(|_| Value::Text(raw.to_string())),
            };
        }

        Value::Text(raw.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Try to convert to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Text(_) => "TEXT",
        }
    }

    /// Compare two values. Numbers compare with numbers and text with text.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Add two numeric values; integer overflow widens to float
    pub fn add(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(
                a.checked_add(*b)
                    .map(Value::Integer)
                    .unwrap_or(Value::Float(*a as f64 + *b as f64)),
            ),
            (Value::Float(a), Value::Float(b)) => Some(Value::Float(a + b)),
            (Value::Integer(a), Value::Float(b)) => Some(Value::Float(*a as f64 + b)),
            (Value::Float(a), Value::Integer(b)) => Some(Value::Float(a + *b as f64)),
            _ => None,
        }
    }
}

/// Render a float the way result cells expect: whole numbers keep a
/// trailing `.0`, so an average of 53000 renders as `53000.0`. Magnitudes of
/// at least 1e16 or below 1e-4 use a signed two-digit exponent (`1e+16`,
/// `1.5e-05`).
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return (if f > 0.0 { "inf" } else { "-inf" }).to_string();
    }

    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(f);
    }
    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

fn format_exponent(f: f64) -> String {
    // `{:e}` yields the shortest mantissa, e.g. `1.5e-5`
    let formatted = format!("{:e}", f);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", format_float(*n)),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_order() {
        assert_eq!(Value::coerce("50000"), Value::Integer(50000));
        assert_eq!(Value::coerce("007"), Value::Integer(7));
        assert_eq!(Value::coerce("1.5"), Value::Float(1.5));
        assert_eq!(Value::coerce(".5"), Value::Float(0.5));
        assert_eq!(Value::coerce("John"), Value::from("John"));
        assert_eq!(Value::coerce("-5"), Value::from("-5"));
        assert_eq!(Value::coerce("1.2.3"), Value::from("1.2.3"));
        assert_eq!(Value::coerce("v1.2"), Value::from("v1.2"));
        assert_eq!(Value::coerce(""), Value::from(""));
        assert_eq!(Value::coerce("2024-01-15"), Value::from("2024-01-15"));
    }

    #[test]
    fn test_coerce_huge_integer() {
        assert_eq!(
            Value::coerce("99999999999999999999"),
            Value::Float(99999999999999999999.0)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Integer(265000).to_string(), "265000");
        assert_eq!(Value::Float(53000.0).to_string(), "53000.0");
        assert_eq!(Value::Float(2.25).to_string(), "2.25");
        assert_eq!(Value::Float(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Value::from("HR").to_string(), "HR");
    }

    #[test]
    fn test_display_exponent_range() {
        assert_eq!(Value::Float(1e16).to_string(), "1e+16");
        assert_eq!(Value::Float(1.5e20).to_string(), "1.5e+20");
        assert_eq!(Value::Float(-2.5e123).to_string(), "-2.5e+123");
        assert_eq!(Value::Float(1e-5).to_string(), "1e-05");
        assert_eq!(Value::Float(1.25e-7).to_string(), "1.25e-07");
        assert_eq!(Value::Float(9999999999999998.0).to_string(), "9999999999999998.0");
        assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Value::Float(0.0).to_string(), "0.0");
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            Value::Integer(2).compare(&Value::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from("Alice").compare(&Value::from("Bob")),
            Some(Ordering::Less)
        );
        assert_eq!(Value::Integer(1).compare(&Value::from("1")), None);
    }

    #[test]
    fn test_add() {
        assert_eq!(
            Value::Integer(2).add(&Value::Integer(3)),
            Some(Value::Integer(5))
        );
        assert_eq!(
            Value::Integer(2).add(&Value::Float(0.5)),
            Some(Value::Float(2.5))
        );
        assert_eq!(
            Value::Integer(i64::MAX).add(&Value::Integer(1)),
            Some(Value::Float(i64::MAX as f64 + 1.0))
        );
        assert_eq!(Value::Integer(2).add(&Value::from("x")), None);
    }
}

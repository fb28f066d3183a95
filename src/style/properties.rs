//! Property conversions: loosely typed values into typed layout values.
//!
//! Every conversion comes in two flavours. The `try_*` functions report a
//! [`PropertyError`]; the plain functions are what the cascade and layout core
//! use and fall back to the type's zero value (or a supplied default) instead.

use crate::document::Value;
use crate::geometry::Spacing;

/// Errors from strict property conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    #[error("invalid value for {property}: {message}")]
    InvalidValue { property: String, message: String },
}

fn invalid(property: &str, message: String) -> PropertyError {
    PropertyError::InvalidValue { property: property.into(), message }
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Parse a number.
pub fn try_number(property: &str, value: &Value) -> Result<f64, PropertyError> {
    value
        .try_f64()
        .ok_or_else(|| invalid(property, format!("expected a number, got {value:?}")))
}

/// A number, or `default` when the value is missing. Unparsable values read
/// as `0`.
pub fn number(value: Option<&Value>, default: f64) -> f64 {
    value.map(Value::as_f64).unwrap_or(default)
}

/// A rounded integer, or `default` when the value is missing.
pub fn int(value: Option<&Value>, default: i32) -> i32 {
    value.map(|v| v.as_f64().round() as i32).unwrap_or(default)
}

/// A bool, or `default` when the value is missing.
pub fn boolean(value: Option<&Value>, default: bool) -> bool {
    value.map(Value::as_bool).unwrap_or(default)
}

/// The text of a value, empty when missing.
pub fn text(value: Option<&Value>) -> String {
    value.map(|v| v.as_text().into_owned()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Spacing (margin, padding, border)
// ---------------------------------------------------------------------------

/// Parse 1-4 numbers separated by spaces or commas into a [`Spacing`].
///
/// - 1 value: all sides
/// - 2 values: vertical, horizontal
/// - 3 values: top, horizontal, bottom
/// - 4 values: top, right, bottom, left
pub fn try_spacing(property: &str, value: &Value) -> Result<Spacing, PropertyError> {
    let text = value.as_text();
    let values = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map(|n| n.round() as i32)
                .map_err(|_| invalid(property, format!("not a number: {s:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match values.as_slice() {
        [all] => Ok(Spacing::all(*all)),
        [vertical, horizontal] => Ok(Spacing::new(*vertical, *horizontal, *vertical, *horizontal)),
        [top, horizontal, bottom] => Ok(Spacing::new(*top, *horizontal, *bottom, *horizontal)),
        [top, right, bottom, left] => Ok(Spacing::new(*top, *right, *bottom, *left)),
        other => Err(invalid(property, format!("expected 1-4 values, got {}", other.len()))),
    }
}

/// A [`Spacing`], or `default` when missing. Malformed values read as zero.
pub fn spacing(property: &str, value: Option<&Value>, default: Spacing) -> Spacing {
    match value {
        None => default,
        Some(v) => try_spacing(property, v).unwrap_or_else(|err| {
            log::debug!("{err}");
            Spacing::ZERO
        }),
    }
}

// ---------------------------------------------------------------------------
// Length (absolute or percentage)
// ---------------------------------------------------------------------------

/// A position or extent, absolute or relative to the parent's content box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Length {
    Absolute(f64),
    Percent(f64),
}

impl Length {
    /// Resolve against an extent of the reference box, rounded to whole pixels.
    pub fn resolve(self, extent: i32) -> i32 {
        match self {
            Length::Absolute(v) => v.round() as i32,
            Length::Percent(p) => (extent as f64 * p / 100.0).round() as i32,
        }
    }
}

/// Parse `"12"`, `"12.5"` or `"50%"`.
pub fn try_length(property: &str, value: &Value) -> Result<Length, PropertyError> {
    if let Value::Number(n) = value {
        return Ok(Length::Absolute(*n));
    }
    let text = value.as_text();
    let text = text.trim();
    let (digits, percent) = match text.strip_suffix('%') {
        Some(rest) => (rest.trim(), true),
        None => (text, false),
    };
    let n = digits
        .parse::<f64>()
        .map_err(|_| invalid(property, format!("expected a length, got {text:?}")))?;
    Ok(if percent { Length::Percent(n) } else { Length::Absolute(n) })
}

/// A [`Length`], or `default` when missing. Malformed values read as zero.
pub fn length(property: &str, value: Option<&Value>, default: Length) -> Length {
    match value {
        None => default,
        Some(v) => try_length(property, v).unwrap_or_else(|err| {
            log::debug!("{err}");
            Length::Absolute(0.0)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_one_value() {
        assert_eq!(try_spacing("margin", &Value::from("5")).unwrap(), Spacing::all(5));
        assert_eq!(try_spacing("margin", &Value::Number(3.0)).unwrap(), Spacing::all(3));
    }

    #[test]
    fn spacing_two_values() {
        assert_eq!(
            try_spacing("margin", &Value::from("1 2")).unwrap(),
            Spacing::new(1, 2, 1, 2)
        );
    }

    #[test]
    fn spacing_three_values() {
        assert_eq!(
            try_spacing("margin", &Value::from("1, 2, 3")).unwrap(),
            Spacing::new(1, 2, 3, 2)
        );
    }

    #[test]
    fn spacing_four_values() {
        assert_eq!(
            try_spacing("padding", &Value::from("1 2 3 4")).unwrap(),
            Spacing::new(1, 2, 3, 4)
        );
    }

    #[test]
    fn spacing_errors() {
        assert!(try_spacing("margin", &Value::from("")).is_err());
        assert!(try_spacing("margin", &Value::from("1 2 3 4 5")).is_err());
        assert!(try_spacing("margin", &Value::from("wide")).is_err());
    }

    #[test]
    fn lenient_spacing_degrades_to_zero() {
        assert_eq!(spacing("margin", Some(&Value::from("wide")), Spacing::all(5)), Spacing::ZERO);
        assert_eq!(spacing("margin", None, Spacing::all(5)), Spacing::all(5));
    }

    #[test]
    fn length_forms() {
        assert_eq!(try_length("pos-x", &Value::from("50%")).unwrap(), Length::Percent(50.0));
        assert_eq!(try_length("pos-x", &Value::from("12")).unwrap(), Length::Absolute(12.0));
        assert_eq!(try_length("pos-x", &Value::Number(7.5)).unwrap(), Length::Absolute(7.5));
        assert!(try_length("pos-x", &Value::from("left")).is_err());
    }

    #[test]
    fn length_resolution_rounds() {
        assert_eq!(Length::Percent(50.0).resolve(101), 51);
        assert_eq!(Length::Percent(100.0).resolve(80), 80);
        assert_eq!(Length::Absolute(12.4).resolve(1000), 12);
    }

    #[test]
    fn error_message() {
        let err = try_number("border", &Value::from("thick")).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for border: expected a number, got String(\"thick\")");
    }

    #[test]
    fn lenient_scalars() {
        assert_eq!(number(Some(&Value::from("x")), 3.0), 0.0);
        assert_eq!(number(None, 3.0), 3.0);
        assert_eq!(int(Some(&Value::from("2.6")), 0), 3);
        assert!(boolean(Some(&Value::from("true")), false));
        assert_eq!(text(None), "");
    }
}

//! Numeric field validation.
//!
//! The field accepts signed whole numbers. Surrounding whitespace is ignored,
//! and decimal or exponent notation is tolerated when it denotes an integral
//! value (`"3.0"`, `"1e2"`). Empty text is the cleared state, not an error.

use crate::error::InputError;
use serde::{Deserialize, Serialize};

/// Parse raw field text.
///
/// Returns `Ok(None)` for the cleared state and `Ok(Some(n))` for a number.
pub fn parse_input(raw: &str) -> Result<Option<i64>, InputError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Some(n));
    }

    let value: f64 = text
        .parse()
        .map_err(|_| InputError::NotANumber(raw.to_string()))?;
    if !value.is_finite() {
        return Err(InputError::NotANumber(raw.to_string()));
    }
    if value.fract() != 0.0 {
        return Err(InputError::Fractional(raw.to_string()));
    }
    // i64::MAX is not representable as f64; 2^63 is the first value past it.
    if value < -9_223_372_036_854_775_808.0 || value >= 9_223_372_036_854_775_808.0 {
        return Err(InputError::OutOfRange(raw.to_string()));
    }
    Ok(Some(value as i64))
}

/// State of the numeric input field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    /// Text exactly as typed
    pub raw: String,
    /// Last parsed value, 0 when cleared or invalid
    pub pending: i64,
    /// Raw text failed to parse
    pub invalid: bool,
}

impl InputField {
    /// Replace the field text and re-validate it.
    pub fn set(&mut self, raw: impl Into<String>) -> Result<(), InputError> {
        self.raw = raw.into();
        match parse_input(&self.raw) {
            Ok(value) => {
                self.pending = value.unwrap_or(0);
                self.invalid = false;
                Ok(())
            }
            Err(err) => {
                self.pending = 0;
                self.invalid = true;
                Err(err)
            }
        }
    }

    /// Whether the field is in the cleared state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Whether add/subtract may use the field.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        !self.invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_plain_integers() {
        assert_eq!(parse_input("10"), Ok(Some(10)));
        assert_eq!(parse_input("-12"), Ok(Some(-12)));
        assert_eq!(parse_input("+5"), Ok(Some(5)));
        assert_eq!(parse_input("  42 "), Ok(Some(42)));
        assert_eq!(parse_input("0"), Ok(Some(0)));
    }

    #[test]
    fn test_parse_cleared_state() {
        assert_eq!(parse_input(""), Ok(None));
        assert_eq!(parse_input("   "), Ok(None));
    }

    #[test]
    fn test_parse_integral_float_notation() {
        assert_eq!(parse_input("3.0"), Ok(Some(3)));
        assert_eq!(parse_input("1e2"), Ok(Some(100)));
        assert_eq!(parse_input("-2.000"), Ok(Some(-2)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_input("abc"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_input("12abc"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_input("--1"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_input("NaN"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_input("inf"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_input("1 2"), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn test_parse_rejects_fractions() {
        assert!(matches!(parse_input("1.5"), Err(InputError::Fractional(_))));
        assert!(matches!(parse_input("-0.25"), Err(InputError::Fractional(_))));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            parse_input("99999999999999999999"),
            Err(InputError::OutOfRange(_))
        ));
        assert!(matches!(parse_input("1e30"), Err(InputError::OutOfRange(_))));
    }

    #[test]
    fn test_field_valid_then_invalid_then_cleared() {
        let mut field = InputField::default();

        assert!(field.set("7").is_ok());
        assert_eq!(field.pending, 7);
        assert!(!field.invalid);

        assert!(field.set("7x").is_err());
        assert_eq!(field.pending, 0);
        assert!(field.invalid);
        assert!(!field.is_usable());
        assert_eq!(field.raw, "7x");

        assert!(field.set("").is_ok());
        assert_eq!(field.pending, 0);
        assert!(!field.invalid);
        assert!(field.is_empty());
    }

    proptest! {
        #[test]
        fn prop_every_i64_round_trips_through_text(n in any::<i64>()) {
            let mut field = InputField::default();
            prop_assert!(field.set(n.to_string()).is_ok());
            prop_assert_eq!(field.pending, n);
            prop_assert!(!field.invalid);
        }

        #[test]
        fn prop_alphabetic_text_is_invalid(s in "[a-zA-Z]{1,12}") {
            // "inf", "nan" and friends are alphabetic too and must still fail
            let mut field = InputField::default();
            prop_assert!(field.set(s).is_err());
            prop_assert!(field.invalid);
            prop_assert_eq!(field.pending, 0);
        }
    }
}

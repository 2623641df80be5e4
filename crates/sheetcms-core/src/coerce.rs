//! Typed reads of raw string cells
//!
//! Every strict coercion returns `Err(CoercionWarning)` for "no value", which
//! keeps an absent or invalid cell distinct from a valid `false`, `0` or empty
//! list. Callers decide whether to log and skip.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Separator used by [`coerce_array`] unless configured otherwise
pub const DEFAULT_SEPARATOR: &str = ",";

static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<sign>[-+])?(?P<body>[0-9]+|Infinity)$").expect("valid integer pattern")
});

/// Why a cell could not be read as the requested type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionWarning {
    /// An array value has no separator in it
    #[error("value \"{value}\" doesn't contain the separator \"{separator}\"")]
    MissingSeparator {
        /// Raw cell
        value: String,
        /// Separator that was expected
        separator: String,
    },

    /// Neither `true` nor `false`
    #[error("value \"{value}\" is not true or false")]
    NotBoolean {
        /// Raw cell
        value: String,
    },

    /// Not a signed digit string or `Infinity`
    #[error("value \"{value}\" is not an integer")]
    NotInteger {
        /// Raw cell
        value: String,
    },

    /// Digits that do not fit in 64 bits
    #[error("value \"{value}\" does not fit in a 64-bit integer")]
    IntegerOverflow {
        /// Raw cell
        value: String,
    },

    /// The declared type tag is not one the reader knows
    #[error("the type \"{type_name}\" is not implemented")]
    UnknownType {
        /// Declared type tag
        type_name: String,
    },
}

/// Outcome of a strict coercion
pub type Coerced<T> = std::result::Result<T, CoercionWarning>;

/// Integer setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integer {
    /// Ordinary signed integer
    Finite(i64),
    /// The literal `Infinity`, optionally signed
    Infinite {
        /// Whether it was written `-Infinity`
        negative: bool,
    },
}

impl Integer {
    /// Whether the integer is anything other than zero
    pub fn is_nonzero(self) -> bool {
        !matches!(self, Integer::Finite(0))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integer::Finite(n) => write!(f, "{}", n),
            Integer::Infinite { negative: false } => f.write_str("Infinity"),
            Integer::Infinite { negative: true } => f.write_str("-Infinity"),
        }
    }
}

impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Integer::Finite(n) => serializer.serialize_i64(*n),
            Integer::Infinite { .. } => serializer.collect_str(self),
        }
    }
}

/// Return the cell text unchanged
///
/// A materialized cell is always text, so this never yields "no value";
/// absent cells are filtered out by the caller before coercion.
pub fn coerce_string(raw: &str) -> Coerced<String> {
    Ok(raw.to_string())
}

/// Split on `separator` and trim every piece
///
/// A value without the separator is rejected rather than read as a
/// one-element list.
pub fn coerce_array(raw: &str, separator: &str) -> Coerced<Vec<String>> {
    if separator.is_empty() || !raw.contains(separator) {
        return Err(CoercionWarning::MissingSeparator {
            value: raw.to_string(),
            separator: separator.to_string(),
        });
    }
    Ok(raw
        .split(separator)
        .map(|piece| piece.trim().to_string())
        .collect())
}

/// Read `true`/`false`, ignoring case and surrounding whitespace
pub fn coerce_boolean(raw: &str) -> Coerced<bool> {
    let normalized = raw.trim().to_lowercase();
    match normalized.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(CoercionWarning::NotBoolean {
            value: raw.to_string(),
        }),
    }
}

/// Read an optionally signed digit string or `Infinity`
pub fn coerce_int(raw: &str) -> Coerced<Integer> {
    let captures = INTEGER_PATTERN
        .captures(raw)
        .ok_or_else(|| CoercionWarning::NotInteger {
            value: raw.to_string(),
        })?;

    if &captures["body"] == "Infinity" {
        let negative = captures.name("sign").is_some_and(|s| s.as_str() == "-");
        return Ok(Integer::Infinite { negative });
    }

    raw.parse::<i64>()
        .map(Integer::Finite)
        .map_err(|_| CoercionWarning::IntegerOverflow {
            value: raw.to_string(),
        })
}

/// Lenient display-flag read: only a case-insensitive `true` is set
///
/// Blank, absent or any other content reads as `false`; there is no
/// "invalid" outcome.
pub fn is_flag_set(cell: Option<&str>) -> bool {
    cell.is_some_and(|c| c.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_string_is_returned_unchanged() {
        assert_eq!(coerce_string("  Hello "), Ok("  Hello ".to_string()));
    }

    #[test]
    fn test_array_splits_and_trims() {
        assert_eq!(
            coerce_array("a, b, c", DEFAULT_SEPARATOR),
            Ok(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(
            coerce_array("fr;en", ";"),
            Ok(vec!["fr".to_string(), "en".to_string()])
        );
    }

    #[test]
    fn test_array_without_separator_is_no_value() {
        let result = coerce_array("fr", DEFAULT_SEPARATOR);
        assert_eq!(
            result,
            Err(CoercionWarning::MissingSeparator {
                value: "fr".to_string(),
                separator: ",".to_string(),
            })
        );
        assert!(coerce_array("a,b", "").is_err());
    }

    #[rstest]
    #[case("TRUE", true)]
    #[case("true ", true)]
    #[case(" False", false)]
    #[case("false", false)]
    fn test_boolean_accepts(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(coerce_boolean(raw), Ok(expected));
    }

    #[rstest]
    #[case("yes")]
    #[case("1")]
    #[case("")]
    #[case("truee")]
    fn test_boolean_rejects(#[case] raw: &str) {
        assert!(matches!(
            coerce_boolean(raw),
            Err(CoercionWarning::NotBoolean { .. })
        ));
    }

    #[rstest]
    #[case("+42", Integer::Finite(42))]
    #[case("-7", Integer::Finite(-7))]
    #[case("0", Integer::Finite(0))]
    #[case("Infinity", Integer::Infinite { negative: false })]
    #[case("-Infinity", Integer::Infinite { negative: true })]
    fn test_int_accepts(#[case] raw: &str, #[case] expected: Integer) {
        assert_eq!(coerce_int(raw), Ok(expected));
    }

    #[rstest]
    #[case("4.2")]
    #[case(" 42")]
    #[case("42abc")]
    #[case("infinity")]
    #[case("")]
    #[case("٤٢")]
    fn test_int_rejects(#[case] raw: &str) {
        assert!(matches!(
            coerce_int(raw),
            Err(CoercionWarning::NotInteger { .. })
        ));
    }

    #[test]
    fn test_int_overflow_is_no_value() {
        assert!(matches!(
            coerce_int("99999999999999999999"),
            Err(CoercionWarning::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_integer_serializes_infinity_as_text() {
        assert_eq!(
            serde_json::to_string(&Integer::Finite(3)).unwrap(),
            "3"
        );
        assert_eq!(
            serde_json::to_string(&Integer::Infinite { negative: true }).unwrap(),
            "\"-Infinity\""
        );
    }

    #[rstest]
    #[case(Some("TRUE"), true)]
    #[case(Some("true"), true)]
    #[case(Some(" true"), false)]
    #[case(Some("yes"), false)]
    #[case(Some(""), false)]
    #[case(None, false)]
    fn test_flag_is_lenient(#[case] cell: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_flag_set(cell), expected);
    }
}

//! Scalar values as read from QC records, and the typed values they coerce into.
//!
//! Numbers are carried as their source lexical form so that no precision is
//! lost between the QC output and the emitted graph.

use std::fmt;

use crate::enums::Datatype;

/// A value exactly as the record source presented it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    /// Source lexical form of a number (e.g. `"12.5"`, `"1e-3"`).
    Number(String),
    Text(String),
}

impl ScalarValue {
    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(lexical) | Self::Text(lexical) => f.write_str(lexical),
        }
    }
}

/// A value coerced to a dictionary datatype.
///
/// Ordering and hashing are structural, which lets statements carrying these
/// values be deduplicated by identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypedValue {
    /// Validated numeric lexical, unchanged from the source.
    Numeric(String),
    Integer(i64),
    Text(String),
    Boolean(bool),
}

impl TypedValue {
    #[must_use]
    pub const fn datatype(&self) -> Datatype {
        match self {
            Self::Numeric(_) => Datatype::Numeric,
            Self::Integer(_) => Datatype::Integer,
            Self::Text(_) => Datatype::String,
            Self::Boolean(_) => Datatype::Boolean,
        }
    }

    /// XSD datatype CURIE for the literal.
    ///
    /// Numeric lexicals with an exponent are not valid `xsd:decimal`, so they
    /// are typed `xsd:double`.
    #[must_use]
    pub fn xsd_datatype(&self) -> &'static str {
        match self {
            Self::Numeric(lexical) if lexical.contains(['e', 'E']) => "xsd:double",
            Self::Numeric(_) => "xsd:decimal",
            Self::Integer(_) => "xsd:integer",
            Self::Text(_) => "xsd:string",
            Self::Boolean(_) => "xsd:boolean",
        }
    }

    /// Lexical form of the literal.
    #[must_use]
    pub fn lexical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(lexical) | Self::Text(lexical) => f.write_str(lexical),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}

/// Whether `raw` is a finite number written as `[+-]digits[.digits][(e|E)[+-]digits]`.
///
/// At least one mantissa digit is required; `NaN`, `inf`, hex, and
/// thousands separators are rejected.
#[must_use]
pub fn is_numeric_lexical(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut idx = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }

    let int_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    let mut mantissa_digits = idx - int_start;

    if idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        let frac_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        mantissa_digits += idx - frac_start;
    }

    if mantissa_digits == 0 {
        return false;
    }

    if idx < bytes.len() && matches!(bytes[idx], b'e' | b'E') {
        idx += 1;
        if matches!(bytes.get(idx), Some(b'+' | b'-')) {
            idx += 1;
        }
        let exp_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == exp_start {
            return false;
        }
    }

    idx == bytes.len() && raw.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12.5")]
    #[case("-0.25")]
    #[case("+3")]
    #[case("1e-3")]
    #[case("6.02E23")]
    #[case(".5")]
    #[case("5.")]
    #[case("0.1000000000000000055511151231257827")]
    fn accepts_numeric_lexicals(#[case] raw: &str) {
        assert!(is_numeric_lexical(raw), "{raw} should be numeric");
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("not-a-number")]
    #[case("NaN")]
    #[case("inf")]
    #[case("1e")]
    #[case("1e999")]
    #[case("1,000")]
    #[case("0x10")]
    #[case(" 1")]
    fn rejects_non_numeric_lexicals(#[case] raw: &str) {
        assert!(!is_numeric_lexical(raw), "{raw} should not be numeric");
    }

    #[test]
    fn numeric_keeps_source_lexical() {
        let value = TypedValue::Numeric("0.1000000000000000055511151231257827".into());
        assert_eq!(value.lexical(), "0.1000000000000000055511151231257827");
        assert_eq!(value.xsd_datatype(), "xsd:decimal");
    }

    #[test]
    fn exponent_numeric_is_double() {
        assert_eq!(
            TypedValue::Numeric("1e-3".into()).xsd_datatype(),
            "xsd:double"
        );
    }

    #[test]
    fn scalar_display_matches_lexical() {
        assert_eq!(ScalarValue::Number("12.50".into()).to_string(), "12.50");
        assert_eq!(ScalarValue::Bool(true).to_string(), "true");
        assert_eq!(ScalarValue::Null.to_string(), "null");
    }
}

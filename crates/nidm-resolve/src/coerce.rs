//! Scalar → typed value coercion.
//!
//! Coercion rejects rather than guesses: a value that does not fit the
//! declared datatype exactly is a type mismatch.

use nidm_core::value::is_numeric_lexical;
use nidm_core::{Datatype, ScalarValue, TypedValue};

/// Coerce `value` to `datatype`, or `None` on mismatch.
#[must_use]
pub fn coerce(value: &ScalarValue, datatype: Datatype) -> Option<TypedValue> {
    match datatype {
        Datatype::Numeric => numeric(value).map(|lexical| TypedValue::Numeric(lexical.to_string())),
        Datatype::Integer => numeric(value).and_then(integer).map(TypedValue::Integer),
        Datatype::String => match value {
            ScalarValue::Null => None,
            other => Some(TypedValue::Text(other.to_string())),
        },
        Datatype::Boolean => boolean(value).map(TypedValue::Boolean),
    }
}

fn numeric(value: &ScalarValue) -> Option<&str> {
    let lexical = match value {
        ScalarValue::Number(lexical) => lexical.as_str(),
        ScalarValue::Text(text) => text.trim(),
        ScalarValue::Null | ScalarValue::Bool(_) => return None,
    };
    is_numeric_lexical(lexical).then_some(lexical)
}

/// Exact integer from a numeric lexical; `12.0` is exact, `12.5` and `1e3`
/// are not.
fn integer(lexical: &str) -> Option<i64> {
    let unsigned = lexical.trim_start_matches('+');
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if !fraction.bytes().all(|digit| digit == b'0') {
        return None;
    }
    if whole.is_empty() || whole == "-" {
        return None;
    }
    whole.parse().ok()
}

fn boolean(value: &ScalarValue) -> Option<bool> {
    match value {
        ScalarValue::Bool(flag) => Some(*flag),
        ScalarValue::Text(text) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") {
                Some(true)
            } else if text.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        ScalarValue::Number(lexical) => match integer(lexical) {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        ScalarValue::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn number(lexical: &str) -> ScalarValue {
        ScalarValue::Number(lexical.to_string())
    }

    fn text(raw: &str) -> ScalarValue {
        ScalarValue::Text(raw.to_string())
    }

    #[rstest]
    #[case(number("12.5"), "12.5")]
    #[case(number("1e-3"), "1e-3")]
    #[case(text(" 0.45 "), "0.45")]
    #[case(text("-3"), "-3")]
    fn numeric_accepts(#[case] value: ScalarValue, #[case] lexical: &str) {
        assert_eq!(
            coerce(&value, Datatype::Numeric),
            Some(TypedValue::Numeric(lexical.to_string()))
        );
    }

    #[rstest]
    #[case(text("not-a-number"))]
    #[case(text("NaN"))]
    #[case(text("inf"))]
    #[case(text(""))]
    #[case(ScalarValue::Bool(true))]
    #[case(ScalarValue::Null)]
    fn numeric_rejects(#[case] value: ScalarValue) {
        assert_eq!(coerce(&value, Datatype::Numeric), None);
    }

    #[rstest]
    #[case(number("176"), 176)]
    #[case(number("12.0"), 12)]
    #[case(text("+7"), 7)]
    #[case(text("-2.000"), -2)]
    fn integer_accepts_exact_values(#[case] value: ScalarValue, #[case] expected: i64) {
        assert_eq!(
            coerce(&value, Datatype::Integer),
            Some(TypedValue::Integer(expected))
        );
    }

    #[rstest]
    #[case(number("12.5"))]
    #[case(number("1e3"))]
    #[case(number("99999999999999999999"))]
    #[case(text("twelve"))]
    #[case(ScalarValue::Bool(false))]
    fn integer_rejects(#[case] value: ScalarValue) {
        assert_eq!(coerce(&value, Datatype::Integer), None);
    }

    #[rstest]
    #[case(ScalarValue::Bool(true), true)]
    #[case(text("FALSE"), false)]
    #[case(text(" true"), true)]
    #[case(number("0"), false)]
    #[case(number("1"), true)]
    fn boolean_accepts(#[case] value: ScalarValue, #[case] expected: bool) {
        assert_eq!(
            coerce(&value, Datatype::Boolean),
            Some(TypedValue::Boolean(expected))
        );
    }

    #[rstest]
    #[case(number("2"))]
    #[case(text("yes"))]
    #[case(ScalarValue::Null)]
    fn boolean_rejects(#[case] value: ScalarValue) {
        assert_eq!(coerce(&value, Datatype::Boolean), None);
    }

    #[test]
    fn string_accepts_any_non_null_scalar() {
        assert_eq!(
            coerce(&number("3.10"), Datatype::String),
            Some(TypedValue::Text("3.10".into()))
        );
        assert_eq!(
            coerce(&ScalarValue::Bool(true), Datatype::String),
            Some(TypedValue::Text("true".into()))
        );
        assert_eq!(coerce(&ScalarValue::Null, Datatype::String), None);
    }
}

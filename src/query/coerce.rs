/*!
# Type Coercion

Comparison pairs compare a typed value taken from the tree with a raw literal
taken from the condition text. The literal is coerced to the runtime type of
the tree value before any operator is applied:

| left value | right literal becomes |
|---|---|
| string | the literal text |
| boolean | `true` only for the literal `true` |
| number | its numeric parse, NaN when unparseable |
| date (only with date comparison enabled) | a millisecond timestamp, as is the left side |
| anything else | the literal text, unchanged |

Regardless of the left side, `null` becomes [`Operand::Null`] and `undefined`
becomes [`Operand::Absent`].

Numeric literals are decimal (`12`, `-1.5`, `.5`, `2e3`), `0x`/`0o`/`0b`
prefixed integers, or `Infinity` with an optional sign. An empty literal is
zero. Anything else, including `inf` and `nan`, is NaN.

JSON has no date type, so string leaves are strings. When date comparison is
enabled (see [`Query::dates`](super::Query::dates)), a string leaf that parses
as RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`
(UTC assumed when no offset is given) is a date instead.
*/
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::cmp::Ordering;

use super::Match;

/// One side of a comparison after coercion.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Text
    Str(String),
    /// Any number; NaN marks an unparseable literal
    Number(f64),
    /// Milliseconds since the Unix epoch; NaN marks an unparseable date
    Timestamp(f64),
    /// Boolean
    Bool(bool),
    /// The null value
    Null,
    /// No value at all, e.g. a missing key
    Absent,
    /// A map, a sequence or a group of matches
    Composite,
}

impl Operand {
    /// Strict equality: both sides must be of the same kind and hold equal
    /// values. NaN and composites never equal anything.
    #[must_use]
    pub fn strictly_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(l), Self::Str(r)) => l == r,
            (Self::Number(l), Self::Number(r))
            | (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::Bool(l), Self::Bool(r)) => l == r,
            (Self::Null, Self::Null) | (Self::Absent, Self::Absent) => true,
            _ => false,
        }
    }

    /// Ordering between two numbers, two timestamps, two strings or two
    /// booleans. Every other pairing, and NaN, is unordered.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Number(l), Self::Number(r))
            | (Self::Timestamp(l), Self::Timestamp(r)) => l.partial_cmp(r),
            (Self::Str(l), Self::Str(r)) => Some(l.cmp(r)),
            (Self::Bool(l), Self::Bool(r)) => Some(l.cmp(r)),
            _ => None,
        }
    }

    /// Text form of a coerced literal, used as the right side of the string
    /// operators. Composites have no literal form and render as empty text.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Number(n) | Self::Timestamp(n) => number_text(*n),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
            Self::Absent => "undefined".to_string(),
            Self::Composite => String::new(),
        }
    }
}

/// Coerce the raw `right` literal to the runtime type of `left`, returning
/// both operands. `left` is `None` when the field did not resolve. With
/// `dates` set, string leaves that parse as dates compare as timestamps.
#[must_use]
pub fn coerce(
    left: Option<&Match<'_>>,
    right: &str,
    dates: bool,
) -> (Operand, Operand) {
    let left = left_operand(left, dates);

    let right = match (right, &left) {
        ("null", _) => Operand::Null,
        ("undefined", _) => Operand::Absent,
        (_, Operand::Str(_)) => Operand::Str(right.to_string()),
        (_, Operand::Bool(_)) => Operand::Bool(right == "true"),
        (_, Operand::Number(_)) => Operand::Number(parse_number(right)),
        (_, Operand::Timestamp(_)) => {
            Operand::Timestamp(parse_timestamp(right).unwrap_or(f64::NAN))
        }
        (_, Operand::Null | Operand::Absent | Operand::Composite) => {
            Operand::Str(right.to_string())
        }
    };

    (left, right)
}

/// Types the resolved left value.
fn left_operand(left: Option<&Match<'_>>, dates: bool) -> Operand {
    let Some(left) = left else {
        return Operand::Absent;
    };
    match left.as_node() {
        None | Some(Value::Array(_) | Value::Object(_)) => Operand::Composite,
        Some(Value::Null) => Operand::Null,
        Some(Value::Bool(b)) => Operand::Bool(*b),
        Some(Value::Number(n)) => Operand::Number(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::String(s)) if dates => parse_timestamp(s)
            .map_or_else(|| Operand::Str(s.clone()), Operand::Timestamp),
        Some(Value::String(s)) => Operand::Str(s.clone()),
    }
}

/// Numeric parse of a literal, NaN when it is not a number.
fn parse_number(text: &str) -> f64 {
    let parsed = match text {
        "" => Some(0.0),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => parse_prefixed(text).or_else(|| parse_decimal(text)),
    };
    parsed.unwrap_or_else(|| {
        log::debug!("`{text}` is not numeric, comparing as NaN");
        f64::NAN
    })
}

/// `0x1f`, `0o17` or `0b101`. No sign is allowed.
#[allow(clippy::cast_precision_loss)]
fn parse_prefixed(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|n| n as f64)
}

/// Plain decimal notation with optional sign, fraction and exponent. The
/// `inf`/`nan` spellings `f64::from_str` also takes are rejected.
fn parse_decimal(text: &str) -> Option<f64> {
    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    text.parse().ok()
}

/// Parses a date or date-time into milliseconds since the Unix epoch.
#[allow(clippy::cast_precision_loss)]
fn parse_timestamp(text: &str) -> Option<f64> {
    let millis = if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        datetime.timestamp_millis()
    } else if let Ok(datetime) =
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
    {
        datetime.and_utc().timestamp_millis()
    } else {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
            .timestamp_millis()
    };
    Some(millis as f64)
}

/// Shortest text of a number: integral values without a fraction, and
/// `Infinity`/`NaN` spelled out.
fn number_text(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() && n.is_sign_positive() {
        "Infinity".to_string()
    } else if n.is_infinite() {
        "-Infinity".to_string()
    } else {
        n.to_string()
    }
}

/// Renders a resolved value as text for the string operators (`^=`, `~=`,
/// `$=`, `*=`).
///
/// Sequences, whether tree arrays or groups, join their items with `,`, and
/// `null` items render as empty text. Maps render as compact JSON.
#[must_use]
pub fn stringify(value: Option<&Match<'_>>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Match::Node(value)) => value_text(value),
        Some(Match::Group(items)) => items
            .iter()
            .map(|item| match item {
                Match::Node(Value::Null) => String::new(),
                _ => stringify(Some(item)),
            })
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => number_text(n.as_f64().unwrap_or(f64::NAN)),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                _ => value_text(item),
            })
            .collect::<Vec<_>>()
            .join(","),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coerce_value(left: &Value, right: &str) -> (Operand, Operand) {
        coerce(Some(&Match::Node(left)), right, false)
    }

    fn coerce_date(left: &Value, right: &str) -> (Operand, Operand) {
        coerce(Some(&Match::Node(left)), right, true)
    }

    #[test]
    fn string_left_keeps_text() {
        let (l, r) = coerce_value(&json!("abc"), "abc");
        assert!(l.strictly_equals(&r));
        let (l, r) = coerce_value(&json!("5"), "5");
        assert!(matches!(r, Operand::Str(_)));
        assert!(l.strictly_equals(&r));
    }

    #[test]
    fn date_looking_strings_stay_strings() {
        let (l, r) = coerce_value(&json!("2024-01-01"), "2025");
        assert!(matches!(l, Operand::Str(_)));
        assert_eq!(l.compare(&r), Some(Ordering::Less));

        let (l, r) = coerce_value(&json!("2024-01-01"), "2024-01-01T00:00:00Z");
        assert!(!l.strictly_equals(&r));
    }

    #[test]
    fn boolean_left() {
        let (l, r) = coerce_value(&json!(true), "true");
        assert!(l.strictly_equals(&r));
        let (_, r) = coerce_value(&json!(true), "yes");
        assert!(matches!(r, Operand::Bool(false)));
    }

    #[test]
    fn number_left() {
        let (l, r) = coerce_value(&json!(5), "5.0");
        assert!(l.strictly_equals(&r));
        assert_eq!(l.compare(&Operand::Number(7.0)), Some(Ordering::Less));
    }

    #[test]
    fn non_numeric_literal_is_nan() {
        let (l, r) = coerce_value(&json!(5), "five");
        assert!(matches!(r, Operand::Number(n) if n.is_nan()));
        assert!(!l.strictly_equals(&r));
        assert_eq!(l.compare(&r), None);
    }

    #[test]
    fn numeric_literal_syntax() {
        assert!((parse_number("0x1f") - 31.0).abs() < f64::EPSILON);
        assert!((parse_number("0b101") - 5.0).abs() < f64::EPSILON);
        assert!((parse_number("-2.5e1") + 25.0).abs() < f64::EPSILON);
        assert!((parse_number(".5") - 0.5).abs() < f64::EPSILON);
        assert!(parse_number("").abs() < f64::EPSILON);
        assert!(parse_number("-Infinity").is_infinite());
        for text in ["inf", "nan", "NaN", "infinity", "-0x1f", "0x", "1,5", "5px"] {
            assert!(parse_number(text).is_nan(), "{text}");
        }
    }

    #[test]
    fn date_left_when_enabled() {
        let (l, r) = coerce_date(&json!("2024-01-02T00:00:00Z"), "2024-01-01");
        assert!(matches!(l, Operand::Timestamp(_)));
        assert_eq!(l.compare(&r), Some(Ordering::Greater));

        let (l, r) = coerce_date(&json!("2024-01-01"), "2024-01-01 00:00:00");
        assert!(l.strictly_equals(&r));

        let (l, r) = coerce_date(&json!("2024-01-01"), "someday");
        assert_eq!(l.compare(&r), None);

        let (l, _) = coerce_date(&json!("not a date"), "x");
        assert!(matches!(l, Operand::Str(_)));
    }

    #[test]
    fn null_and_undefined_override() {
        let (l, r) = coerce_value(&json!(null), "null");
        assert!(l.strictly_equals(&r));
        let (_, r) = coerce_value(&json!(3), "null");
        assert!(matches!(r, Operand::Null));
        let (l, r) = coerce(None, "undefined", false);
        assert!(l.strictly_equals(&r));
    }

    #[test]
    fn other_left_passes_literal_through() {
        let (l, r) = coerce_value(&json!({"a": 1}), "x");
        assert!(matches!(l, Operand::Composite));
        assert!(matches!(r, Operand::Str(ref s) if s == "x"));
        assert!(!l.strictly_equals(&r));
        assert_eq!(l.compare(&r), None);

        let (l, r) = coerce(None, "5", false);
        assert!(matches!(l, Operand::Absent));
        assert!(matches!(r, Operand::Str(_)));
    }

    #[test]
    fn coerced_literal_text() {
        assert_eq!(coerce_value(&json!(5), "5.0").1.to_text(), "5");
        assert_eq!(coerce_value(&json!(true), "tr").1.to_text(), "false");
        assert_eq!(coerce_value(&json!("s"), "null").1.to_text(), "null");
        assert_eq!(coerce_value(&json!(1), "x").1.to_text(), "NaN");
    }

    #[test]
    fn stringify_values() {
        let (s, n, f, arr) = (json!("x"), json!(2.5), json!(3.0), json!([1, "a", null]));
        assert_eq!(stringify(Some(&Match::Node(&s))), "x");
        assert_eq!(stringify(Some(&Match::Node(&n))), "2.5");
        assert_eq!(stringify(Some(&Match::Node(&f))), "3");
        assert_eq!(stringify(Some(&Match::Node(&arr))), "1,a,");
        assert_eq!(stringify(None), "undefined");
        let group = Match::Group(vec![Match::Node(&s), Match::Node(&n)]);
        assert_eq!(stringify(Some(&group)), "x,2.5");
    }

    #[test]
    fn arrays_and_groups_render_alike() {
        let (x, y, tags) = (json!("x"), json!("y"), json!(["x", "y"]));
        let group = Match::Group(vec![Match::Node(&x), Match::Node(&y)]);
        assert_eq!(stringify(Some(&Match::Node(&tags))), "x,y");
        assert_eq!(stringify(Some(&group)), "x,y");
        let nested = json!([["a", "b"], "c"]);
        assert_eq!(stringify(Some(&Match::Node(&nested))), "a,b,c");
    }
}

// SPDX-License-Identifier: MIT

//! Loose value semantics shared by the evaluator and its callers
//!
//! Row data mixes representations freely (`"1"` next to `1`, `null` next
//! to a missing key), and authored expressions were written against
//! coercive comparison rules. The functions here reproduce those rules
//! over `serde_json::Value`:
//!
//! - falsy: `null`, `false`, `0`, `""`, `[]`
//! - `1 == "1"`, `true == 1`, `null == null`, `null != 0`
//! - two strings order lexicographically, anything else numerically

use serde_json::Value;
use std::cmp::Ordering;

/// Truthiness under boolean coercion
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        Value::Object(_) => true,
    }
}

/// Loose (coercive) equality
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,

        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(_), Value::Number(_)) => to_number(a) == to_number(b),

        (Value::Number(_), Value::String(s)) => to_number(a) == string_to_number(s),
        (Value::String(s), Value::Number(_)) => string_to_number(s) == to_number(b),

        // booleans compare as 0 / 1
        (Value::Bool(x), other) => loose_equals(&bool_as_number(*x), other),
        (other, Value::Bool(y)) => loose_equals(other, &bool_as_number(*y)),

        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            same_value(a, b)
        }
        (Value::Array(_), Value::Object(_)) | (Value::Object(_), Value::Array(_)) => false,

        // container against a primitive: compare its primitive string form
        (Value::Array(_) | Value::Object(_), _) => {
            loose_equals(&Value::String(to_display_string(a)), b)
        }
        (_, Value::Array(_) | Value::Object(_)) => {
            loose_equals(a, &Value::String(to_display_string(b)))
        }
    }
}

/// Ordering used by `<=` / `>=`; `None` when the operands are incomparable
/// (a side coerces to NaN).
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    let a_prim = to_primitive(a);
    let b_prim = to_primitive(b);

    if let (Value::String(x), Value::String(y)) = (&a_prim, &b_prim) {
        return Some(x.as_str().cmp(y.as_str()));
    }

    to_number(&a_prim).partial_cmp(&to_number(&b_prim))
}

pub fn less_or_equal(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Less | Ordering::Equal))
}

pub fn greater_or_equal(a: &Value, b: &Value) -> bool {
    matches!(compare(a, b), Some(Ordering::Greater | Ordering::Equal))
}

/// Sequence view of a haystack: array elements, or the characters of a
/// string. Anything else has no elements.
pub fn as_sequence(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
        _ => Vec::new(),
    }
}

/// Membership under loose equality
pub fn includes(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::Array(items) => items.iter().any(|item| loose_equals(item, needle)),
        Value::String(_) => as_sequence(haystack)
            .iter()
            .any(|item| loose_equals(item, needle)),
        _ => false,
    }
}

/// Numeric coercion; NaN when the value has no numeric reading
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => string_to_number(s),
        Value::Array(_) => string_to_number(&to_display_string(value)),
        Value::Object(_) => f64::NAN,
    }
}

/// String form of a value (`[1,2]` → `"1,2"`, `null` → `"null"`)
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => number_to_string(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Total order for sorting mixed values.
///
/// Unlike [`compare`], every pair orders and the order is transitive:
/// null, then booleans, then numbers (numeric strings read as their
/// number), then other strings, then arrays and objects by display string.
pub fn sort_order(a: &Value, b: &Value) -> Ordering {
    let (left, right) = (SortKey::of(a), SortKey::of(b));
    left.rank().cmp(&right.rank()).then_with(|| match (left, right) {
        (SortKey::Bool(x), SortKey::Bool(y)) => x.cmp(&y),
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(&y),
        (SortKey::Text(x), SortKey::Text(y)) | (SortKey::Composite(x), SortKey::Composite(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    })
}

enum SortKey {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Composite(String),
}

impl SortKey {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => SortKey::Null,
            Value::Bool(b) => SortKey::Bool(*b),
            Value::Number(_) => SortKey::Number(to_number(value)),
            Value::String(s) => {
                let n = string_to_number(s);
                if s.trim().is_empty() || n.is_nan() {
                    SortKey::Text(s.clone())
                } else {
                    SortKey::Number(n)
                }
            }
            Value::Array(_) | Value::Object(_) => SortKey::Composite(to_display_string(value)),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Null => 0,
            SortKey::Bool(_) => 1,
            SortKey::Number(_) => 2,
            SortKey::Text(_) => 3,
            SortKey::Composite(_) => 4,
        }
    }
}

fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(to_display_string(value)),
        other => other.clone(),
    }
}

fn number_to_string(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        format!("{}", f)
    }
}

fn bool_as_number(b: bool) -> Value {
    Value::from(if b { 1 } else { 0 })
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    // f64::from_str also accepts "inf" / "nan", which must stay NaN here
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Structural equality with numbers compared by value (`1 == 1.0`)
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => to_number(a) == to_number(b),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| same_value(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).map(|other| same_value(v, other)).unwrap_or(false))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness_table() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!([0])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_loose_equals_numeric_strings() {
        assert!(loose_equals(&json!(1), &json!("1")));
        assert!(loose_equals(&json!("1"), &json!(1)));
        assert!(loose_equals(&json!(1.5), &json!(" 1.5 ")));
        assert!(loose_equals(&json!(0), &json!("")));
        assert!(loose_equals(&json!(255), &json!("0xff")));
        assert!(!loose_equals(&json!(1), &json!("one")));
        assert!(!loose_equals(&json!("1"), &json!("1.0")));
        assert!(loose_equals(&json!(1), &json!(1.0)));
    }

    #[test]
    fn test_loose_equals_null() {
        assert!(loose_equals(&json!(null), &json!(null)));
        assert!(!loose_equals(&json!(null), &json!(0)));
        assert!(!loose_equals(&json!(null), &json!("")));
        assert!(!loose_equals(&json!(false), &json!(null)));
    }

    #[test]
    fn test_loose_equals_booleans() {
        assert!(loose_equals(&json!(true), &json!(1)));
        assert!(loose_equals(&json!(false), &json!(0)));
        assert!(loose_equals(&json!(true), &json!("1")));
        assert!(loose_equals(&json!(false), &json!("")));
        assert!(!loose_equals(&json!(true), &json!("true")));
        assert!(!loose_equals(&json!(true), &json!(2)));
    }

    #[test]
    fn test_loose_equals_containers() {
        assert!(loose_equals(&json!([1, 2]), &json!("1,2")));
        assert!(loose_equals(&json!(["a"]), &json!("a")));
        assert!(loose_equals(&json!([]), &json!("")));
        assert!(loose_equals(&json!([1]), &json!(1)));
        assert!(loose_equals(&json!([1, 2]), &json!([1.0, 2])));
        assert!(!loose_equals(&json!([1, 2]), &json!([2, 1])));
        assert!(loose_equals(&json!({"a": 1}), &json!({"a": 1})));
        assert!(!loose_equals(&json!([]), &json!({})));
    }

    #[test]
    fn test_compare_numbers_and_strings() {
        assert_eq!(compare(&json!(25), &json!(18)), Some(Ordering::Greater));
        assert_eq!(compare(&json!("25"), &json!(18)), Some(Ordering::Greater));
        assert_eq!(compare(&json!("b"), &json!("a")), Some(Ordering::Greater));
        // two strings never coerce to numbers
        assert_eq!(compare(&json!("10"), &json!("9")), Some(Ordering::Less));
        assert_eq!(
            compare(&json!("2024-01-05"), &json!("2024-01-10")),
            Some(Ordering::Less)
        );
        assert_eq!(compare(&json!("abc"), &json!(1)), None);
    }

    #[test]
    fn test_compare_nonsense_operands_never_fail() {
        assert!(less_or_equal(&json!(false), &json!(true)));
        assert!(greater_or_equal(&json!(true), &json!(true)));
        assert!(less_or_equal(&json!(null), &json!(0)));
        assert!(!less_or_equal(&json!({}), &json!(1)));
        assert!(!greater_or_equal(&json!({}), &json!(1)));
    }

    #[test]
    fn test_includes() {
        assert!(includes(&json!(["a", "b", "c"]), &json!("b")));
        assert!(!includes(&json!(["a", "b", "c"]), &json!("d")));
        assert!(includes(&json!([1, 2, 3]), &json!("2")));
        assert!(includes(&json!("abc"), &json!("c")));
        assert!(!includes(&json!([]), &json!("a")));
        assert!(!includes(&json!(""), &json!("")));
        assert!(!includes(&json!(null), &json!(null)));
        assert!(!includes(&json!(42), &json!(4)));
    }

    #[test]
    fn test_as_sequence() {
        assert_eq!(as_sequence(&json!("ab")), vec![json!("a"), json!("b")]);
        assert_eq!(as_sequence(&json!([1, 2])), vec![json!(1), json!(2)]);
        assert!(as_sequence(&json!({ "a": 1 })).is_empty());
    }

    #[test]
    fn test_to_display_string() {
        assert_eq!(to_display_string(&json!(null)), "null");
        assert_eq!(to_display_string(&json!(18)), "18");
        assert_eq!(to_display_string(&json!(7.5)), "7.5");
        assert_eq!(to_display_string(&json!(2.0)), "2");
        assert_eq!(to_display_string(&json!([1, null, "x"])), "1,,x");
        assert_eq!(to_display_string(&json!({})), "[object Object]");
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&json!(null)), 0.0);
        assert_eq!(to_number(&json!(true)), 1.0);
        assert_eq!(to_number(&json!(" 42 ")), 42.0);
        assert_eq!(to_number(&json!("-Infinity")), f64::NEG_INFINITY);
        assert!(to_number(&json!("inf")).is_nan());
        assert!(to_number(&json!("nan")).is_nan());
        assert_eq!(to_number(&json!([7])), 7.0);
        assert!(to_number(&json!([1, 2])).is_nan());
    }

    #[test]
    fn test_sort_order_is_total_across_types() {
        assert_eq!(sort_order(&json!(30), &json!("4")), Ordering::Greater);
        assert_eq!(sort_order(&json!("10"), &json!(9)), Ordering::Greater);
        assert_eq!(sort_order(&json!("10"), &json!("9")), Ordering::Greater);
        assert_eq!(sort_order(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(sort_order(&json!(1e9), &json!("a")), Ordering::Less);
        assert_eq!(sort_order(&json!(""), &json!("a")), Ordering::Less);
        assert_eq!(sort_order(&json!("b"), &json!([1])), Ordering::Less);
        assert_eq!(sort_order(&json!("4"), &json!(4)), Ordering::Equal);
    }
}

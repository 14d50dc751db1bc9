//! Filter evaluation against a single record.

use std::cmp::Ordering;

use serde_json::Value;

use super::{AttrPath, CompareOp, FilterExpr};
use crate::resource::{Resource, attribute_of};

/// Evaluate a filter expression against one record.
pub fn evaluate(expr: &FilterExpr, record: &Resource) -> bool {
    evaluate_value(expr, record.data())
}

fn evaluate_value(expr: &FilterExpr, data: &Value) -> bool {
    match expr {
        FilterExpr::Present(path) => !resolve_path(data, path).is_empty(),
        FilterExpr::Compare { path, op, value } => resolve_path(data, path)
            .iter()
            .any(|actual| compare(*op, actual, value)),
        FilterExpr::And(left, right) => evaluate_value(left, data) && evaluate_value(right, data),
        FilterExpr::Or(left, right) => evaluate_value(left, data) || evaluate_value(right, data),
        FilterExpr::Not(inner) => !evaluate_value(inner, data),
    }
}

/// Resolve an attribute path to the set of leaf values it addresses.
///
/// Attribute names match case-insensitively. Arrays fan out: each element is
/// resolved against the remaining path, so a multi-valued attribute yields
/// one candidate per element. Nulls and missing attributes yield nothing.
pub(crate) fn resolve_path<'a>(data: &'a Value, path: &AttrPath) -> Vec<&'a Value> {
    let mut current = vec![data];
    for segment in path.segments() {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(found) = attribute_of(item, segment) {
                            next.push(found);
                        }
                    }
                }
                _ => {
                    if let Some(found) = attribute_of(value, segment) {
                        next.push(found);
                    }
                }
            }
        }
        current = next;
    }

    // Flatten a trailing multi-valued attribute into its elements.
    let mut leaves = Vec::new();
    for value in current {
        match value {
            Value::Array(items) => leaves.extend(items.iter().filter(|v| !v.is_null())),
            Value::Null => {}
            other => leaves.push(other),
        }
    }
    leaves
}

fn compare(op: CompareOp, actual: &Value, literal: &Value) -> bool {
    match op {
        CompareOp::Eq => values_equal(actual, literal),
        CompareOp::Ne => !values_equal(actual, literal),
        CompareOp::Co => string_pair(actual, literal)
            .is_some_and(|(a, b)| a.to_lowercase().contains(&b.to_lowercase())),
        CompareOp::Sw => string_pair(actual, literal)
            .is_some_and(|(a, b)| a.to_lowercase().starts_with(&b.to_lowercase())),
        CompareOp::Ew => string_pair(actual, literal)
            .is_some_and(|(a, b)| a.to_lowercase().ends_with(&b.to_lowercase())),
        CompareOp::Gt => matches!(compare_order(actual, literal), Some(Ordering::Greater)),
        CompareOp::Ge => matches!(
            compare_order(actual, literal),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::Lt => matches!(compare_order(actual, literal), Some(Ordering::Less)),
        CompareOp::Le => matches!(
            compare_order(actual, literal),
            Some(Ordering::Less | Ordering::Equal)
        ),
    }
}

/// Equality with case-insensitive strings and numeric number comparison.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.eq_ignore_ascii_case(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn string_pair<'a>(a: &'a Value, b: &'a Value) -> Option<(&'a str, &'a str)> {
    Some((a.as_str()?, b.as_str()?))
}

/// Ordering between two values of comparable types.
///
/// Numbers compare numerically, strings case-insensitively, booleans
/// false < true. Mismatched or unordered types yield `None`.
pub(crate) fn compare_order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            Some(x.to_lowercase().cmp(&y.to_lowercase()))
        }
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total ordering over sort keys: comparable pairs use `compare_order`,
/// mismatched types fall back to a fixed rank so sorting stays consistent.
pub(crate) fn total_order(a: &Value, b: &Value) -> Ordering {
    compare_order(a, b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b)))
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parse;
    use serde_json::json;

    fn user() -> Resource {
        Resource::new(
            "User",
            json!({
                "userName": "BJensen",
                "active": true,
                "rank": 3,
                "name": {"givenName": "Barbara", "familyName": "Jensen"},
                "emails": [
                    {"value": "bjensen@example.com", "type": "work"},
                    {"value": "babs@example.com", "type": "home"}
                ]
            }),
        )
        .unwrap()
    }

    fn matches(filter: &str, record: &Resource) -> bool {
        evaluate(&parse(filter).unwrap(), record)
    }

    #[test]
    fn test_eq_is_case_insensitive() {
        let record = user();
        assert!(matches(r#"userName eq "bjensen""#, &record));
        assert!(matches(r#"userName eq "BJENSEN""#, &record));
        assert!(!matches(r#"userName eq "other""#, &record));
    }

    #[test]
    fn test_dotted_path() {
        let record = user();
        assert!(matches(r#"name.givenName sw "Barb""#, &record));
        assert!(!matches(r#"name.givenName ew "xyz""#, &record));
    }

    #[test]
    fn test_multi_valued_any_element() {
        let record = user();
        assert!(matches(r#"emails.value co "babs""#, &record));
        assert!(matches(r#"emails.type eq "work""#, &record));
        assert!(!matches(r#"emails.type eq "other""#, &record));
    }

    #[test]
    fn test_presence() {
        let record = user();
        assert!(matches("userName pr", &record));
        assert!(!matches("title pr", &record));
    }

    #[test]
    fn test_numeric_ordering() {
        let record = user();
        assert!(matches("rank gt 2", &record));
        assert!(matches("rank le 3", &record));
        assert!(!matches("rank lt 3", &record));
        // mismatched types are not ordered
        assert!(!matches(r#"rank gt "2""#, &record));
    }

    #[test]
    fn test_logical_operators() {
        let record = user();
        assert!(matches(r#"active eq true and userName sw "b""#, &record));
        assert!(matches(r#"active eq false or rank ge 3"#, &record));
        assert!(matches(r#"not (title pr)"#, &record));
        assert!(!matches(r#"not (active eq true)"#, &record));
    }

    #[test]
    fn test_total_order_is_stable_across_types() {
        let a = json!(1);
        let b = json!("x");
        assert_eq!(total_order(&a, &b), Ordering::Less);
        assert_eq!(total_order(&b, &a), Ordering::Greater);
        assert_eq!(total_order(&a, &a), Ordering::Equal);
    }
}

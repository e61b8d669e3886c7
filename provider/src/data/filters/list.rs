//! List-literal value parsing for `@in` and `@cs` filters
//!
//! `@cs` values must be brace literals such as `{a,b,3}`. `@in` values are
//! looser: pre-split arrays, brace literals, PostgREST `(a,b)` lists and bare
//! `a,b` strings are all accepted. Every element is numeric-coerced on its
//! own, so a list can mix numbers and strings.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::error::FilterError;
use super::types::ListItem;

/// Grammar for `@cs` list literals
pub const CONTAINS_PATTERN: &str =
    r"^\{[A-Za-z0-9À-ÖØ-öø-ÿ-]+(,[A-Za-z0-9À-ÖØ-öø-ÿ-]+)*\}$";

/// Grammar for `@in` list strings: `{a,b}`, `(a,b)` or bare `a,b`, each
/// possibly empty
pub const IN_PATTERN: &str = r"^(\{([^,(){}]+(,[^,(){}]+)*)?\}|\(([^,(){}]+(,[^,(){}]+)*)?\)|([^,(){}]+(,[^,(){}]+)*)?)$";

const EMPTY_CONTAINS_LITERAL: &str = "{}";

static CONTAINS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CONTAINS_PATTERN).expect("Invalid contains regex"));

static IN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IN_PATTERN).expect("Invalid in regex"));

/// Parse a `@cs` value into its list items.
///
/// The value must be a string; `"{}"` yields an empty list, anything else
/// must match [`CONTAINS_PATTERN`]. Elements are neither trimmed nor
/// case-normalised.
pub fn transform_contains_filter(value: &Value) -> Result<Vec<ListItem>, FilterError> {
    let Some(text) = value.as_str() else {
        return Err(FilterError::invalid_value(CONTAINS_PATTERN, value));
    };

    if text == EMPTY_CONTAINS_LITERAL {
        return Ok(Vec::new());
    }

    if !CONTAINS_RE.is_match(text) {
        return Err(FilterError::invalid_value(CONTAINS_PATTERN, value));
    }

    let inner = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(text);

    Ok(inner.split(',').map(ListItem::coerce).collect())
}

/// Parse an `@in` value into its list items.
///
/// Arrays pass through element-wise: numbers stay numbers, strings are
/// coerced, anything else is an `InvalidListElement`. Strings must match
/// [`IN_PATTERN`]; an empty literal (`{}`, `()` or `""`) yields an empty list.
pub fn transform_in_filter(value: &Value) -> Result<Vec<ListItem>, FilterError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Number(n) => n
                    .as_f64()
                    .map(ListItem::Number)
                    .ok_or_else(|| FilterError::invalid_list_element(index, item)),
                Value::String(s) => Ok(ListItem::coerce(s)),
                _ => Err(FilterError::invalid_list_element(index, item)),
            })
            .collect(),
        Value::String(text) => {
            parse_in_list(text).ok_or_else(|| FilterError::invalid_value(IN_PATTERN, value))
        }
        _ => Err(FilterError::invalid_value(IN_PATTERN, value)),
    }
}

/// Split an `@in` list string, returning `None` unless it matches [`IN_PATTERN`]
fn parse_in_list(text: &str) -> Option<Vec<ListItem>> {
    if !IN_RE.is_match(text) {
        return None;
    }

    let inner = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .or_else(|| text.strip_prefix('(').and_then(|t| t.strip_suffix(')')))
        .unwrap_or(text);

    if inner.is_empty() {
        return Some(Vec::new());
    }

    Some(inner.split(',').map(ListItem::coerce).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> ListItem {
        ListItem::Text(s.to_string())
    }

    // ========================================================================
    // transform_contains_filter
    // ========================================================================

    #[test]
    fn contains_empty_literal() {
        assert_eq!(transform_contains_filter(&json!("{}")).unwrap(), vec![]);
    }

    #[test]
    fn contains_numbers_are_coerced() {
        assert_eq!(
            transform_contains_filter(&json!("{1,2,3}")).unwrap(),
            vec![
                ListItem::Number(1.0),
                ListItem::Number(2.0),
                ListItem::Number(3.0)
            ]
        );
    }

    #[test]
    fn contains_strings_kept_verbatim() {
        assert_eq!(
            transform_contains_filter(&json!("{a,B,c-d}")).unwrap(),
            vec![text("a"), text("B"), text("c-d")]
        );
    }

    #[test]
    fn contains_mixed_list() {
        assert_eq!(
            transform_contains_filter(&json!("{vip,-5,lead}")).unwrap(),
            vec![text("vip"), ListItem::Number(-5.0), text("lead")]
        );
    }

    #[test]
    fn contains_accented_letters() {
        assert_eq!(
            transform_contains_filter(&json!("{café,Zoë,ÉTÉ}")).unwrap(),
            vec![text("café"), text("Zoë"), text("ÉTÉ")]
        );
    }

    #[test]
    fn contains_leading_numeric_prefix_becomes_number() {
        // Elements are coerced with a leading-prefix float parse: "3abc" -> 3
        assert_eq!(
            transform_contains_filter(&json!("{3abc,abc3}")).unwrap(),
            vec![ListItem::Number(3.0), text("abc3")]
        );
    }

    #[test]
    fn contains_rejects_non_string() {
        let err = transform_contains_filter(&json!(1)).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidFilterValue {
                pattern: CONTAINS_PATTERN,
                value: "1".to_string()
            }
        );
        let message = err.to_string();
        assert!(message.contains(CONTAINS_PATTERN));
        assert!(message.ends_with("got: 1"));
    }

    #[test]
    fn contains_rejects_missing_braces() {
        let err = transform_contains_filter(&json!("1,2")).unwrap_err();
        assert!(err.to_string().ends_with("got: 1,2"));
    }

    #[test]
    fn contains_rejects_malformed_literals() {
        for bad in ["{a,,b}", "{a b}", "{a,}", "{,a}", "{1.5}", "{a}x", "{", "", "{ }"] {
            assert!(
                transform_contains_filter(&json!(bad)).is_err(),
                "expected rejection of {:?}",
                bad
            );
        }
    }

    #[test]
    fn contains_rejects_arrays_and_null() {
        assert!(transform_contains_filter(&json!(["a"])).is_err());
        assert!(transform_contains_filter(&json!(null)).is_err());
    }

    // ========================================================================
    // transform_in_filter
    // ========================================================================

    #[test]
    fn in_array_of_strings_is_coerced() {
        assert_eq!(
            transform_in_filter(&json!(["1", "2"])).unwrap(),
            vec![ListItem::Number(1.0), ListItem::Number(2.0)]
        );
    }

    #[test]
    fn in_array_keeps_numbers_and_text() {
        assert_eq!(
            transform_in_filter(&json!([7, "won", 2.5])).unwrap(),
            vec![ListItem::Number(7.0), text("won"), ListItem::Number(2.5)]
        );
    }

    #[test]
    fn in_empty_forms() {
        assert_eq!(transform_in_filter(&json!([])).unwrap(), vec![]);
        assert_eq!(transform_in_filter(&json!("{}")).unwrap(), vec![]);
        assert_eq!(transform_in_filter(&json!("()")).unwrap(), vec![]);
        assert_eq!(transform_in_filter(&json!("")).unwrap(), vec![]);
    }

    #[test]
    fn in_delimited_strings() {
        let expected = vec![ListItem::Number(1.0), text("b")];
        assert_eq!(transform_in_filter(&json!("{1,b}")).unwrap(), expected);
        assert_eq!(transform_in_filter(&json!("(1,b)")).unwrap(), expected);
        assert_eq!(transform_in_filter(&json!("1,b")).unwrap(), expected);
    }

    #[test]
    fn in_rejects_unbalanced_delimiters() {
        for bad in ["(1,2", "{1,2)", "(1,,2)", "1,(2)", "{a}}"] {
            assert!(
                transform_in_filter(&json!(bad)).is_err(),
                "expected rejection of {:?}",
                bad
            );
        }
    }

    #[test]
    fn in_rejects_unrepresentable_shapes() {
        assert!(transform_in_filter(&json!(5)).is_err());
        assert!(transform_in_filter(&json!({"a": 1})).is_err());
        assert!(transform_in_filter(&json!([["nested"]])).is_err());
        assert!(transform_in_filter(&json!([null])).is_err());
    }

    #[test]
    fn in_rejects_mismatched_delimiters() {
        for bad in ["{1,2)", "(1,2}", "1,2)", "{1,2", "(a)b"] {
            let err = transform_in_filter(&json!(bad)).unwrap_err();
            assert_eq!(
                err,
                FilterError::InvalidFilterValue {
                    pattern: IN_PATTERN,
                    value: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn in_array_element_error_names_the_element() {
        let err = transform_in_filter(&json!([1, true])).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidListElement {
                index: 1,
                value: "true".to_string()
            }
        );
        assert!(!err.to_string().contains(IN_PATTERN));
    }

    #[test]
    fn in_pattern_agrees_with_parser() {
        let samples = [
            "", "{}", "()", "a", "1,2", "{1,2}", "(1,2)", "{a, b}", "x-y,z",
            "{1,2)", "(1,2}", "1,2)", "(1,2", "{", ")", ",", "a,", ",a", "a,,b",
            "{a}}", "((a))", "1,(2)", "{a}x", "x{a}",
        ];
        for sample in samples {
            assert_eq!(
                IN_RE.is_match(sample),
                transform_in_filter(&json!(sample)).is_ok(),
                "pattern and parser disagree on {:?}",
                sample
            );
        }
    }
}

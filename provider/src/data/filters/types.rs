//! Filter type definitions
//!
//! Defines the operator table used to rewrite UI filter keys and the value
//! types handed to the record store.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use crate::utils::number::parse_float_prefix;

/// UI-level filter object: field or `field@operator` keys to raw JSON values
pub type Filter = serde_json::Map<String, Value>;

/// Store-native filter: rewritten keys to typed values
pub type TransformedFilter = BTreeMap<String, FilterValue>;

/// Separator between a field name and its operator in UI filter keys
pub const OPERATOR_SEPARATOR: char = '@';

/// Largest integer an `f64` represents exactly (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Operator suffixes recognised on UI filter keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    NotIs,
    Is,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Contains,
    Or,
}

/// How a rewritten key's value is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    Passthrough,
    InList,
    ContainsList,
    OrClauses,
}

/// Operator rules in matching priority, longest suffix first.
///
/// Keys are matched by exact suffix comparison against this table; the first
/// rule whose suffix ends the key wins.
pub const OPERATOR_RULES: &[Operator] = &[
    Operator::NotIs,
    Operator::Neq,
    Operator::Lte,
    Operator::Gte,
    Operator::Eq,
    Operator::Lt,
    Operator::Gt,
    Operator::Is,
    Operator::In,
    Operator::Contains,
    Operator::Or,
];

impl Operator {
    /// Key suffix including the `@` separator
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::NotIs => "@not.is",
            Self::Is => "@is",
            Self::Eq => "@eq",
            Self::Neq => "@neq",
            Self::Lt => "@lt",
            Self::Lte => "@lte",
            Self::Gt => "@gt",
            Self::Gte => "@gte",
            Self::In => "@in",
            Self::Contains => "@cs",
            Self::Or => "@or",
        }
    }

    pub const fn value_transform(&self) -> ValueTransform {
        match self {
            Self::In => ValueTransform::InList,
            Self::Contains => ValueTransform::ContainsList,
            Self::Or => ValueTransform::OrClauses,
            _ => ValueTransform::Passthrough,
        }
    }

    /// Split `field@op` into its field and operator.
    ///
    /// Returns `None` for keys without a recognised suffix and for keys whose
    /// field part would be empty (`"@eq"`).
    pub fn split_key(key: &str) -> Option<(&str, Operator)> {
        OPERATOR_RULES.iter().find_map(|op| {
            key.strip_suffix(op.suffix())
                .filter(|field| !field.is_empty())
                .map(|field| (field, *op))
        })
    }

    /// Store-native key for `field` under this operator
    pub fn rewrite_key(&self, field: &str) -> String {
        match self {
            Self::NotIs => format!("{}_neq", field),
            Self::Is => format!("{}_eq", field),
            Self::Eq => format!("{}_eq", field),
            Self::Neq => format!("{}_neq", field),
            Self::Lt => format!("{}_lt", field),
            Self::Lte => format!("{}_lte", field),
            Self::Gt => format!("{}_gt", field),
            Self::Gte => format!("{}_gte", field),
            Self::In => format!("{}_eq_any", field),
            Self::Contains => field.to_string(),
            Self::Or => super::search::SEARCH_KEY.to_string(),
        }
    }
}

/// Element of a parsed list literal
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Number(f64),
    Text(String),
}

impl ListItem {
    /// Numeric-coerce a list element, keeping the original text when no
    /// leading number parses.
    ///
    /// Non-finite results stay text: `"Infinity"`, `"NaN"` and `"1e400"` are
    /// kept as strings so every emitted number is representable in JSON.
    pub fn coerce(element: &str) -> Self {
        match parse_float_prefix(element) {
            Some(n) => Self::Number(n),
            None => Self::Text(element.to_string()),
        }
    }
}

impl Serialize for ListItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Integral values go out as JSON integers so `{1,2}` renders as `[1,2]`
            Self::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Value of a store-native filter key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Parsed list literal (`@in`, `@cs`)
    List(Vec<ListItem>),
    /// Arrays and objects passed through untouched
    Opaque(Value),
}

impl FilterValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// JSON form, as handed to a record store
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(list_item_json).collect()),
            Self::Opaque(v) => v.clone(),
        }
    }
}

fn list_item_json(item: &ListItem) -> Value {
    match item {
        ListItem::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
            Value::from(*n as i64)
        }
        ListItem::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
        ListItem::Text(s) => Value::String(s.clone()),
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            other @ (Value::Array(_) | Value::Object(_)) => Self::Opaque(other),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

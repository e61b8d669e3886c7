//! Filter error types

use serde_json::Value;
use thiserror::Error;

/// Errors raised while translating a UI filter object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A list value (`@in` / `@cs`) has the wrong type or malformed syntax
    #[error("Invalid filter value, expected a string matching {pattern}, got: {value}")]
    InvalidFilterValue { pattern: &'static str, value: String },

    /// An element of an `@in` array is neither a number nor a string
    #[error("Invalid list element at index {index}, expected a number or string, got: {value}")]
    InvalidListElement { index: usize, value: String },

    /// An `@or` payload is not an array of field/substring objects
    #[error("Invalid or filter: {0}")]
    InvalidOrClause(String),

    /// A composite search term could not be parsed back into clauses
    #[error("Invalid search term '{term}': {reason}")]
    InvalidSearchTerm { term: String, reason: String },

    #[error("Invalid filter JSON: {0}")]
    InvalidJson(String),

    #[error("Filter JSON exceeds maximum size of {limit} bytes")]
    JsonTooLarge { limit: usize },

    #[error("Filter must be a JSON object, got: {0}")]
    NotAnObject(String),

    #[error("Maximum {limit} filter keys allowed, got {count}")]
    TooManyKeys { limit: usize, count: usize },
}

impl FilterError {
    /// Build an `InvalidFilterValue`, echoing strings raw and other JSON compactly
    pub fn invalid_value(pattern: &'static str, value: &Value) -> Self {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self::InvalidFilterValue { pattern, value }
    }

    pub fn invalid_list_element(index: usize, value: &Value) -> Self {
        Self::InvalidListElement {
            index,
            value: value.to_string(),
        }
    }

    pub fn invalid_search_term(term: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSearchTerm {
            term: term.to_string(),
            reason: reason.into(),
        }
    }
}

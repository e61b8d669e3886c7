//! Filter parsing
//!
//! Parses a JSON filter object from the UI boundary with size and key limits.

use serde_json::Value;

use crate::core::constants::{DEFAULT_MAX_FILTER_JSON_BYTES, DEFAULT_MAX_FILTER_KEYS};

use super::error::FilterError;
use super::types::Filter;

/// Limits applied to filter JSON before translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterLimits {
    pub max_keys: usize,
    pub max_json_bytes: usize,
}

impl Default for FilterLimits {
    fn default() -> Self {
        Self {
            max_keys: DEFAULT_MAX_FILTER_KEYS,
            max_json_bytes: DEFAULT_MAX_FILTER_JSON_BYTES,
        }
    }
}

/// Parse a filter object from JSON.
///
/// `null` (or blank input) means "no filter" and yields `None`. Anything
/// other than an object is rejected.
pub fn parse_filter_json(json_str: &str, limits: &FilterLimits) -> Result<Option<Filter>, FilterError> {
    if json_str.len() > limits.max_json_bytes {
        return Err(FilterError::JsonTooLarge {
            limit: limits.max_json_bytes,
        });
    }

    if json_str.trim().is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(json_str).map_err(|e| FilterError::InvalidJson(e.to_string()))?;

    let filter = match value {
        Value::Null => return Ok(None),
        Value::Object(map) => map,
        other => return Err(FilterError::NotAnObject(other.to_string())),
    };

    if filter.len() > limits.max_keys {
        return Err(FilterError::TooManyKeys {
            limit: limits.max_keys,
            count: filter.len(),
        });
    }

    tracing::trace!(keys = filter.len(), "Parsed filter JSON");
    Ok(Some(filter))
}

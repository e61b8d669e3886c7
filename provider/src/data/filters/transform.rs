//! Operator-suffix dispatch
//!
//! Rewrites each `field@operator` key of a UI filter into the record store's
//! dialect, shaping list and OR values along the way.

use serde_json::Value;

use super::error::FilterError;
use super::list::{transform_contains_filter, transform_in_filter};
use super::search::transform_or_filter;
use super::types::{Filter, FilterValue, Operator, TransformedFilter, ValueTransform};

/// Translate a UI filter object into the store-native form.
///
/// `None` passes through as `None`. Keys without a recognised operator suffix
/// are copied unchanged, so an already-translated filter comes back as is.
/// Keys that rewrite to the same store key (`a@eq` and `a@is`, or several
/// `@or` keys) keep the value of the last one in input order.
pub fn transform_filter(filter: Option<&Filter>) -> Result<Option<TransformedFilter>, FilterError> {
    let Some(filter) = filter else {
        return Ok(None);
    };

    let mut transformed = TransformedFilter::new();
    for (key, value) in filter {
        let (key, value) = transform_entry(key, value)?;
        transformed.insert(key, value);
    }

    tracing::debug!(
        input_keys = filter.len(),
        output_keys = transformed.len(),
        "Transformed filter"
    );
    Ok(Some(transformed))
}

/// Translate a single filter entry
pub fn transform_entry(key: &str, value: &Value) -> Result<(String, FilterValue), FilterError> {
    let Some((field, op)) = Operator::split_key(key) else {
        return Ok((key.to_string(), FilterValue::from(value.clone())));
    };

    let rewritten = op.rewrite_key(field);
    let value = match op.value_transform() {
        ValueTransform::Passthrough => FilterValue::from(value.clone()),
        ValueTransform::InList => FilterValue::List(transform_in_filter(value)?),
        ValueTransform::ContainsList => FilterValue::List(transform_contains_filter(value)?),
        ValueTransform::OrClauses => FilterValue::Text(transform_or_filter(value)?),
    };

    tracing::trace!(from = key, to = %rewritten, "Rewrote filter key");
    Ok((rewritten, value))
}

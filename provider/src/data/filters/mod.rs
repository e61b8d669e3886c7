//! Filter translation
//!
//! Translates UI filter objects, whose keys carry PostgREST-style operator
//! suffixes, into the record store's query dialect.
//!
//! | UI key | Store key | Value |
//! |--------|-----------|-------|
//! | `f@eq` `f@neq` `f@lt` `f@lte` `f@gt` `f@gte` | `f_<op>` | unchanged |
//! | `f@is` / `f@not.is` | `f_eq` / `f_neq` | unchanged |
//! | `f@in` | `f_eq_any` | parsed list |
//! | `f@cs` | `f` | parsed `{a,b}` literal |
//! | `f@or` | `q` | composite search term |
//! | `f` | `f` | unchanged |
//!
//! ## Usage
//!
//! ```
//! use crm_provider::data::filters::{FilterLimits, parse_filter_json, transform_filter};
//!
//! let json_str = r#"{"age@gte": 18, "id@in": ["1", "2"]}"#;
//! let filter = parse_filter_json(json_str, &FilterLimits::default()).unwrap();
//! let transformed = transform_filter(filter.as_ref()).unwrap().unwrap();
//! assert_eq!(
//!     serde_json::to_value(&transformed).unwrap(),
//!     serde_json::json!({"age_gte": 18, "id_eq_any": [1, 2]})
//! );
//! ```

mod error;
mod list;
mod parser;
mod search;
mod transform;
mod types;

pub use error::FilterError;
pub use list::{CONTAINS_PATTERN, IN_PATTERN, transform_contains_filter, transform_in_filter};
pub use parser::{FilterLimits, parse_filter_json};
pub use search::{
    SEARCH_KEY, SearchClause, SearchOp, compose_search_term, or_clauses, parse_search_term,
    transform_or_filter,
};
pub use transform::{transform_entry, transform_filter};
pub use types::{
    Filter, FilterValue, ListItem, OPERATOR_RULES, OPERATOR_SEPARATOR, Operator,
    TransformedFilter, ValueTransform,
};

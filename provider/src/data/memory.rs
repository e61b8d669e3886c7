//! In-memory record store
//!
//! Holds records per resource and evaluates the store-native filter dialect:
//!
//! - `field_eq` / `field_neq` / `field_lt` / `field_lte` / `field_gt` / `field_gte`
//! - `field_eq_any` membership
//! - plain `field`: equality, or "contains all" when the record field is an array
//! - `q`: a composite `(field.ilike.*text*,...)` term, or plain full-text search
//!
//! Equality is loose across numbers and numeric strings (`"3" == 3`).
//! Ordering compares numbers numerically and strings lexically, so ISO dates
//! order correctly.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::data::error::StoreError;
use crate::data::filters::{
    FilterError, FilterValue, SEARCH_KEY, SearchClause, TransformedFilter, parse_search_term,
};
use crate::data::traits::{ListParams, ListResult, ManyReferenceParams, Record, RecordStore};

/// Store-native comparison suffixes, longest first
const COMPARISON_SUFFIXES: &[(&str, Comparison)] = &[
    ("_neq", Comparison::Neq),
    ("_lte", Comparison::Lte),
    ("_gte", Comparison::Gte),
    ("_eq", Comparison::Eq),
    ("_lt", Comparison::Lt),
    ("_gt", Comparison::Gt),
];

const ANY_OF_SUFFIX: &str = "_eq_any";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// A compiled filter entry
#[derive(Debug)]
enum Predicate<'a> {
    Compare {
        field: &'a str,
        op: Comparison,
        expected: Value,
    },
    AnyOf {
        field: &'a str,
        candidates: Vec<Value>,
    },
    Matches {
        field: &'a str,
        expected: Value,
    },
    Search(Vec<SearchClause>),
    FullText(String),
}

impl<'a> Predicate<'a> {
    fn compile(key: &'a str, value: &FilterValue) -> Result<Self, FilterError> {
        if key == SEARCH_KEY {
            let term = value.as_str().ok_or_else(|| {
                FilterError::invalid_search_term(&value.to_json().to_string(), "expected a string")
            })?;
            return if term.starts_with('(') {
                Ok(Self::Search(parse_search_term(term)?))
            } else {
                Ok(Self::FullText(term.to_lowercase()))
            };
        }

        if let Some(field) = key.strip_suffix(ANY_OF_SUFFIX) {
            let candidates = match value.to_json() {
                Value::Array(items) => items,
                single => vec![single],
            };
            return Ok(Self::AnyOf { field, candidates });
        }

        for (suffix, op) in COMPARISON_SUFFIXES {
            if let Some(field) = key.strip_suffix(suffix)
                && !field.is_empty()
            {
                return Ok(Self::Compare {
                    field,
                    op: *op,
                    expected: value.to_json(),
                });
            }
        }

        Ok(Self::Matches {
            field: key,
            expected: value.to_json(),
        })
    }

    fn matches(&self, record: &Record) -> bool {
        match self {
            Self::Compare {
                field,
                op,
                expected,
            } => {
                let actual = record.get(*field);
                match op {
                    Comparison::Eq => loose_eq(actual, expected),
                    Comparison::Neq => !loose_eq(actual, expected),
                    Comparison::Lt => compare(actual, expected) == Some(Ordering::Less),
                    Comparison::Lte => matches!(
                        compare(actual, expected),
                        Some(Ordering::Less | Ordering::Equal)
                    ),
                    Comparison::Gt => compare(actual, expected) == Some(Ordering::Greater),
                    Comparison::Gte => matches!(
                        compare(actual, expected),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                }
            }
            Self::AnyOf { field, candidates } => {
                let actual = record.get(*field);
                candidates.iter().any(|c| loose_eq(actual, c))
            }
            Self::Matches { field, expected } => match (record.get(*field), expected) {
                (Some(Value::Array(actual)), Value::Array(wanted)) => wanted
                    .iter()
                    .all(|w| actual.iter().any(|a| loose_eq(Some(a), w))),
                (Some(Value::Array(actual)), wanted) => {
                    actual.iter().any(|a| loose_eq(Some(a), wanted))
                }
                (actual, Value::Array(wanted)) => wanted.iter().any(|w| loose_eq(actual, w)),
                (actual, wanted) => loose_eq(actual, wanted),
            },
            Self::Search(clauses) => clauses.iter().any(|clause| {
                record
                    .get(&clause.field)
                    .and_then(searchable_text)
                    .is_some_and(|text| clause.matches(&text))
            }),
            Self::FullText(term) => record
                .values()
                .filter_map(searchable_text)
                .any(|text| text.to_lowercase().contains(term.as_str())),
        }
    }
}

/// Loose equality: missing equals `null`, numeric strings equal numbers
fn loose_eq(actual: Option<&Value>, expected: &Value) -> bool {
    match (actual, expected) {
        (None | Some(Value::Null), Value::Null) => true,
        (None, _) => false,
        (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Some(Value::String(s)), Value::Number(n)) | (Some(Value::Number(n)), Value::String(s)) => {
            s.parse::<f64>().ok() == n.as_f64()
        }
        (Some(a), b) => a == b,
    }
}

fn compare(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
    match (actual?, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::String(s), Value::Number(n)) => s.parse::<f64>().ok()?.partial_cmp(&n.as_f64()?),
        (Value::Number(n), Value::String(s)) => n.as_f64()?.partial_cmp(&s.parse::<f64>().ok()?),
        _ => None,
    }
}

fn searchable_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Record store backed by in-memory vectors
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    resources: HashMap<String, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `{"resource": [record, ...], ...}`
    pub fn from_json(json_str: &str) -> Result<Self, StoreError> {
        let Value::Object(root) = serde_json::from_str::<Value>(json_str)? else {
            return Err(StoreError::InvalidData(
                "root must be an object of resource arrays".to_string(),
            ));
        };

        let mut store = Self::new();
        for (name, records) in root {
            let Value::Array(items) = records else {
                return Err(StoreError::InvalidData(format!(
                    "resource '{}' must be an array",
                    name
                )));
            };
            let records = items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Ok(record),
                    other => Err(StoreError::InvalidData(format!(
                        "record in '{}' must be an object, got: {}",
                        name, other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?;
            store.resources.insert(name, records);
        }
        Ok(store)
    }

    /// Load a store from a JSON data file
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        tracing::debug!(path = %path.display(), "Loading record data");
        let content = fs::read_to_string(path)?;
        let store = Self::from_json(&content)?;
        tracing::debug!(resources = ?store.resource_names(), "Record data loaded");
        Ok(store)
    }

    /// Resource names, sorted
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn records(&self, resource: &str) -> Result<&[Record], StoreError> {
        self.resources
            .get(resource)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::unknown_resource(resource))
    }

    fn select(
        records: &[Record],
        filter: &TransformedFilter,
        mut scope: impl FnMut(&Record) -> bool,
    ) -> Result<ListResult, StoreError> {
        let predicates = filter
            .iter()
            .map(|(key, value)| Predicate::compile(key, value))
            .collect::<Result<Vec<_>, _>>()?;

        let data: Vec<Record> = records
            .iter()
            .filter(|record| scope(record) && predicates.iter().all(|p| p.matches(record)))
            .cloned()
            .collect();
        let total = data.len() as u64;

        Ok(ListResult { data, total })
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_list(&self, resource: &str, params: &ListParams) -> Result<ListResult, StoreError> {
        let records = self.records(resource)?;
        let result = Self::select(records, &params.filter, |_| true)?;
        tracing::debug!(resource, total = result.total, "Listed records");
        Ok(result)
    }

    async fn get_many_reference(
        &self,
        resource: &str,
        params: &ManyReferenceParams,
    ) -> Result<ListResult, StoreError> {
        let records = self.records(resource)?;
        let result = Self::select(records, &params.filter, |record| {
            loose_eq(record.get(&params.target), &params.id)
        })?;
        tracing::debug!(
            resource,
            target = %params.target,
            total = result.total,
            "Listed referencing records"
        );
        Ok(result)
    }
}

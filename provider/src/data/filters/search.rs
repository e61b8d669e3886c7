//! OR-clause search terms
//!
//! An `@or` filter carries an array of `{field: substring}` objects meaning
//! "any of these fields contains this text". They are flattened into one
//! composite term stored under the `q` key, written in PostgREST logic-tree
//! syntax:
//!
//! ```text
//! [{"first_name": "jo"}, {"email@like": "%acme%"}]
//!   -> (first_name.ilike.*jo*,email.like.*acme*)
//! ```
//!
//! Values containing reserved characters are double-quoted with `\` escapes.
//! [`parse_search_term`] reads the same syntax back for record stores.

use std::fmt;

use serde_json::Value;

use super::error::FilterError;
use super::types::OPERATOR_SEPARATOR;

/// Store-native key holding the composite search term
pub const SEARCH_KEY: &str = "q";

/// Characters that force a value to be quoted in a search term
const RESERVED_CHARS: &[char] = &[',', '.', ':', '(', ')', '"', '\\'];

/// Text-matching operator of a search clause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchOp {
    /// Case-insensitive substring match
    #[default]
    Ilike,
    /// Case-sensitive substring match
    Like,
}

impl SearchOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ilike => "ilike",
            Self::Like => "like",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "ilike" => Some(Self::Ilike),
            "like" => Some(Self::Like),
            _ => None,
        }
    }
}

impl fmt::Display for SearchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One "field contains text" condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchClause {
    pub field: String,
    pub op: SearchOp,
    pub value: String,
}

impl SearchClause {
    pub fn new(field: impl Into<String>, op: SearchOp, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Whether `text` contains this clause's value
    pub fn matches(&self, text: &str) -> bool {
        match self.op {
            SearchOp::Like => text.contains(&self.value),
            SearchOp::Ilike => text.to_lowercase().contains(&self.value.to_lowercase()),
        }
    }
}

impl fmt::Display for SearchClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = format!("*{}*", self.value);
        if needs_quoting(&pattern) {
            write!(f, "{}.{}.{}", self.field, self.op, quote(&pattern))
        } else {
            write!(f, "{}.{}.{}", self.field, self.op, pattern)
        }
    }
}

/// Flatten an `@or` payload into a composite search term.
///
/// Every field/value pair of every object is kept, in input order.
pub fn transform_or_filter(clauses: &Value) -> Result<String, FilterError> {
    let clauses = or_clauses(clauses)?;
    Ok(compose_search_term(&clauses))
}

/// Validate an `@or` payload and collect its clauses in order
pub fn or_clauses(value: &Value) -> Result<Vec<SearchClause>, FilterError> {
    let Value::Array(items) = value else {
        return Err(FilterError::InvalidOrClause(format!(
            "expected an array of objects, got: {}",
            value
        )));
    };

    let mut clauses = Vec::new();
    for item in items {
        let Value::Object(conditions) = item else {
            return Err(FilterError::InvalidOrClause(format!(
                "expected an object, got: {}",
                item
            )));
        };
        for (key, raw) in conditions {
            clauses.push(clause_from_entry(key, raw)?);
        }
    }

    if clauses.is_empty() {
        return Err(FilterError::InvalidOrClause(
            "at least one field condition is required".to_string(),
        ));
    }

    Ok(clauses)
}

fn clause_from_entry(key: &str, raw: &Value) -> Result<SearchClause, FilterError> {
    let (field, op) = match key.rsplit_once(OPERATOR_SEPARATOR) {
        Some((field, op)) => {
            let op = SearchOp::parse(op).ok_or_else(|| {
                FilterError::InvalidOrClause(format!("unsupported operator in key '{}'", key))
            })?;
            (field, op)
        }
        None => (key, SearchOp::default()),
    };

    if field.is_empty() || field.contains(RESERVED_CHARS) || field.contains(char::is_whitespace) {
        return Err(FilterError::InvalidOrClause(format!(
            "invalid field name '{}'",
            field
        )));
    }

    let value = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            return Err(FilterError::InvalidOrClause(format!(
                "value for '{}' must be a string, number or boolean, got: {}",
                key, other
            )));
        }
    };

    // SQL-style wildcards around the substring are implied by the clause
    let value = value.trim_matches('%').to_string();

    Ok(SearchClause::new(field, op, value))
}

/// Render clauses as `(c1,c2,...)`
pub fn compose_search_term(clauses: &[SearchClause]) -> String {
    let body = clauses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("({})", body)
}

/// Parse a composite search term back into its clauses
pub fn parse_search_term(term: &str) -> Result<Vec<SearchClause>, FilterError> {
    let body = term
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| FilterError::invalid_search_term(term, "expected (clause,...)"))?;

    split_top_level(body)
        .ok_or_else(|| FilterError::invalid_search_term(term, "unterminated quoted value"))?
        .into_iter()
        .map(|clause| parse_clause(term, clause))
        .collect()
}

fn parse_clause(term: &str, clause: &str) -> Result<SearchClause, FilterError> {
    let mut parts = clause.splitn(3, '.');
    let (Some(field), Some(op), Some(pattern)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FilterError::invalid_search_term(
            term,
            format!("expected field.op.value, got '{}'", clause),
        ));
    };

    if field.is_empty() {
        return Err(FilterError::invalid_search_term(term, "empty field name"));
    }

    let op = SearchOp::parse(op).ok_or_else(|| {
        FilterError::invalid_search_term(term, format!("unsupported operator '{}'", op))
    })?;

    let pattern = match pattern.strip_prefix('"') {
        Some(quoted) => unquote(quoted).ok_or_else(|| {
            FilterError::invalid_search_term(term, format!("malformed quoted value in '{}'", clause))
        })?,
        None => pattern.to_string(),
    };

    let value = pattern.strip_prefix('*').unwrap_or(&pattern);
    let value = value.strip_suffix('*').unwrap_or(value);

    Ok(SearchClause::new(field, op, value))
}

/// Split on commas outside double quotes; `None` if a quote is left open
fn split_top_level(body: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quotes {
        return None;
    }
    parts.push(&body[start..]);
    Some(parts)
}

fn needs_quoting(s: &str) -> bool {
    s.contains(RESERVED_CHARS) || s.contains(char::is_whitespace)
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Unescape the tail of a quoted value (opening quote already stripped)
fn unquote(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => return chars.next().is_none().then_some(out),
            _ => out.push(c),
        }
    }
    None
}

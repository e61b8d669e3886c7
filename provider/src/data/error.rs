//! Error type for the record-store layer

use thiserror::Error;

use super::filters::FilterError;

/// Errors from record stores and the filter-translating provider
#[derive(Error, Debug)]
pub enum StoreError {
    /// The caller's filter could not be translated or evaluated
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Record data does not have the expected shape
    #[error("Invalid record data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn unknown_resource(resource: impl Into<String>) -> Self {
        Self::UnknownResource(resource.into())
    }
}

//! Record-store trait
//!
//! A record store answers list queries written in the store-native filter
//! dialect (`field_gte`, `field_eq_any`, `q`, ...). The filter-translating
//! provider sits in front of it and converts UI filters first.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::data::error::StoreError;
use crate::data::filters::TransformedFilter;

/// A single record (JSON object)
pub type Record = serde_json::Map<String, Value>;

/// Parameters for listing records of a resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub filter: TransformedFilter,
}

/// Parameters for listing records that reference another record
#[derive(Debug, Clone, PartialEq)]
pub struct ManyReferenceParams {
    /// Field holding the reference (e.g. `company_id`)
    pub target: String,
    /// Referenced record id
    pub id: Value,
    pub filter: TransformedFilter,
}

/// Matching records and their count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListResult {
    pub data: Vec<Record>,
    pub total: u64,
}

/// Repository trait for record stores
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List records of `resource` matching the filter
    async fn get_list(&self, resource: &str, params: &ListParams) -> Result<ListResult, StoreError>;

    /// List records of `resource` whose `target` field equals `id` and that
    /// match the filter
    async fn get_many_reference(
        &self,
        resource: &str,
        params: &ManyReferenceParams,
    ) -> Result<ListResult, StoreError>;
}

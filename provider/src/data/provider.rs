//! Filter-translating data provider
//!
//! Wraps a [`RecordStore`] and translates UI filters before every list call.
//! Filter failures surface as [`StoreError::Filter`] and the store is not
//! queried.

use serde_json::Value;

use super::error::StoreError;
use super::filters::{Filter, TransformedFilter, transform_filter};
use super::traits::{ListParams, ListResult, ManyReferenceParams, RecordStore};

/// List query as issued by the UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filter: Option<Filter>,
}

/// Many-reference query as issued by the UI
#[derive(Debug, Clone, PartialEq)]
pub struct ManyReferenceQuery {
    pub target: String,
    pub id: Value,
    pub filter: Option<Filter>,
}

pub struct FilterTranslatingProvider<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> FilterTranslatingProvider<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_list(&self, resource: &str, query: &ListQuery) -> Result<ListResult, StoreError> {
        let filter = translate(resource, query.filter.as_ref())?;
        self.store.get_list(resource, &ListParams { filter }).await
    }

    pub async fn get_many_reference(
        &self,
        resource: &str,
        query: &ManyReferenceQuery,
    ) -> Result<ListResult, StoreError> {
        let filter = translate(resource, query.filter.as_ref())?;
        let params = ManyReferenceParams {
            target: query.target.clone(),
            id: query.id.clone(),
            filter,
        };
        self.store.get_many_reference(resource, &params).await
    }
}

fn translate(resource: &str, filter: Option<&Filter>) -> Result<TransformedFilter, StoreError> {
    match transform_filter(filter) {
        Ok(transformed) => Ok(transformed.unwrap_or_default()),
        Err(e) => {
            tracing::warn!(resource, error = %e, "Rejected filter");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filters::{FilterError, FilterValue};
    use crate::data::memory::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records the params each call received
    #[derive(Default)]
    struct RecordingStore {
        seen: Mutex<Vec<TransformedFilter>>,
    }

    #[async_trait]
    impl RecordStore for RecordingStore {
        async fn get_list(
            &self,
            _resource: &str,
            params: &ListParams,
        ) -> Result<ListResult, StoreError> {
            self.seen.lock().unwrap().push(params.filter.clone());
            Ok(ListResult::default())
        }

        async fn get_many_reference(
            &self,
            _resource: &str,
            params: &ManyReferenceParams,
        ) -> Result<ListResult, StoreError> {
            self.seen.lock().unwrap().push(params.filter.clone());
            Ok(ListResult::default())
        }
    }

    fn filter(value: Value) -> Option<Filter> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_list_translates_filter() {
        let provider = FilterTranslatingProvider::new(RecordingStore::default());
        let query = ListQuery {
            filter: filter(json!({"age@gte": 18, "status": "hot"})),
        };
        provider.get_list("contacts", &query).await.unwrap();

        let seen = provider.store.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["age_gte"], FilterValue::from(json!(18)));
        assert_eq!(seen[0]["status"], FilterValue::from("hot"));
    }

    #[tokio::test]
    async fn test_absent_filter_becomes_empty() {
        let provider = FilterTranslatingProvider::new(RecordingStore::default());
        provider
            .get_list("contacts", &ListQuery::default())
            .await
            .unwrap();

        let seen = provider.store.seen.lock().unwrap();
        assert!(seen[0].is_empty());
    }

    #[tokio::test]
    async fn test_invalid_filter_skips_store() {
        let provider = FilterTranslatingProvider::new(RecordingStore::default());
        let query = ListQuery {
            filter: filter(json!({"tags@cs": "1,2"})),
        };
        let err = provider.get_list("contacts", &query).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Filter(FilterError::InvalidFilterValue { .. })
        ));
        assert!(provider.store.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_many_reference_translates_filter() {
        let provider = FilterTranslatingProvider::new(RecordingStore::default());
        let query = ManyReferenceQuery {
            target: "company_id".to_string(),
            id: json!(1),
            filter: filter(json!({"id@in": "(3,4)"})),
        };
        provider
            .get_many_reference("contacts", &query)
            .await
            .unwrap();

        let seen = provider.store.seen.lock().unwrap();
        assert_eq!(
            serde_json::to_value(&seen[0]).unwrap(),
            json!({"id_eq_any": [3, 4]})
        );
    }

    #[tokio::test]
    async fn test_end_to_end_with_memory_store() {
        let store = MemoryStore::from_json(
            &json!({
                "deals": [
                    {"id": 1, "name": "Lorem deal", "amount": 500, "company_id": 7},
                    {"id": 2, "name": "Ipsum deal", "amount": 1500, "company_id": 7},
                    {"id": 3, "name": "Dolor deal", "amount": 2500, "company_id": 8}
                ]
            })
            .to_string(),
        )
        .unwrap();
        let provider = FilterTranslatingProvider::new(store);

        let query = ListQuery {
            filter: filter(json!({
                "amount@gte": 1000,
                "q@or": [{"name@ilike": "%DEAL%"}]
            })),
        };
        let result = provider.get_list("deals", &query).await.unwrap();
        assert_eq!(result.total, 2);

        let query = ManyReferenceQuery {
            target: "company_id".to_string(),
            id: json!(7),
            filter: filter(json!({"id@neq": 1})),
        };
        let result = provider.get_many_reference("deals", &query).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.data[0]["id"], 2);
    }
}

//! Data layer: filter translation and record stores

pub mod error;
pub mod filters;
pub mod memory;
pub mod provider;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use provider::{FilterTranslatingProvider, ListQuery, ManyReferenceQuery};
pub use traits::{ListParams, ListResult, ManyReferenceParams, Record, RecordStore};

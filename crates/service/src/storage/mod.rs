//! Storage abstractions for service layer
//!
//! A `StorageBackend` owns one store per collection, addressed by name.
//! `JsonFileBackend` persists each collection as `{name}.json`; `InMemoryBackend`
//! keeps everything in a map and is what the tests run against.

use async_trait::async_trait;

use crate::collection::Document;
use crate::errors::ServiceError;

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryBackend;
pub use json_file::JsonFileBackend;

/// Per-collection persistence capability used by `CollectionStore`.
///
/// Implementations do not serialize access themselves; callers hold the
/// collection lock across read-modify-write sequences.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Whether a store exists for the collection.
    async fn exists(&self, collection: &str) -> Result<bool, ServiceError>;

    /// Initialize an empty store. Returns `false` if one was already present.
    async fn create(&self, collection: &str) -> Result<bool, ServiceError>;

    /// All documents of the collection in store order, `None` if it has no store.
    async fn read(&self, collection: &str) -> Result<Option<Vec<Document>>, ServiceError>;

    /// Replace the collection's contents.
    async fn write(&self, collection: &str, documents: &[Document]) -> Result<(), ServiceError>;

    /// Destroy the store. Returns whether it existed.
    async fn remove(&self, collection: &str) -> Result<bool, ServiceError>;

    /// Names of every existing store, sorted.
    async fn list(&self) -> Result<Vec<String>, ServiceError>;
}

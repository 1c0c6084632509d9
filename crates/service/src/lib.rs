//! Service layer for the collections API.
//! - `collection` holds the document model and the `CollectionStore` operations.
//! - `storage` abstracts where a collection's documents live (JSON files or memory).
//! - Errors are reported through a single `ServiceError` taxonomy.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod collection;

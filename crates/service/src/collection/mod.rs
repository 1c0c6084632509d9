//! Named collections of JSON documents.

pub mod document;
pub mod locks;
pub mod store;
pub mod validation;

pub use document::{parse_document_id, parse_id_list, Content, Document, DocumentInput};
pub use store::{CollectionStore, StorePolicy};
pub use validation::validate_collection_name;

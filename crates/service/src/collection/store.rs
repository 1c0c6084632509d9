use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::document::{parse_id_list, Content, Document};
use super::locks::CollectionLocks;
use super::validation::validate_collection_name;
use crate::errors::ServiceError;
use crate::storage::StorageBackend;

/// How document operations treat a collection that has no store yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorePolicy {
    /// `true`: initialize an empty store on first access.
    /// `false`: fail with `NotFound` and leave storage untouched.
    pub auto_create: bool,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self { auto_create: true }
    }
}

/// CRUD over named collections of documents.
///
/// Every operation on a collection runs under that collection's lock, so
/// concurrent writers to the same collection cannot lose each other's updates.
pub struct CollectionStore {
    backend: Arc<dyn StorageBackend>,
    locks: CollectionLocks,
    policy: StorePolicy,
}

impl CollectionStore {
    pub fn new(backend: Arc<dyn StorageBackend>, policy: StorePolicy) -> Arc<Self> {
        Arc::new(Self { backend, locks: CollectionLocks::new(), policy })
    }

    /// Initialize an empty collection; `AlreadyExists` if it has a store.
    pub async fn create_collection(&self, name: &str) -> Result<(), ServiceError> {
        validate_collection_name(name)?;
        let _guard = self.locks.acquire(name).await;
        if !self.backend.create(name).await? {
            return Err(ServiceError::AlreadyExists(format!("collection '{}' already exists", name)));
        }
        info!(collection = name, "collection created");
        Ok(())
    }

    /// Names of all existing collections, sorted.
    pub async fn list_collections(&self) -> Result<Vec<String>, ServiceError> {
        self.backend.list().await
    }

    /// Destroy a collection and every document in it.
    pub async fn delete_collection(&self, name: &str) -> Result<(), ServiceError> {
        validate_collection_name(name)?;
        let _guard = self.locks.acquire(name).await;
        if !self.backend.remove(name).await? {
            return Err(ServiceError::collection_not_found(name));
        }
        info!(collection = name, "collection deleted");
        Ok(())
    }

    /// Load a collection's documents, creating its store first when the policy allows.
    /// Callers must hold the collection lock.
    async fn get_or_create_store(&self, name: &str) -> Result<Vec<Document>, ServiceError> {
        if let Some(documents) = self.backend.read(name).await? {
            return Ok(documents);
        }
        if !self.policy.auto_create {
            return Err(ServiceError::collection_not_found(name));
        }
        self.backend.create(name).await?;
        debug!(collection = name, "collection created on first access");
        Ok(Vec::new())
    }

    pub async fn create_document(&self, name: &str, content: Content) -> Result<Document, ServiceError> {
        validate_collection_name(name)?;
        let _guard = self.locks.acquire(name).await;
        let mut documents = self.get_or_create_store(name).await?;
        let document = Document::new(content);
        documents.push(document.clone());
        self.backend.write(name, &documents).await?;
        info!(collection = name, id = %document.id, "document created");
        Ok(document)
    }

    pub async fn list_documents(&self, name: &str) -> Result<Vec<Document>, ServiceError> {
        validate_collection_name(name)?;
        let _guard = self.locks.acquire(name).await;
        self.get_or_create_store(name).await
    }

    pub async fn get_document(&self, name: &str, id: Uuid) -> Result<Document, ServiceError> {
        validate_collection_name(name)?;
        let _guard = self.locks.acquire(name).await;
        self.get_or_create_store(name)
            .await?
            .into_iter()
            .find(|doc| doc.id == id)
            .ok_or_else(|| ServiceError::not_found("document"))
    }

    /// Replace a document's content; `id`, `createdOn` and `syncRequired` are kept.
    pub async fn update_document(&self, name: &str, id: Uuid, content: Content) -> Result<Document, ServiceError> {
        validate_collection_name(name)?;
        let _guard = self.locks.acquire(name).await;
        let mut documents = self.get_or_create_store(name).await?;
        let document = documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| ServiceError::not_found("document"))?;
        document.replace_content(content);
        let updated = document.clone();
        self.backend.write(name, &documents).await?;
        info!(collection = name, id = %id, "document updated");
        Ok(updated)
    }

    pub async fn delete_document(&self, name: &str, id: Uuid) -> Result<(), ServiceError> {
        validate_collection_name(name)?;
        let _guard = self.locks.acquire(name).await;
        let mut documents = self.get_or_create_store(name).await?;
        let before = documents.len();
        documents.retain(|doc| doc.id != id);
        if documents.len() == before {
            return Err(ServiceError::not_found("document"));
        }
        self.backend.write(name, &documents).await?;
        info!(collection = name, id = %id, "document deleted");
        Ok(())
    }

    /// Remove every document whose id appears in the comma-delimited `ids`.
    /// Malformed or unknown ids are skipped; returns how many were removed.
    pub async fn bulk_delete_documents(&self, name: &str, ids: &str) -> Result<usize, ServiceError> {
        validate_collection_name(name)?;
        let ids = parse_id_list(ids);
        let _guard = self.locks.acquire(name).await;
        let mut documents = self.get_or_create_store(name).await?;
        let before = documents.len();
        documents.retain(|doc| !ids.contains(&doc.id));
        let deleted = before - documents.len();
        if deleted > 0 {
            self.backend.write(name, &documents).await?;
        }
        info!(collection = name, requested = ids.len(), count = deleted, "bulk delete");
        Ok(deleted)
    }
}

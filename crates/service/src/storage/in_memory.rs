use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StorageBackend;
use crate::collection::Document;
use crate::errors::ServiceError;

/// Map-backed storage; nothing touches the filesystem.
#[derive(Default)]
pub struct InMemoryBackend {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for InMemoryBackend {
    async fn exists(&self, collection: &str) -> Result<bool, ServiceError> {
        Ok(self.collections.read().await.contains_key(collection))
    }

    async fn create(&self, collection: &str) -> Result<bool, ServiceError> {
        let mut map = self.collections.write().await;
        if map.contains_key(collection) {
            return Ok(false);
        }
        map.insert(collection.to_string(), Vec::new());
        Ok(true)
    }

    async fn read(&self, collection: &str) -> Result<Option<Vec<Document>>, ServiceError> {
        Ok(self.collections.read().await.get(collection).cloned())
    }

    async fn write(&self, collection: &str, documents: &[Document]) -> Result<(), ServiceError> {
        let mut map = self.collections.write().await;
        map.insert(collection.to_string(), documents.to_vec());
        Ok(())
    }

    async fn remove(&self, collection: &str) -> Result<bool, ServiceError> {
        Ok(self.collections.write().await.remove(collection).is_some())
    }

    async fn list(&self) -> Result<Vec<String>, ServiceError> {
        let mut names: Vec<String> = self.collections.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

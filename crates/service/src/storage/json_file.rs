use std::{io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};

use super::StorageBackend;
use crate::collection::{validate_collection_name, Document};
use crate::errors::ServiceError;

const EXTENSION: &str = "json";

/// JSON file-backed collection storage.
///
/// Each collection lives in `{root}/{name}.json` as a JSON array of documents.
/// Writes land in a `.json.tmp` sibling first and are renamed into place, so a
/// reader never observes a half-written file.
#[derive(Clone, Debug)]
pub struct JsonFileBackend {
    root: PathBuf,
}

impl JsonFileBackend {
    /// Initialize the backend over a directory. Creates the directory if missing.
    pub async fn new<P: Into<PathBuf>>(root: P) -> Result<Arc<Self>, ServiceError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| ServiceError::storage(format!("create {}", root.display()), e))?;
        Ok(Arc::new(Self { root }))
    }

    fn file_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.{EXTENSION}"))
    }

    fn tmp_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.{EXTENSION}.tmp"))
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn exists(&self, collection: &str) -> Result<bool, ServiceError> {
        match fs::metadata(self.file_path(collection)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServiceError::storage(format!("stat collection '{collection}'"), e)),
        }
    }

    async fn create(&self, collection: &str) -> Result<bool, ServiceError> {
        let path = self.file_path(collection);
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(ServiceError::storage(format!("create collection '{collection}'"), e)),
        };
        file.write_all(b"[]")
            .await
            .map_err(|e| ServiceError::storage(format!("initialize collection '{collection}'"), e))?;
        file.flush()
            .await
            .map_err(|e| ServiceError::storage(format!("initialize collection '{collection}'"), e))?;
        debug!(collection, path = %path.display(), "collection file created");
        Ok(true)
    }

    async fn read(&self, collection: &str) -> Result<Option<Vec<Document>>, ServiceError> {
        let bytes = match fs::read(self.file_path(collection)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ServiceError::storage(format!("read collection '{collection}'"), e)),
        };
        // an empty file counts as an empty collection
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Some(Vec::new()));
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ServiceError::storage(format!("decode collection '{collection}'"), e))
    }

    async fn write(&self, collection: &str, documents: &[Document]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(documents)
            .map_err(|e| ServiceError::storage(format!("encode collection '{collection}'"), e))?;
        let tmp = self.tmp_path(collection);
        fs::write(&tmp, data)
            .await
            .map_err(|e| ServiceError::storage(format!("write collection '{collection}'"), e))?;
        fs::rename(&tmp, self.file_path(collection))
            .await
            .map_err(|e| ServiceError::storage(format!("replace collection '{collection}'"), e))?;
        Ok(())
    }

    async fn remove(&self, collection: &str) -> Result<bool, ServiceError> {
        match fs::remove_file(self.file_path(collection)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServiceError::storage(format!("remove collection '{collection}'"), e)),
        }
    }

    async fn list(&self) -> Result<Vec<String>, ServiceError> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| ServiceError::storage(format!("list {}", self.root.display()), e))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ServiceError::storage(format!("list {}", self.root.display()), e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            match entry.file_type().await {
                Ok(ft) if ft.is_file() => {}
                _ => continue,
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                warn!(path = %path.display(), "skipping collection file with non-utf8 name");
                continue;
            };
            // 只列出可以通过 API 访问的集合名
            if let Err(e) = validate_collection_name(stem) {
                warn!(path = %path.display(), error = %e, "skipping collection file with unusable name");
                continue;
            }
            names.push(stem.to_string());
        }
        names.sort();
        Ok(names)
    }
}

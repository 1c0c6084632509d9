use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Client-supplied document body: always a key-value object.
pub type Content = Map<String, Value>;

/// A stored document.
///
/// `id` and `created_on` never change after creation. `sync_required` starts
/// out `true` and no store operation modifies it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub content: Content,
    pub sync_required: bool,
}

/// Create/update payload: `{"content": {...}}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DocumentInput {
    pub content: Content,
}

impl Document {
    pub fn new(content: Content) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_on: now,
            updated_on: now,
            content,
            sync_required: true,
        }
    }

    /// Swap in new content and move `updated_on` forward.
    pub fn replace_content(&mut self, content: Content) {
        self.content = content;
        self.updated_on = next_timestamp(self.updated_on);
    }
}

/// Current time, bumped past `previous` if the clock has not advanced.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::nanoseconds(1)
    }
}

/// Parse a document id taken from a request path.
pub fn parse_document_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::InvalidIdentifier(format!("'{}' is not a valid document id", raw)))
}

/// Parse a comma-delimited id list. Blank and malformed entries are dropped;
/// repeated ids are kept once, in first-seen order.
pub fn parse_id_list(raw: &str) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = Vec::new();
    for id in raw.split(',').filter_map(|part| Uuid::parse_str(part.trim()).ok()) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

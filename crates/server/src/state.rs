use std::sync::Arc;

use service::collection::CollectionStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CollectionStore>,
}

impl AppState {
    pub fn new(store: Arc<CollectionStore>) -> Self {
        Self { store }
    }
}

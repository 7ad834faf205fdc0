use std::sync::Arc;

use crate::integrity::IntegrityKey;
use crate::store::SaveStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SaveStore>,
    pub key: Arc<IntegrityKey>,
}

impl AppState {
    pub fn new(store: Arc<dyn SaveStore>, secret: &str) -> Self {
        AppState {
            store,
            key: Arc::new(IntegrityKey::new(secret)),
        }
    }
}

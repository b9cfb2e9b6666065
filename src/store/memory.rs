use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::AuthError,
    store::{TokenStore, credential_key},
    types::Credential,
};

/// Credential store backed by a process-wide map.
///
/// Entries are partitioned by the same `token:<visitor_id>` keys as the
/// session backend. The lock guards map access only and is never held
/// across a network call, so no visitor can block another.
#[derive(Clone)]
pub struct MemoryTokenStore {
    entries: Arc<RwLock<HashMap<String, Credential>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        MemoryTokenStore {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, visitor_id: &str) -> Result<Option<Credential>, AuthError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&credential_key(visitor_id)).cloned())
    }

    async fn put(&self, visitor_id: &str, credential: Credential) -> Result<(), AuthError> {
        let mut entries = self.entries.write().await;
        entries.insert(credential_key(visitor_id), credential);
        Ok(())
    }

    async fn clear(&self, visitor_id: &str) -> Result<(), AuthError> {
        let mut entries = self.entries.write().await;
        entries.remove(&credential_key(visitor_id));
        Ok(())
    }
}

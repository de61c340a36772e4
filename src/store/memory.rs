use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::model::UserRecord;
use crate::store::{CredentialStore, StoreError};

/// In-memory store with the same insert-if-absent semantics as the RocksDB
/// backend. Used by the service tests.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.records.lock().await.get(username).cloned())
    }

    async fn insert(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        if records.contains_key(&record.username) {
            return Err(StoreError::Duplicate);
        }
        records.insert(record.username.clone(), record.clone());
        Ok(())
    }

    async fn update_device_type(
        &self,
        username: &str,
        device_type: &str,
    ) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let record = records.get_mut(username).ok_or(StoreError::NotFound)?;
        record.device_type = device_type.to_string();
        Ok(())
    }
}

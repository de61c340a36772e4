use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rocksdb::{Options, DB};
use tokio::sync::Mutex;

use crate::model::UserRecord;
use crate::store::{CredentialStore, StoreError};

/// RocksDB-backed store. Records are keyed by username, so the key itself is
/// the unique index; `write_lock` serializes the check+put inside `insert`
/// (and the read-modify-write in `update_device_type`) to keep them atomic.
/// Reads never take the lock.
pub struct RocksStore {
    db: DB,
    write_lock: Mutex<()>,
}

fn user_key(username: &str) -> String {
    format!("user:{username}")
}

impl RocksStore {
    pub fn open(path: &str) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }

    fn get_record(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let raw = self
            .db
            .get(user_key(username))
            .map_err(|e| StoreError::Backend(e.into()))?;
        raw.map(|v| serde_json::from_slice(&v))
            .transpose()
            .map_err(|e| StoreError::Backend(anyhow!("corrupt user record: {e}")))
    }

    fn put_record(&self, record: &UserRecord) -> Result<(), StoreError> {
        let val = serde_json::to_vec(record).map_err(|e| StoreError::Backend(e.into()))?;
        self.db
            .put(user_key(&record.username), val)
            .map_err(|e| StoreError::Backend(e.into()))
    }
}

#[async_trait]
impl CredentialStore for RocksStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        self.get_record(username)
    }

    async fn insert(&self, record: &UserRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if self.get_record(&record.username)?.is_some() {
            return Err(StoreError::Duplicate);
        }
        self.put_record(record)
    }

    async fn update_device_type(
        &self,
        username: &str,
        device_type: &str,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.get_record(username)?.ok_or(StoreError::NotFound)?;
        record.device_type = device_type.to_string();
        self.put_record(&record)
    }
}

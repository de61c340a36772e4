//! Credential store: durable username → UserRecord mapping.
//!
//! The service talks to the trait only; `RocksStore` is the production
//! backend, `MemoryStore` backs the service tests.

pub mod memory;
pub mod rocks;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::UserRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already present")]
    Duplicate,
    #[error("record not found")]
    NotFound,
    #[error("backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Absence is not an error; only backend failures are.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Atomic insert-if-absent. This is the authoritative uniqueness gate;
    /// any pre-check the caller does is advisory only.
    async fn insert(&self, record: &UserRecord) -> Result<(), StoreError>;

    async fn update_device_type(&self, username: &str, device_type: &str)
        -> Result<(), StoreError>;
}

pub use memory::MemoryStore;
pub use rocks::RocksStore;

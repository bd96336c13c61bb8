//! Key-value blob storage for grid snapshots.
//!
//! The engine treats the store as opaque: one string blob per key. Redis is
//! used when configured, otherwise snapshots only live as long as the process.

pub mod memory;
pub mod redis_store;

use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::MemorySnapshotStore;
pub use self::redis_store::RedisSnapshotStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn save(&self, key: &str, blob: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

use super::{SnapshotStore, StoreError};
use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::info;

/// Snapshots kept as plain Redis strings without TTL, booked seats must
/// outlive the process.
#[derive(Clone)]
pub struct RedisSnapshotStore {
    conn: MultiplexedConnection,
}

impl RedisSnapshotStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis snapshot store connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let blob: Option<String> = conn.get(key).await?;
        Ok(blob)
    }

    async fn save(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, blob).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

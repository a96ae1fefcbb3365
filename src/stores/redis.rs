use async_trait::async_trait;
use log::{debug, info};
use redis::{aio::ConnectionManager, AsyncCommands};

use super::KeyValueStore;
use crate::errors::StoreError;

type Result<T> = std::result::Result<T, StoreError>;

/// Redis-backed key-value store.
///
/// `ConnectionManager` multiplexes one connection and reconnects on failure,
/// so the store is cheap to clone into per-request tasks.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connects to the Redis server named by `url` and verifies the
    /// connection can be established.
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to key-value store");
        debug!("Store URL: {}", url);

        let client = redis::Client::open(url)
            .map_err(|e| StoreError::Unavailable(format!("invalid store URL: {}", e)))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Unavailable(format!("connection failed: {}", e)))?;

        info!("Key-value store connection established");
        Ok(Self { manager })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn put_with_ttl(&self, key: &str, value: &str, ttl_sec: u64) -> Result<()> {
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_sec).await?;
        Ok(())
    }
}

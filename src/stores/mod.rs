// src/stores/mod.rs - Key-value store abstraction
//
// All persistent state (link records, dedup entries, rate-limit counters)
// lives behind this trait. The production binding is Redis; tests run
// against MockKeyValueStore or the in-memory double.
use async_trait::async_trait;

mod redis;

pub use self::redis::RedisStore;

#[cfg(test)]
mod memory;
#[cfg(test)]
pub use memory::MemoryStore;

use crate::errors::StoreError;

type Result<T> = std::result::Result<T, StoreError>;

/// Minimal get/put/put-with-TTL contract over an external key-value service.
///
/// No cross-key atomicity or compare-and-swap is assumed; callers that need
/// uniqueness (code allocation) implement read-then-write with bounded
/// retries on top of this.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetches the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` with no expiry, overwriting any previous
    /// value.
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Stores `value` under `key` with a TTL in seconds; the entry
    /// self-expires without further interaction.
    async fn put_with_ttl(&self, key: &str, value: &str, ttl_sec: u64) -> Result<()>;
}

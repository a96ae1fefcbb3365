use redis::RedisError;
use thiserror::Error;

/// Error type for key-value store operations.
///
/// Store calls are not retried; a transient backend failure surfaces to the
/// request that triggered it as a 500-class response.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection or command failure in the backing store
    #[error("Key-value store error: {0}")]
    Backend(#[from] RedisError),

    /// The configured store binding could not be established
    #[error("Store binding unavailable: {0}")]
    Unavailable(String),
}

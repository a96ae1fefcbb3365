// src/services/rate_limiter.rs - Fixed-window request counting
use std::sync::Arc;

use chrono::Utc;
use log::debug;

use crate::config::ShortenerConfig;
use crate::errors::AppError;
use crate::models::RateDecision;
use crate::stores::KeyValueStore;

type Result<T> = std::result::Result<T, AppError>;

/// Fixed-window rate limiter backed by a TTL-expiring cache entry.
///
/// The counter key is derived from the client identity and the window index
/// `floor(now / window)`, so rollover needs no explicit reset: a new window
/// means a new key starting at zero, and the TTL clears the old one.
///
/// The read-then-write is not atomic against the cache; concurrent requests
/// from the same identity may under-count. Accepted for abuse mitigation,
/// not a hard quota.
pub struct RateLimiter {
    cache: Arc<dyn KeyValueStore>,
    window_sec: i64,
    max_req: i64,
}

impl RateLimiter {
    pub fn new(cache: Arc<dyn KeyValueStore>, cfg: &ShortenerConfig) -> Self {
        Self {
            cache,
            window_sec: cfg.rl_window_sec.max(10),
            max_req: cfg.rl_max_req.max(1),
        }
    }

    /// Checks and, when admitted, counts one request for `identity`.
    pub async fn check(&self, identity: &str) -> Result<RateDecision> {
        self.check_at(identity, Utc::now().timestamp()).await
    }

    /// Clock-injected variant of [`check`](Self::check); `now` is epoch
    /// seconds.
    pub async fn check_at(&self, identity: &str, now: i64) -> Result<RateDecision> {
        let bucket = now.div_euclid(self.window_sec);
        let key = format!("rl:{}:{}", bucket, identity);

        let count = match self.cache.get(&key).await? {
            Some(raw) => raw.parse::<i64>().unwrap_or(0),
            None => 0,
        };
        let reset_in = (bucket + 1) * self.window_sec - now;

        if count >= self.max_req {
            debug!("rate limit hit for '{}': {} requests", identity, count);
            // Rejected requests are not counted
            return Ok(RateDecision {
                allowed: false,
                remaining: 0,
                reset_in,
            });
        }

        let count = count + 1;
        let ttl = reset_in.max(1) as u64;
        self.cache
            .put_with_ttl(&key, &count.to_string(), ttl)
            .await?;

        Ok(RateDecision {
            allowed: true,
            remaining: self.max_req - count,
            reset_in,
        })
    }
}

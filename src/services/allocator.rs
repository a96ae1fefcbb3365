// src/services/allocator.rs - Short-code allocation and resolution
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::ShortenerConfig;
use crate::errors::AppError;
use crate::stores::KeyValueStore;
use crate::utils::{code::generate_code, hash::content_hash};

type Result<T> = std::result::Result<T, AppError>;

/// Allocates short codes for validated long URLs and resolves them back.
///
/// Allocation order: dedup lookup (when enabled), then bounded random-code
/// retry against the store, then persistence. The store offers no
/// conditional-put, so uniqueness is best-effort read-then-write; the
/// 58^code_length keyspace keeps the collision window negligible.
pub struct LinkAllocator {
    links: Arc<dyn KeyValueStore>,
    code_length: usize,
    max_attempts: u32,
    dedup_ttl_sec: i64,
}

impl LinkAllocator {
    pub fn new(links: Arc<dyn KeyValueStore>, cfg: &ShortenerConfig) -> Self {
        Self {
            links,
            code_length: cfg.code_length,
            max_attempts: cfg.alloc_max_attempts,
            dedup_ttl_sec: cfg.dedup_ttl_sec,
        }
    }

    fn dedup_enabled(&self) -> bool {
        self.dedup_ttl_sec > 0
    }

    fn dedup_key(long_url: &str) -> String {
        format!("D:{}", content_hash(long_url))
    }

    /// Returns a short code whose link record maps to `long_url`, reusing a
    /// deduplicated code when possible.
    pub async fn shorten(&self, long_url: &str) -> Result<String> {
        if self.dedup_enabled() {
            let key = Self::dedup_key(long_url);
            if let Some(code) = self.links.get(&key).await? {
                // The dedup entry can outlive its link record; verify before
                // reusing, and fall through to a fresh allocation if stale.
                if self.links.get(&code).await?.is_some() {
                    debug!("dedup hit, reusing code '{}'", code);
                    return Ok(code);
                }
                debug!("dedup entry points at missing code '{}', reallocating", code);
            }
        }

        let mut selected = None;
        for attempt in 0..self.max_attempts {
            let candidate = generate_code(self.code_length);
            if self.links.get(&candidate).await?.is_none() {
                selected = Some(candidate);
                break;
            }
            debug!("code collision on attempt {}", attempt + 1);
        }
        let code = selected.ok_or(AppError::AllocationExhausted)?;

        self.links.put(&code, long_url).await?;

        if self.dedup_enabled() {
            // Best-effort: a failed dedup write never rolls back the link
            let key = Self::dedup_key(long_url);
            if let Err(e) = self
                .links
                .put_with_ttl(&key, &code, self.dedup_ttl_sec as u64)
                .await
            {
                warn!("dedup write for code '{}' failed: {}", code, e);
            }
        }

        info!("allocated code '{}'", code);
        Ok(code)
    }

    /// Looks up the long URL stored under `code`. Read-only.
    pub async fn resolve(&self, code: &str) -> Result<Option<String>> {
        Ok(self.links.get(code).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::CorsMode;
    use crate::stores::{MemoryStore, MockKeyValueStore};
    use crate::utils::code::CODE_ALPHABET;

    const URL: &str = "https://example.com/some/long/path";

    fn shortener_cfg(dedup_ttl_sec: i64) -> ShortenerConfig {
        ShortenerConfig {
            base_url: String::new(),
            code_length: 7,
            alloc_max_attempts: 6,
            rl_window_sec: 60,
            rl_max_req: 10,
            dedup_ttl_sec,
            cors_mode: CorsMode::Open,
            cors_origins: Vec::new(),
        }
    }

    fn is_valid_code(code: &str) -> bool {
        code.len() == 7 && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
    }

    #[actix_web::test]
    async fn allocates_and_resolves_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let allocator = LinkAllocator::new(store.clone(), &shortener_cfg(0));

        let code = allocator.shorten(URL).await.unwrap();
        assert!(is_valid_code(&code));
        assert_eq!(allocator.resolve(&code).await.unwrap().as_deref(), Some(URL));
        assert_eq!(store.put_count(), 1);
    }

    #[actix_web::test]
    async fn dedup_hit_reuses_code_without_writes() {
        let mut mock = MockKeyValueStore::new();
        let dedup_key = LinkAllocator::dedup_key(URL);
        mock.expect_get().returning(move |key| {
            if key == dedup_key {
                Ok(Some("abcdefg".to_string()))
            } else if key == "abcdefg" {
                Ok(Some(URL.to_string()))
            } else {
                Ok(None)
            }
        });
        mock.expect_put().times(0);
        mock.expect_put_with_ttl().times(0);

        let allocator = LinkAllocator::new(Arc::new(mock), &shortener_cfg(3600));
        assert_eq!(allocator.shorten(URL).await.unwrap(), "abcdefg");
    }

    #[actix_web::test]
    async fn stale_dedup_entry_heals_with_fresh_allocation() {
        let store = Arc::new(MemoryStore::new());
        // Dedup entry referencing a code with no link record
        store
            .put_with_ttl(&LinkAllocator::dedup_key(URL), "gonecode", 3600)
            .await
            .unwrap();

        let allocator = LinkAllocator::new(store.clone(), &shortener_cfg(3600));
        let code = allocator.shorten(URL).await.unwrap();

        assert_ne!(code, "gonecode");
        assert!(is_valid_code(&code));
        assert_eq!(allocator.resolve(&code).await.unwrap().as_deref(), Some(URL));
    }

    #[actix_web::test]
    async fn dedup_enabled_issues_same_code_with_single_link_write() {
        let store = Arc::new(MemoryStore::new());
        let allocator = LinkAllocator::new(store.clone(), &shortener_cfg(3600));

        let first = allocator.shorten(URL).await.unwrap();
        let second = allocator.shorten(URL).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.put_count(), 1);
    }

    #[actix_web::test]
    async fn dedup_disabled_issues_independent_codes() {
        let store = Arc::new(MemoryStore::new());
        let allocator = LinkAllocator::new(store.clone(), &shortener_cfg(0));

        let first = allocator.shorten(URL).await.unwrap();
        let second = allocator.shorten(URL).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.put_count(), 2);
        // No dedup entries written either
        assert_eq!(store.ttl_put_count(), 0);
    }

    #[actix_web::test]
    async fn exhausts_after_bounded_collision_retries() {
        let mut mock = MockKeyValueStore::new();
        // Every candidate is already taken
        mock.expect_get()
            .times(6)
            .returning(|_| Ok(Some("taken".to_string())));
        mock.expect_put().times(0);

        let allocator = LinkAllocator::new(Arc::new(mock), &shortener_cfg(0));
        let err = allocator.shorten(URL).await.unwrap_err();
        assert!(matches!(err, AppError::AllocationExhausted));
    }

    #[actix_web::test]
    async fn retries_past_collisions_then_persists() {
        let collisions = Arc::new(AtomicUsize::new(0));
        let seen = collisions.clone();

        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(move |_| {
            // First two candidates collide, third is free
            if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(Some("occupied".to_string()))
            } else {
                Ok(None)
            }
        });
        mock.expect_put()
            .times(1)
            .withf(|_, value| value == URL)
            .returning(|_, _| Ok(()));

        let allocator = LinkAllocator::new(Arc::new(mock), &shortener_cfg(0));
        let code = allocator.shorten(URL).await.unwrap();
        assert!(is_valid_code(&code));
        assert_eq!(collisions.load(Ordering::SeqCst), 3);
    }

    #[actix_web::test]
    async fn failed_dedup_write_does_not_fail_allocation() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_put().times(1).returning(|_, _| Ok(()));
        mock.expect_put_with_ttl().times(1).returning(|_, _, _| {
            Err(crate::errors::StoreError::Unavailable(
                "dedup write rejected".to_string(),
            ))
        });

        let allocator = LinkAllocator::new(Arc::new(mock), &shortener_cfg(3600));
        assert!(allocator.shorten(URL).await.is_ok());
    }

    #[actix_web::test]
    async fn resolve_misses_return_none() {
        let store = Arc::new(MemoryStore::new());
        let allocator = LinkAllocator::new(store, &shortener_cfg(0));
        assert_eq!(allocator.resolve("zzzzzzz").await.unwrap(), None);
    }
}

use std::sync::Arc;

use actix_web::web;

mod allocator;
mod rate_limiter;

pub use allocator::LinkAllocator;
pub use rate_limiter::RateLimiter;

use crate::{config::ShortenerConfig, stores::KeyValueStore};

/// Service Register
///
/// Wires the two logical stores (link records + dedup in `links`, rate
/// counters in `cache`) into the request-scoped services. The default
/// deployment passes the same Redis binding for both.
pub fn register(
    links: Arc<dyn KeyValueStore>,
    cache: Arc<dyn KeyValueStore>,
    shortener: &ShortenerConfig,
    cfg: &mut web::ServiceConfig,
) {
    let allocator = LinkAllocator::new(links, shortener);
    let rate_limiter = RateLimiter::new(cache, shortener);
    cfg.app_data(web::Data::new(allocator));
    cfg.app_data(web::Data::new(rate_limiter));
}

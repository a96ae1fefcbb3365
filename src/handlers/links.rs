use actix_web::{http::header::LOCATION, web, HttpRequest, HttpResponse, Responder};
use log::{debug, info};

use crate::{
    config::Config,
    errors::{AppError, Result},
    models::{ShortenForm, ShortenResponse},
    services::{LinkAllocator, RateLimiter},
    utils::{client_ip::client_identity, codec::decode_long_url},
    validations::validate_long_url,
};

/// Create short link route handler
///
/// Order mirrors the creation pipeline: rate limit, decode, validate,
/// allocate. Quota headers ride on both the success and the 429 response.
pub async fn shorten_handler(
    req: HttpRequest,
    form: web::Form<ShortenForm>,
    allocator: web::Data<LinkAllocator>,
    limiter: web::Data<RateLimiter>,
    config: web::Data<Config>,
) -> Result<impl Responder> {
    let identity = client_identity(&req);
    let rl = limiter.check(&identity).await?;
    if !rl.allowed {
        return Err(AppError::RateLimited {
            remaining: rl.remaining,
            reset_in: rl.reset_in,
        });
    }

    if form.long_url.trim().is_empty() {
        return Err(AppError::Validation("Missing longUrl".to_string()));
    }

    let long_url = decode_long_url(&form.long_url)?;
    if validate_long_url(&long_url).is_err() {
        return Err(AppError::Validation(
            "Decoded longUrl is not a valid http/https URL".to_string(),
        ));
    }

    let code = allocator.shorten(&long_url).await?;
    let base = short_url_base(&req, &config.shortener.base_url);

    Ok(HttpResponse::Ok()
        .insert_header(("x-rl-remaining", rl.remaining.to_string()))
        .insert_header(("x-rl-reset-in", rl.reset_in.to_string()))
        .json(ShortenResponse {
            code: 1,
            short_url: format!("{}/{}", base, code),
        }))
}

/// Redirect route handler
pub async fn redirect_handler(
    path: web::Path<String>,
    allocator: web::Data<LinkAllocator>,
) -> Result<impl Responder> {
    let code = path.into_inner();
    debug!("Redirect requested for code: {}", code);

    match allocator.resolve(&code).await? {
        Some(long_url) => {
            info!("Redirecting '{}' to '{}'", code, long_url);
            Ok(HttpResponse::Found()
                .insert_header((LOCATION, long_url))
                .finish())
        }
        None => Ok(HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body("Not Found")),
    }
}

/// CORS preflight for the creation endpoint; headers come from the
/// middleware, the route only supplies the empty 204.
pub async fn preflight_handler() -> impl Responder {
    HttpResponse::NoContent().finish()
}

/// Liveness probe
pub async fn healthz() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("ok")
}

/// Fallback for every unmatched path or method
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body("Not Found")
}

/// Short-URL base: configured value when present, else the request's own
/// scheme and host. Trailing slashes are stripped either way.
fn short_url_base(req: &HttpRequest, configured: &str) -> String {
    let base = if configured.trim().is_empty() {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    } else {
        configured.to_string()
    };
    base.trim_end_matches('/').to_string()
}

// src/middleware/cors.rs - CORS header injection
//
// Hand-rolled rather than actix-cors: list mode must let a request from a
// non-allowlisted origin through untouched (no headers, no rejection), which
// actix-cors cannot express.
use std::collections::HashSet;
use std::rc::Rc;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN, VARY,
};
use actix_web::Error;
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::config::{CorsMode, ShortenerConfig};

/// Resolved CORS behavior, fixed at startup from configuration.
#[derive(Debug, Clone)]
pub enum CorsPolicy {
    Off,
    Open,
    List(HashSet<String>),
}

impl CorsPolicy {
    pub fn from_config(cfg: &ShortenerConfig) -> Self {
        match cfg.cors_mode {
            CorsMode::Off => CorsPolicy::Off,
            CorsMode::Open => CorsPolicy::Open,
            CorsMode::List => CorsPolicy::List(cfg.cors_origins.iter().cloned().collect()),
        }
    }

    /// Injects CORS headers into a response, given the request's `Origin`
    /// and `Access-Control-Request-Headers` values.
    fn apply(&self, origin: Option<&str>, request_headers: Option<&str>, headers: &mut HeaderMap) {
        match self {
            CorsPolicy::Off => {}
            CorsPolicy::Open => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
                insert_shared_headers(request_headers, headers);
            }
            CorsPolicy::List(allowlist) => {
                let Some(origin) = origin else { return };
                if !allowlist.contains(origin) {
                    return;
                }
                if let Ok(value) = HeaderValue::from_str(origin) {
                    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
                    headers.insert(VARY, HeaderValue::from_static("Origin"));
                    insert_shared_headers(request_headers, headers);
                }
            }
        }
    }
}

fn insert_shared_headers(request_headers: Option<&str>, headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("false"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    let allow_headers = request_headers
        .and_then(|h| HeaderValue::from_str(h).ok())
        .unwrap_or_else(|| HeaderValue::from_static("Content-Type"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
}

pub struct Cors {
    policy: CorsPolicy,
}

impl Cors {
    pub fn new(policy: CorsPolicy) -> Self {
        Self { policy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CorsMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CorsMiddleware {
            service: Rc::new(service),
            policy: self.policy.clone(),
        })
    }
}

pub struct CorsMiddleware<S> {
    service: Rc<S>,
    policy: CorsPolicy,
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let policy = self.policy.clone();
        let origin = header_string(req.headers(), &ORIGIN);
        let request_headers = header_string(req.headers(), &ACCESS_CONTROL_REQUEST_HEADERS);
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            policy.apply(
                origin.as_deref(),
                request_headers.as_deref(),
                res.headers_mut(),
            );
            Ok(res)
        })
    }
}

fn header_string(headers: &HeaderMap, name: &actix_web::http::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

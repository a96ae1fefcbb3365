use actix_web::{http::Method, web};

use crate::errors::AppError;
use crate::handlers::{
    healthz, not_found, preflight_handler, redirect_handler, shorten_handler,
};

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(healthz));

    cfg.service(
        web::resource("/short")
            // Malformed or missing form bodies still answer in the
            // {"Code":0} envelope
            .app_data(web::FormConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid form-data: {}", err)).into()
            }))
            .route(web::post().to(shorten_handler))
            .route(web::method(Method::OPTIONS).to(preflight_handler)),
    );

    // Only well-shaped codes are redirect candidates; everything else falls
    // through to the default 404
    cfg.service(
        web::resource("/{code:[A-Za-z0-9_-]{3,64}}")
            .route(web::get().to(redirect_handler))
            .route(web::head().to(redirect_handler)),
    );

    cfg.default_service(web::route().to(not_found));
}

use std::io::Error as IoError;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use thiserror::Error;

pub mod config;
pub mod store;

pub use config::ConfigError;
pub use store::StoreError;

use crate::models::ErrorBody;
use crate::utils::codec::CodecError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Request-level domain errors
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("Rate limited. Please try again later.")]
    RateLimited { remaining: i64, reset_in: i64 },
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to allocate code")]
    AllocationExhausted,
    // Infrastructure/system errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<CodecError> for AppError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            CodecError::InvalidBase64 | CodecError::InvalidUtf8 => {
                AppError::Validation("Invalid base64 longUrl".to_string())
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AllocationExhausted
            | AppError::Store(_)
            | AppError::Server(_)
            | AppError::Config(_)
            | AppError::Logger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Redirect-path failures are plain text, not the JSON envelope
            AppError::NotFound(_) => HttpResponse::NotFound()
                .content_type("text/plain; charset=utf-8")
                .body("Not Found"),
            AppError::RateLimited { remaining, reset_in } => HttpResponse::TooManyRequests()
                .insert_header(("x-rl-remaining", remaining.to_string()))
                .insert_header(("x-rl-reset-in", reset_in.to_string()))
                .json(ErrorBody {
                    code: 0,
                    message: self.to_string(),
                }),
            _ => HttpResponse::build(self.status_code()).json(ErrorBody {
                code: 0,
                message: self.to_string(),
            }),
        }
    }
}

// src/models/link.rs - Wire-format payloads and rate-limit decisions
use serde::{Deserialize, Serialize};

/// Creation request body: a form-encoded field carrying the base64 of the
/// target URL (standard or URL-safe alphabet).
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenForm {
    #[serde(rename = "longUrl")]
    pub long_url: String,
}

/// Successful creation response, `{"Code":1,"ShortUrl":"..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    #[serde(rename = "Code")]
    pub code: i32,
    #[serde(rename = "ShortUrl")]
    pub short_url: String,
}

/// Failure envelope for the creation endpoint, `{"Code":0,"Message":"..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "Code")]
    pub code: i32,
    #[serde(rename = "Message")]
    pub message: String,
}

/// Outcome of a rate-limit check for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// Requests left in the current window (0 when rejected)
    pub remaining: i64,
    /// Seconds until the window boundary resets the counter
    pub reset_in: i64,
}

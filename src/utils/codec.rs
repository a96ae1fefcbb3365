use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Maximum length accepted for both the encoded form field and the decoded URL.
pub const MAX_URL_LEN: usize = 8192;

#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// Encoded input or decoded URL exceeds the size cap
    #[error("{0}")]
    TooLarge(String),

    /// Input is not valid base64
    #[error("invalid base64 payload")]
    InvalidBase64,

    /// Decoded bytes are not valid UTF-8 text
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Decodes a base64-encoded long URL into UTF-8 text.
///
/// Standard and URL-safe alphabets are interchangeable: `-` and `_` are
/// normalized to `+` and `/`, and missing `=` padding is restored before
/// decoding. Size caps are enforced on both sides of the decode.
pub fn decode_long_url(b64: &str) -> Result<String, CodecError> {
    let trimmed = b64.trim();
    if trimmed.len() > MAX_URL_LEN {
        return Err(CodecError::TooLarge("longUrl too large".to_string()));
    }

    let mut normalized: String = trimmed
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    let bytes = STANDARD
        .decode(normalized.as_bytes())
        .map_err(|_| CodecError::InvalidBase64)?;
    let url = String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;

    if url.len() > MAX_URL_LEN {
        return Err(CodecError::TooLarge("Decoded URL too large".to_string()));
    }

    Ok(url)
}

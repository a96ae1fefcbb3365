use std::fmt::Write;

use sha1::{Digest, Sha1};

/// Returns the lowercase hex SHA-1 digest of the input.
///
/// Used as the content-addressed dedup key for a decoded long URL; the exact
/// input string is hashed, so semantically equal but textually different
/// URLs hash apart.
pub fn content_hash(input: &str) -> String {
    let digest = Sha1::digest(input.as_bytes());

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

use rand::{rng, Rng};

/// 58-character alphabet with visually confusable characters removed
/// (no `0`/`O`, no `1`/`l`/`I`).
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

/// Generates a random short code of the given length.
///
/// Each output character is drawn by mapping a random byte modulo the
/// alphabet size. ThreadRng is a CSPRNG, so codes are not guessable, but
/// uniqueness is the caller's responsibility.
pub fn generate_code(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    rng().fill(&mut bytes[..]);

    bytes
        .iter()
        .map(|b| CODE_ALPHABET[*b as usize % CODE_ALPHABET.len()] as char)
        .collect()
}

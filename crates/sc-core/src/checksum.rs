//! SHA-256 digests for change detection.
//!
//! [`calc_digest`] is the idempotence key for ad-hoc SQL files: every input
//! is fed to one accumulator in order, and the result is base64 encoded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Compute the base64 SHA-256 digest of a sequence of inputs.
///
/// Inputs are hashed through sequential updates of a single hasher, so the
/// same sequence always yields the same digest and reordering the inputs
/// changes it. No framing is added between parts: `["ab", "c"]` and
/// `["a", "bc"]` digest identically.
pub fn calc_digest<I, T>(parts: I) -> String
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref());
    }
    STANDARD.encode(hasher.finalize())
}

/// Digest a single SQL text.
pub fn calc_sql_digest(sql: &str) -> String {
    calc_digest([sql])
}

/// Compute SHA256 checksum of a string as lowercase hex
pub fn compute_checksum(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
#[path = "checksum_test.rs"]
mod tests;

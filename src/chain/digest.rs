//! Link Digests
//!
//! SHA-256 over the raw bytes of a record, rendered as lowercase hex.

use sha2::{Digest, Sha256};

/// Conventional digest field of the first record in a chain. The first
/// record is never checked, so any 64-character value works.
pub const GENESIS_DIGEST: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Calculate the lowercase hex SHA-256 digest of `bytes`
pub fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Exact comparison of a computed digest against a record's digest field.
/// Case-sensitive: an uppercase field never matches.
pub fn digest_matches(expected_hex: &str, field: &[u8]) -> bool {
    expected_hex.as_bytes() == field
}

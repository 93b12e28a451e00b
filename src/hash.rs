use sha2::{Digest, Sha256};

use crate::types::HexDigest;

/// SHA-256 hex digest of `text`'s UTF-8 bytes.
///
/// This is the deduplication key: two records with equal digests are
/// considered duplicates regardless of their source paths.
pub fn content_digest(text: &str) -> HexDigest {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

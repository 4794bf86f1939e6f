//! Content fingerprints for change detection

use sha2::{Digest, Sha256};

/// Hex digits kept from the SHA-256 digest.
pub const CONTENT_HASH_LEN: usize = 12;

/// Stable fingerprint of file text.
///
/// Only used to notice that a journey or scenario changed since the manifest recorded it,
/// so a short prefix of the digest is enough.
pub fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    format!("{:x}", digest)[..CONTENT_HASH_LEN].to_string()
}

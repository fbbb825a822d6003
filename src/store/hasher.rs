use sha2::{Digest, Sha256};

use crate::locator::KEY_LEN;

/// Turns logical object keys into fixed-width trie keys.
pub trait KeyHasher: Send + Sync {
    fn digest(&self, key: &[u8]) -> [u8; KEY_LEN];
}

/// SHA-256 of the raw key bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl KeyHasher for Sha256Hasher {
    fn digest(&self, key: &[u8]) -> [u8; KEY_LEN] {
        let mut out = [0u8; KEY_LEN];
        out.copy_from_slice(&Sha256::digest(key));
        out
    }
}

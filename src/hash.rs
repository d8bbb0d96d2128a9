//! Double-SHA-256 hashing for addresses, transactions and blocks

use sha2::{Digest, Sha256};

/// Size of a digest in bytes.
pub const HASH_SIZE: usize = 32;

/// A 32-byte double-SHA-256 digest.
pub type Hash = [u8; HASH_SIZE];

/// Streaming double-SHA-256: `SHA256(SHA256(accumulated input))`.
///
/// All consensus-relevant identities (account addresses, transaction and
/// block hashes) are produced through this hasher, so its definition is
/// part of the wire protocol.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    inner: Sha256,
}

impl Hasher {
    pub fn new() -> Self {
        Hasher::default()
    }

    /// Feed raw bytes into the hasher.
    pub fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Feed a u64 in its little-endian encoding.
    pub fn write_u64(&mut self, value: u64) {
        self.inner.update(value.to_le_bytes());
    }

    /// Finish the accumulated input and produce the digest.
    pub fn sum(self) -> Hash {
        Sha256::digest(self.inner.finalize()).into()
    }
}

/// One-shot double SHA-256 of a byte slice.
#[inline]
pub fn double_sha256(data: &[u8]) -> Hash {
    Sha256::digest(Sha256::digest(data)).into()
}

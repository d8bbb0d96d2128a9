//! Account key material and signatures for tallychain

use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::{EncodedPoint, FieldBytes};
use rand::rngs::OsRng;

use crate::error::LedgerError;
use crate::hash::{Hash, Hasher};

/// Size of an account address in bytes.
pub const ADDRESS_SIZE: usize = 32;
/// Size of the public key material (X || Y, each 32 bytes big-endian).
pub const KEY_PAIR_SIZE: usize = 64;
/// Size of the private key material (X || Y || D).
pub const PRIVATE_KEY_SIZE: usize = 96;
/// Size of a signature (r || s, each 32 bytes big-endian).
pub const SIGNATURE_SIZE: usize = 64;

/// A derived account address: the double-SHA-256 of the public key bytes.
pub type Address = [u8; ADDRESS_SIZE];

/// Convert an address to a hex string for display.
pub fn address_to_hex(addr: &Address) -> String {
    hex::encode(addr)
}

/// Convert a hex string to an address.
pub fn address_from_hex(hex_str: &str) -> Result<Address, LedgerError> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| LedgerError::CryptoError(format!("Invalid hex address: {}", e)))?;
    if bytes.len() != ADDRESS_SIZE {
        return Err(LedgerError::CryptoError(format!(
            "Address must be {} bytes, got {}",
            ADDRESS_SIZE,
            bytes.len()
        )));
    }
    bytes
        .try_into()
        .map_err(|_| LedgerError::CryptoError("Failed to convert bytes into address".to_string()))
}

fn hash_key_bytes(key_bytes: &[u8; KEY_PAIR_SIZE]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.write(key_bytes);
    hasher.sum()
}

/// A public account. Public accounts can only verify signatures.
#[derive(Debug, Clone)]
pub struct Public {
    key: VerifyingKey,
}

impl Public {
    /// Reconstruct a public account from its 64-byte X || Y encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        if bytes.len() != KEY_PAIR_SIZE {
            return Err(LedgerError::CryptoError(format!(
                "Public key must be {} bytes, got {}",
                KEY_PAIR_SIZE,
                bytes.len()
            )));
        }
        let point = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(&bytes[..32]),
            FieldBytes::from_slice(&bytes[32..]),
            false,
        );
        let key = VerifyingKey::from_encoded_point(&point)
            .map_err(|e| LedgerError::CryptoError(format!("Invalid public key: {}", e)))?;
        Ok(Public { key })
    }

    /// The 64-byte X || Y encoding. Coordinates shorter than 32 bytes are
    /// left-padded so the encoding is the same width on every platform.
    pub fn public_key_bytes(&self) -> [u8; KEY_PAIR_SIZE] {
        // Uncompressed SEC1 encoding is 0x04 || X || Y with fixed-width
        // field elements.
        let point = self.key.to_encoded_point(false);
        let mut out = [0u8; KEY_PAIR_SIZE];
        out.copy_from_slice(&point.as_bytes()[1..1 + KEY_PAIR_SIZE]);
        out
    }

    /// The verifiable account address.
    pub fn address(&self) -> Address {
        hash_key_bytes(&self.public_key_bytes())
    }

    /// Check the validity of a signature over the given hash. Any parse or
    /// verification failure yields `false`, never a panic.
    pub fn verify(&self, hash: &Hash, signature: &[u8]) -> bool {
        let sig = match Signature::from_slice(signature) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        self.key.verify_prehash(hash, &sig).is_ok()
    }
}

impl PartialEq for Public {
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for Public {}

/// A private account. A private account can verify and sign.
#[derive(Debug, Clone)]
pub struct Private {
    key: SigningKey,
}

impl Private {
    /// Generate a fresh key pair from the OS random number generator.
    pub fn generate() -> Self {
        Private {
            key: SigningKey::random(&mut OsRng),
        }
    }

    /// Restore a private account from its 96-byte X || Y || D encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(LedgerError::CryptoError(format!(
                "Private key must be {} bytes, got {}",
                PRIVATE_KEY_SIZE,
                bytes.len()
            )));
        }
        let key = SigningKey::from_slice(&bytes[KEY_PAIR_SIZE..])
            .map_err(|e| LedgerError::CryptoError(format!("Invalid private scalar: {}", e)))?;
        let restored = Private { key };
        if restored.public_key_bytes().as_slice() != &bytes[..KEY_PAIR_SIZE] {
            return Err(LedgerError::CryptoError(
                "Public key does not match private scalar".to_string(),
            ));
        }
        Ok(restored)
    }

    /// The 96-byte X || Y || D encoding, with every component left-padded
    /// to 32 bytes.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_SIZE] {
        let mut out = [0u8; PRIVATE_KEY_SIZE];
        out[..KEY_PAIR_SIZE].copy_from_slice(&self.public_key_bytes());
        out[KEY_PAIR_SIZE..].copy_from_slice(&self.key.to_bytes());
        out
    }

    /// The public half of the account.
    pub fn public(&self) -> Public {
        Public {
            key: *self.key.verifying_key(),
        }
    }

    pub fn public_key_bytes(&self) -> [u8; KEY_PAIR_SIZE] {
        self.public().public_key_bytes()
    }

    pub fn address(&self) -> Address {
        self.public().address()
    }

    /// Sign the given hash, producing the fixed-width r || s encoding.
    pub fn sign(&self, hash: &Hash) -> Result<[u8; SIGNATURE_SIZE], LedgerError> {
        let sig: Signature = self
            .key
            .sign_prehash(hash)
            .map_err(|e| LedgerError::CryptoError(format!("Failed to sign: {}", e)))?;
        let mut out = [0u8; SIGNATURE_SIZE];
        out.copy_from_slice(&sig.to_bytes());
        Ok(out)
    }

    /// Check a signature against this account's own public key.
    pub fn verify(&self, hash: &Hash, signature: &[u8]) -> bool {
        self.public().verify(hash, signature)
    }
}

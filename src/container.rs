//! Passphrase-sealed containers for private account keys
//!
//! A container is a small JSON document holding the hex public key and the
//! private key bytes sealed with AES-256-GCM. The cipher key is the
//! double-SHA-256 of the passphrase; the random nonce is prepended to the
//! ciphertext.

use std::fs;
use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::account::Private;
use crate::error::{LedgerError, Result};
use crate::hash::double_sha256;

const NONCE_SIZE: usize = 12;

/// Serializable wrapper for an encrypted private key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    #[serde(rename = "public")]
    pub public_key: String,
    #[serde(rename = "private")]
    pub encrypted_private_key: String,
}

impl Container {
    /// Seal a private account under the given passphrase.
    pub fn new(passphrase: &[u8], account: &Private) -> Result<Self> {
        let key = double_sha256(passphrase);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), account.to_bytes().as_slice())
            .map_err(|_| LedgerError::WalletError("Could not seal container".to_string()))?;

        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);

        Ok(Container {
            public_key: hex::encode(account.public_key_bytes()),
            encrypted_private_key: hex::encode(sealed),
        })
    }

    /// Decrypt the contained private key. A wrong passphrase fails the GCM
    /// tag check and surfaces as a `WalletError`.
    pub fn unlock(&self, passphrase: &[u8]) -> Result<Private> {
        let key = double_sha256(passphrase);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));

        let sealed = hex::decode(&self.encrypted_private_key).map_err(|e| {
            LedgerError::WalletError(format!("Invalid encrypted key format: {}", e))
        })?;
        if sealed.len() < NONCE_SIZE {
            return Err(LedgerError::WalletError(
                "Encrypted private key too short".to_string(),
            ));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);

        let bytes = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| LedgerError::WalletError("Could not unseal container".to_string()))?;
        Private::from_bytes(&bytes)
    }

    /// Decode a container from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| LedgerError::WalletError(format!("Could not read container: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::WalletError(format!("Could not decode container: {}", e)))
    }

    /// Encode the container to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::WalletError(format!("Could not encode container: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| LedgerError::WalletError(format!("Could not write container: {}", e)))?;
        Ok(())
    }
}

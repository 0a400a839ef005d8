//! AES-256-GCM string cipher for client payloads.
//!
//! Uses AES-256-GCM with:
//! - 256-bit key (SHA-256 of the configured secret)
//! - 96-bit (12 byte) random nonce per message
//! - 128-bit authentication tag
//!
//! Wire format: `base64(nonce || ciphertext || auth_tag)`

use crate::crypto::{CryptoError, Result};
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// The `Crypt`/`Decrypt` pair both ends of the sync protocol agree on.
#[derive(Clone)]
pub struct TransportCipher {
    key: [u8; 32],
}

impl TransportCipher {
    /// Derive the cipher key from a shared secret.
    pub fn from_secret(secret: &str) -> Self {
        let key: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        Self { key }
    }

    /// Encrypt a string into its base64 wire form.
    pub fn crypt(&self, plaintext: &str) -> Result<String> {
        if plaintext.is_empty() {
            return Err(CryptoError::EncryptionFailed(
                "Cannot encrypt empty data".to_string(),
            ));
        }

        let cipher = Aes256Gcm::new((&self.key).into());
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        // aes-gcm appends the tag, so this is ciphertext || tag
        let ciphertext_with_tag = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| CryptoError::EncryptionFailed(format!("{}", e)))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext_with_tag.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext_with_tag);

        Ok(STANDARD.encode(blob))
    }

    /// Decrypt a base64 wire string back to text.
    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let blob = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;

        // Minimum: nonce + 1 byte of ciphertext + tag
        if blob.len() < NONCE_LEN + 1 + TAG_LEN {
            return Err(CryptoError::DecryptionFailed("Blob too short".to_string()));
        }

        let nonce_bytes: [u8; NONCE_LEN] = blob[..NONCE_LEN]
            .try_into()
            .map_err(|_| CryptoError::DecryptionFailed("Invalid nonce length".to_string()))?;

        let cipher = Aes256Gcm::new((&self.key).into());
        let plaintext = cipher
            .decrypt(&Nonce::from(nonce_bytes), &blob[NONCE_LEN..])
            .map_err(|_| CryptoError::AuthenticationFailed)?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::DecryptionFailed("Invalid UTF-8".to_string()))
    }
}

impl Drop for TransportCipher {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

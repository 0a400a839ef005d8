//! Symmetric transport encryption shared with the mobile client.
//!
//! Credential payloads and session tokens travel as base64 strings of
//! `nonce(12) || ciphertext || auth_tag(16)`, sealed with AES-256-GCM under
//! a key derived from the server's shared secret.

pub mod cipher;

pub use cipher::TransportCipher;

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Authentication failed - data may have been tampered with")]
    AuthenticationFailed,
}

/// Result type for crypto operations
pub type Result<T> = std::result::Result<T, CryptoError>;

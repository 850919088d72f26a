//! Error types for key handling and secret encryption.

use thiserror::Error;

/// Errors that can occur while encoding keys or sealing secrets.
#[derive(Error, Debug)]
pub enum NostrError {
    /// Bech32 text was malformed, had a bad checksum, or the wrong prefix.
    #[error("Invalid key format: {0}")]
    Format(String),

    /// Secret key bytes do not form a valid secp256k1 scalar.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Encryption operation failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong password, tampered or truncated ciphertext).
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Password-based key derivation failed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Hex encoding/decoding error.
    #[error("Hex encoding error: {0}")]
    HexError(String),
}

/// Result type for key and cipher operations.
pub type Result<T> = std::result::Result<T, NostrError>;

impl From<hex::FromHexError> for NostrError {
    fn from(e: hex::FromHexError) -> Self {
        Self::HexError(e.to_string())
    }
}

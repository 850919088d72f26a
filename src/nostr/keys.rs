//! NIP-19 key codec and keypair helpers.
//!
//! Keys are persisted and passed around as lowercase hex. The human-facing
//! forms are bech32 strings whose human-readable prefix identifies the key
//! kind (`nsec` for secret keys, `npub` for public keys). The 5-bit regrouping
//! and checksum are handled by the `nostr` crate's NIP-19 implementation; this
//! module adds the prefix policy and the error reporting the vault needs.

use std::fmt;

use nostr::prelude::{FromBech32, Keys, PublicKey, SecretKey, ToBech32};
use zeroize::Zeroizing;

use crate::nostr::error::{NostrError, Result};

/// Human-readable prefix of a NIP-19 key encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bech32Prefix {
    /// Secret key (`nsec1...`).
    Nsec,
    /// Public key (`npub1...`).
    Npub,
}

impl Bech32Prefix {
    /// Returns the prefix as it appears in encoded text.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nsec => "nsec",
            Self::Npub => "npub",
        }
    }
}

impl fmt::Display for Bech32Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A freshly generated keypair in hex form.
pub struct GeneratedKeypair {
    /// Secret key hex (zeroized on drop).
    pub secret_hex: Zeroizing<String>,
    /// X-only public key hex.
    pub public_hex: String,
}

impl fmt::Debug for GeneratedKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the secret key
        f.debug_struct("GeneratedKeypair")
            .field("public_hex", &self.public_hex)
            .finish_non_exhaustive()
    }
}

/// Decodes an `nsec` string into secret key hex.
///
/// # Errors
///
/// Returns [`NostrError::Format`] if the text is not bech32, has a bad
/// checksum, or carries a prefix other than `nsec`.
///
/// # Example
///
/// ```
/// use nostr_vault_core::nostr::keys::{decode_bech32_secret_key, encode_bech32, Bech32Prefix};
///
/// let hex = "0000000000000000000000000000000000000000000000000000000000000001";
/// let nsec = encode_bech32(Bech32Prefix::Nsec, hex).unwrap();
/// assert_eq!(decode_bech32_secret_key(&nsec).unwrap().as_str(), hex);
/// ```
pub fn decode_bech32_secret_key(text: &str) -> Result<Zeroizing<String>> {
    decode_bech32(Bech32Prefix::Nsec, text).map(Zeroizing::new)
}

/// Decodes a bech32 key, enforcing the expected prefix, into hex.
///
/// Input is trimmed and matched case-insensitively.
///
/// # Errors
///
/// Returns [`NostrError::Format`] with the specific reason on failure.
pub fn decode_bech32(prefix: Bech32Prefix, text: &str) -> Result<String> {
    let text = Zeroizing::new(text.trim().to_ascii_lowercase());
    let (hrp, _) = text
        .rsplit_once('1')
        .ok_or_else(|| NostrError::Format("missing bech32 separator".to_string()))?;

    if hrp != prefix.as_str() {
        return Err(NostrError::Format(format!(
            "invalid prefix: expected {prefix}, got {hrp}"
        )));
    }

    match prefix {
        Bech32Prefix::Nsec => SecretKey::from_bech32(text.as_str())
            .map(|sk| hex::encode(sk.secret_bytes()))
            .map_err(|e| NostrError::Format(format!("invalid nsec: {e}"))),
        Bech32Prefix::Npub => PublicKey::from_bech32(text.as_str())
            .map(|pk| pk.to_hex())
            .map_err(|e| NostrError::Format(format!("invalid npub: {e}"))),
    }
}

/// Encodes a hex key under the given prefix.
///
/// # Errors
///
/// Returns [`NostrError::Format`] if the hex is malformed or is not a valid
/// key of the kind the prefix names.
pub fn encode_bech32(prefix: Bech32Prefix, hex_input: &str) -> Result<String> {
    let hex_input = hex_input.trim();
    match prefix {
        Bech32Prefix::Nsec => {
            let secret = SecretKey::from_hex(hex_input)
                .map_err(|e| NostrError::Format(format!("invalid secret key hex: {e}")))?;
            secret
                .to_bech32()
                .map_err(|e| NostrError::Format(e.to_string()))
        }
        Bech32Prefix::Npub => {
            let public = PublicKey::from_hex(hex_input)
                .map_err(|e| NostrError::Format(format!("invalid public key hex: {e}")))?;
            public
                .to_bech32()
                .map_err(|e| NostrError::Format(e.to_string()))
        }
    }
}

/// Derives the x-only public key hex for a secret key hex.
///
/// # Errors
///
/// Returns [`NostrError::InvalidKey`] if the secret is not 32 bytes of hex or
/// is outside the curve order.
pub fn derive_public_key(secret_hex: &str) -> Result<String> {
    let secret = SecretKey::from_hex(secret_hex.trim())
        .map_err(|e| NostrError::InvalidKey(e.to_string()))?;
    Ok(Keys::new(secret).public_key().to_hex())
}

/// Generates a new random keypair.
#[must_use]
pub fn generate_keypair() -> GeneratedKeypair {
    let keys = Keys::generate();
    GeneratedKeypair {
        secret_hex: Zeroizing::new(hex::encode(keys.secret_key().secret_bytes())),
        public_hex: keys.public_key().to_hex(),
    }
}

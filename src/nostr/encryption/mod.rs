//! Password-based sealing of secret keys at rest.
//!
//! A 32-byte key is derived from the password and a per-secret random salt
//! with Argon2id, then used with AES-256-GCM. The random nonce is prepended
//! to the ciphertext and the whole blob is base64 encoded:
//!
//! ```text
//! base64( nonce[12] || ciphertext || tag[16] )
//! ```
//!
//! # Security
//!
//! - Argon2id parameters: 1 pass, 64 MiB, 4 lanes, 32-byte output
//! - Fresh 16-byte salt per [`encrypt_secret`] call
//! - Fresh 12-byte nonce per encryption
//! - Decryption fails closed; no partial plaintext is ever returned
//! - Derived keys and plaintext buffers are zeroized on drop

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::nostr::error::{NostrError, Result};

/// Argon2id memory cost in KiB (64 MiB).
pub const ARGON2_MEMORY_KIB: u32 = 64 * 1024;

/// Argon2id iteration count.
pub const ARGON2_ITERATIONS: u32 = 1;

/// Argon2id parallelism (lanes).
pub const ARGON2_PARALLELISM: u32 = 4;

/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;

/// Salt length for key derivation.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length.
pub const NONCE_LEN: usize = 12;

/// Output of [`encrypt_secret`]: the sealed blob and the salt needed to
/// re-derive its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    /// Base64 of `nonce || ciphertext || tag`.
    pub ciphertext_b64: String,
    /// Random salt used for key derivation.
    pub salt: [u8; SALT_LEN],
}

impl SealedSecret {
    /// Returns the salt as lowercase hex, the form persisted in the config.
    #[must_use]
    pub fn salt_hex(&self) -> String {
        hex::encode(self.salt)
    }
}

/// Derives the symmetric key for `(password, salt)` with Argon2id.
fn derive_key(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LEN),
    )
    .map_err(|e| NostrError::KeyDerivation(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key[..])
        .map_err(|e| NostrError::KeyDerivation(e.to_string()))?;

    Ok(key)
}

/// Encrypts `plaintext` under `password` with a freshly generated salt.
///
/// # Errors
///
/// Returns an error if key derivation or encryption fails.
///
/// # Example
///
/// ```no_run
/// use nostr_vault_core::nostr::encryption::{decrypt_secret, encrypt_secret};
///
/// let sealed = encrypt_secret(b"secret", "hunter2").unwrap();
/// let opened = decrypt_secret(&sealed.ciphertext_b64, "hunter2", &sealed.salt).unwrap();
/// assert_eq!(opened.as_slice(), b"secret");
/// ```
pub fn encrypt_secret(plaintext: &[u8], password: &str) -> Result<SealedSecret> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let ciphertext_b64 = encrypt_with_salt(plaintext, password, &salt)?;
    Ok(SealedSecret {
        ciphertext_b64,
        salt,
    })
}

/// Encrypts `plaintext` under `password` using the caller's salt.
///
/// Reusing a salt across different secrets is a caller error that is not
/// checked here.
///
/// # Errors
///
/// Returns an error if key derivation or encryption fails.
pub fn encrypt_with_salt(plaintext: &[u8], password: &str, salt: &[u8]) -> Result<String> {
    let key = derive_key(password, salt)?;
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| NostrError::Encryption(format!("failed to create cipher: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| NostrError::Encryption(e.to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);

    Ok(base64::engine::general_purpose::STANDARD.encode(sealed))
}

/// Decrypts a blob produced by [`encrypt_secret`].
///
/// # Errors
///
/// Returns [`NostrError::Decryption`] on malformed base64, input shorter than
/// the nonce, a wrong password, or any tampering with the blob. A salt the KDF
/// cannot use is reported as a decryption failure as well.
pub fn decrypt_secret(
    ciphertext_b64: &str,
    password: &str,
    salt: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let sealed = base64::engine::general_purpose::STANDARD
        .decode(ciphertext_b64.trim())
        .map_err(|e| NostrError::Decryption(format!("Base64 decode error: {e}")))?;

    if sealed.len() < NONCE_LEN {
        return Err(NostrError::Decryption("ciphertext too short".to_string()));
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);

    let key = derive_key(password, salt)
        .map_err(|e| NostrError::Decryption(e.to_string()))?;
    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| NostrError::Decryption(format!("failed to create cipher: {e}")))?;

    // The AEAD error is opaque; do not distinguish wrong password from tampering
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| NostrError::Decryption("wrong password or corrupted data".to_string()))?;

    Ok(Zeroizing::new(plaintext))
}

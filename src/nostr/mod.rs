//! Nostr key material: NIP-19 encoding and password-sealed secrets.
//!
//! # Architecture
//!
//! ```text
//! nsec (user input) → keys::decode_bech32_secret_key → secret hex
//!                                      ↓
//!                       keys::derive_public_key → public hex (cached)
//!                                      ↓
//!            encryption::encrypt_secret(secret, password) → base64 blob + salt
//! ```
//!
//! Nothing in this module touches the filesystem.

mod error;

pub mod encryption;
pub mod keys;

pub use encryption::{decrypt_secret, encrypt_secret, SealedSecret};
pub use error::{NostrError, Result};
pub use keys::{
    decode_bech32, decode_bech32_secret_key, derive_public_key, encode_bech32, generate_keypair,
    Bech32Prefix, GeneratedKeypair,
};

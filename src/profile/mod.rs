//! Multi-profile key vault.
//!
//! Each profile is a named Nostr identity with its own sealed secret key,
//! cached public key and relay list. The vault resolves which profile a
//! command targets, creates or re-keys profiles, and unseals secrets on
//! demand.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   --profile / current_profile   ┌─────────────────┐
//! │ ConfigStore  │ ──────── Config ──────────────▶ │  ProfileVault   │
//! └──────────────┘ ◀──────── save ──────────────── └────────┬────────┘
//!                                                            │ password
//!                                                   ┌────────▼────────┐
//!                                                   │ PasswordPrompt  │
//!                                                   └─────────────────┘
//! ```
//!
//! Secrets are only held in [`zeroize::Zeroizing`] buffers once unsealed.

mod error;
mod prompt;
mod vault;

pub use error::{ProfileError, Result};
pub use prompt::{PasswordPrompt, CONFIRM_PROMPT, DECRYPT_PROMPT, ENCRYPT_PROMPT};
pub use vault::{ProfileVault, PublicIdentity};

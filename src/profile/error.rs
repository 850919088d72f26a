//! Error types for profile resolution and key management.

use thiserror::Error;

use crate::nostr::NostrError;

/// Error type for profile vault operations.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The config holds no profiles at all.
    #[error("No profiles configured; run setup first")]
    NotConfigured,

    /// The requested alias does not exist.
    #[error("Profile '{alias}' not found; available profiles: {}", .available.join(", "))]
    NotFound {
        /// The alias that was requested.
        alias: String,
        /// Every configured alias, sorted.
        available: Vec<String>,
    },

    /// A blank alias was given where one is required.
    #[error("Profile alias cannot be empty")]
    EmptyAlias,

    /// Tried to add an alias that is already configured.
    #[error("Profile '{0}' already exists")]
    AlreadyExists(String),

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The profile has no cached public key.
    #[error("No public key found; run setup first")]
    MissingPublicKey,

    /// The profile lacks part of its key material.
    #[error("Profile has no stored private key; run setup first")]
    MissingKeyMaterial,

    /// The password prompt collaborator failed.
    #[error("Reading password failed: {0}")]
    Prompt(String),

    /// Key codec or cipher failure.
    #[error(transparent)]
    Nostr(#[from] NostrError),
}

/// Result type alias for profile operations.
pub type Result<T> = std::result::Result<T, ProfileError>;

//! Named profiles: resolution, creation and unlocking.
//!
//! [`ProfileVault`] operates on an in-memory [`Config`] and never touches the
//! disk. Callers persist with [`ConfigStore::save`](crate::config::ConfigStore::save)
//! after mutating, which lets several changes (for example a relay sync and a
//! re-key) land in one write.
//!
//! # Alias resolution
//!
//! 1. An explicit, non-blank override (must exist)
//! 2. `current_profile`
//! 3. The lexicographically first alias, which also becomes `current_profile`

use std::fmt;

use subtle::ConstantTimeEq;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::error::{ProfileError, Result};
use super::prompt::{PasswordPrompt, CONFIRM_PROMPT, DECRYPT_PROMPT, ENCRYPT_PROMPT};
use crate::config::{default_relays, Config, Profile, DEFAULT_ALIAS};
use crate::nostr::{
    decode_bech32_secret_key, decrypt_secret, derive_public_key, encode_bech32, encrypt_secret,
    Bech32Prefix, NostrError,
};

/// A profile's public key in both display forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicIdentity {
    /// Hex x-only public key.
    pub hex: String,
    /// NIP-19 `npub` encoding.
    pub npub: String,
}

impl fmt::Display for PublicIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.npub)
    }
}

/// Profile operations over a [`Config`].
pub struct ProfileVault;

impl ProfileVault {
    /// Returns all aliases, sorted.
    #[must_use]
    pub fn list_aliases(config: &Config) -> Vec<String> {
        config.aliases()
    }

    /// Resolves which alias a command should act on.
    ///
    /// May update `config.current_profile` when it is empty or stale.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::NotConfigured`] if there are no profiles
    /// - [`ProfileError::NotFound`] if a non-blank override is unknown
    pub fn resolve_alias(config: &mut Config, alias_override: Option<&str>) -> Result<String> {
        if config.profiles.is_empty() {
            return Err(ProfileError::NotConfigured);
        }

        if let Some(target) = alias_override.map(str::trim).filter(|a| !a.is_empty()) {
            if config.profiles.contains_key(target) {
                return Ok(target.to_string());
            }
            return Err(not_found(config, target));
        }

        if config.repair_current_profile() {
            debug!(alias = %config.current_profile, "Falling back to first profile alias");
        }
        Ok(config.current_profile.clone())
    }

    /// Returns the active profile and its alias.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_alias`].
    pub fn active_profile<'a>(
        config: &'a mut Config,
        alias_override: Option<&str>,
    ) -> Result<(&'a Profile, String)> {
        let (profile, alias) = Self::active_profile_mut(config, alias_override)?;
        Ok((&*profile, alias))
    }

    /// Mutable form of [`Self::active_profile`], used for relay edits.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_alias`].
    pub fn active_profile_mut<'a>(
        config: &'a mut Config,
        alias_override: Option<&str>,
    ) -> Result<(&'a mut Profile, String)> {
        let alias = Self::resolve_alias(config, alias_override)?;
        let profile = config
            .profiles
            .get_mut(&alias)
            .ok_or(ProfileError::NotConfigured)?;
        Ok((profile, alias))
    }

    /// Makes `alias` the default profile.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::EmptyAlias`] for a blank alias
    /// - [`ProfileError::NotFound`] if the alias is unknown
    pub fn set_current_profile(config: &mut Config, alias: &str) -> Result<()> {
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(ProfileError::EmptyAlias);
        }
        if !config.profiles.contains_key(alias) {
            return Err(not_found(config, alias));
        }
        config.current_profile = alias.to_string();
        Ok(())
    }

    /// Seals `secret_hex` under `password` and stores it as `alias`.
    ///
    /// A blank alias means `"default"`. An existing non-empty relay list for
    /// the alias is kept; otherwise the built-in defaults are assigned. The
    /// profile becomes current. On error the config is unchanged.
    ///
    /// # Errors
    ///
    /// - [`NostrError::InvalidKey`] if the secret key is malformed
    /// - [`NostrError::Encryption`] / [`NostrError::KeyDerivation`] on cipher failure
    pub fn create_or_update_profile<'a>(
        config: &'a mut Config,
        alias: &str,
        secret_hex: &str,
        password: &str,
    ) -> Result<&'a Profile> {
        let alias = alias_or_default(alias);
        let secret_hex = Zeroizing::new(secret_hex.trim().to_ascii_lowercase());

        let public_key = derive_public_key(&secret_hex)?;
        let sealed = encrypt_secret(secret_hex.as_bytes(), password)?;

        let slot = config.profiles.entry(alias.clone()).or_default();
        let relays = if slot.relays.is_empty() {
            default_relays()
        } else {
            std::mem::take(&mut slot.relays)
        };
        *slot = Profile {
            relays,
            encrypted_private_key: sealed.ciphertext_b64.clone(),
            salt: sealed.salt_hex(),
            public_key,
        };
        config.current_profile.clone_from(&alias);

        info!(alias = %alias, public_key = %slot.public_key, "Stored profile key");
        Ok(slot)
    }

    /// Like [`Self::create_or_update_profile`], but refuses an existing alias.
    ///
    /// # Errors
    ///
    /// [`ProfileError::AlreadyExists`] if the alias is taken, otherwise as
    /// [`Self::create_or_update_profile`].
    pub fn add_profile<'a>(
        config: &'a mut Config,
        alias: &str,
        secret_hex: &str,
        password: &str,
    ) -> Result<&'a Profile> {
        let alias = alias.trim();
        if alias.is_empty() {
            return Err(ProfileError::EmptyAlias);
        }
        if config.profiles.contains_key(alias) {
            return Err(ProfileError::AlreadyExists(alias.to_string()));
        }
        Self::create_or_update_profile(config, alias, secret_hex, password)
    }

    /// Decodes an `nsec` and stores it as `alias`.
    ///
    /// # Errors
    ///
    /// [`NostrError::Format`] for a bad `nsec`, otherwise as
    /// [`Self::create_or_update_profile`].
    pub fn import_nsec<'a>(
        config: &'a mut Config,
        alias: &str,
        nsec: &str,
        password: &str,
    ) -> Result<&'a Profile> {
        let secret_hex = decode_bech32_secret_key(nsec)?;
        Self::create_or_update_profile(config, alias, &secret_hex, password)
    }

    /// Interactive setup: asks for a password twice, then stores the key.
    ///
    /// The public key is validated before any prompt is shown.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::PasswordMismatch`] if the confirmation differs
    /// - [`ProfileError::Prompt`] if the prompt fails
    /// - otherwise as [`Self::create_or_update_profile`]
    pub fn setup_profile<'a>(
        config: &'a mut Config,
        alias: &str,
        secret_hex: &str,
        prompt: &dyn PasswordPrompt,
    ) -> Result<&'a Profile> {
        derive_public_key(secret_hex)?;

        let password = Zeroizing::new(prompt.prompt(ENCRYPT_PROMPT)?);
        let confirm = Zeroizing::new(prompt.prompt(CONFIRM_PROMPT)?);
        if !bool::from(password.as_bytes().ct_eq(confirm.as_bytes())) {
            return Err(ProfileError::PasswordMismatch);
        }

        Self::create_or_update_profile(config, alias, secret_hex, &password)
    }

    /// Unseals the profile's secret key hex.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::MissingKeyMaterial`] if the profile has no sealed key
    /// - [`NostrError::HexError`] if the stored salt is not hex
    /// - [`NostrError::Decryption`] for a wrong password or corrupted data
    pub fn decrypt_secret_key(profile: &Profile, password: &str) -> Result<Zeroizing<String>> {
        if !profile.has_key_material() {
            return Err(ProfileError::MissingKeyMaterial);
        }

        let salt = hex::decode(profile.salt.trim()).map_err(NostrError::from)?;
        let plaintext = decrypt_secret(&profile.encrypted_private_key, password, &salt)?;

        let secret = std::str::from_utf8(&plaintext)
            .map_err(|_| NostrError::Decryption("decrypted key is not UTF-8".to_string()))?;
        Ok(Zeroizing::new(secret.to_string()))
    }

    /// Asks once for the password and unseals the profile's secret key.
    ///
    /// # Errors
    ///
    /// As [`Self::decrypt_secret_key`], plus [`ProfileError::Prompt`].
    pub fn unlock_with_prompt(
        profile: &Profile,
        prompt: &dyn PasswordPrompt,
    ) -> Result<Zeroizing<String>> {
        let password = Zeroizing::new(prompt.prompt(DECRYPT_PROMPT)?);
        Self::decrypt_secret_key(profile, &password)
    }

    /// Returns the cached public key in hex and `npub` form.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::MissingPublicKey`] if none is cached
    /// - [`NostrError::Format`] if the cached key is not a valid public key
    pub fn public_identity(profile: &Profile) -> Result<PublicIdentity> {
        let hex = profile.public_key.trim();
        if hex.is_empty() {
            return Err(ProfileError::MissingPublicKey);
        }
        let npub = encode_bech32(Bech32Prefix::Npub, hex)?;
        Ok(PublicIdentity {
            hex: hex.to_string(),
            npub,
        })
    }
}

fn alias_or_default(alias: &str) -> String {
    let alias = alias.trim();
    if alias.is_empty() {
        DEFAULT_ALIAS.to_string()
    } else {
        alias.to_string()
    }
}

fn not_found(config: &Config, alias: &str) -> ProfileError {
    ProfileError::NotFound {
        alias: alias.to_string(),
        available: config.aliases(),
    }
}

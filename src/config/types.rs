//! On-disk document shapes.
//!
//! Two shapes are recognized when reading: the current multi-profile
//! [`Config`] (distinguished by its `profiles` key) and the flat
//! [`LegacyDocument`]. [`StoredDocument::probe`] picks one; only [`Config`] is
//! ever written.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Relays assigned to new profiles and to migrated profiles without any.
pub const DEFAULT_RELAYS: &[&str] = &[
    "wss://relay.damus.io",
    "wss://relay.primal.net",
    "wss://nos.lol",
];

/// Alias used for the profile produced by legacy migration.
pub const DEFAULT_ALIAS: &str = "default";

/// Returns an owned copy of [`DEFAULT_RELAYS`].
#[must_use]
pub fn default_relays() -> Vec<String> {
    DEFAULT_RELAYS.iter().map(ToString::to_string).collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One identity's credentials and relay set.
///
/// The three key fields are written together by the profile vault and never
/// individually.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Relay URLs in publish priority order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub relays: Vec<String>,
    /// Base64 sealed secret key.
    #[serde(default)]
    pub encrypted_private_key: String,
    /// Hex salt for the sealed secret.
    #[serde(default)]
    pub salt: String,
    /// Hex x-only public key, cached for display without decryption.
    #[serde(default)]
    pub public_key: String,
}

impl Profile {
    /// Returns whether all key fields are present.
    #[must_use]
    pub fn has_key_material(&self) -> bool {
        !self.encrypted_private_key.is_empty() && !self.salt.is_empty() && !self.public_key.is_empty()
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("relays", &self.relays)
            .field("public_key", &self.public_key)
            .field("has_key_material", &self.has_key_material())
            .finish_non_exhaustive()
    }
}

/// Root of the multi-profile config document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Alias used when no override is given.
    #[serde(default)]
    pub current_profile: String,
    /// Profiles by alias. Lookups are exact and case-sensitive.
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: BTreeMap<String, Profile>,
}

impl Config {
    /// Creates an empty config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all aliases in lexicographic order.
    #[must_use]
    pub fn aliases(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// Returns whether `current_profile` names an existing profile.
    #[must_use]
    pub fn current_is_valid(&self) -> bool {
        self.profiles.contains_key(&self.current_profile)
    }

    /// Points `current_profile` at the first alias if it is empty or stale.
    ///
    /// Returns `true` if the pointer changed. A config without profiles is
    /// left untouched.
    pub fn repair_current_profile(&mut self) -> bool {
        if self.current_is_valid() {
            return false;
        }
        match self.profiles.keys().next() {
            Some(first) => {
                self.current_profile.clone_from(first);
                true
            }
            None => false,
        }
    }
}

/// The pre-profiles flat document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LegacyDocument {
    /// Relay URLs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub relays: Vec<String>,
    /// Base64 sealed secret key.
    #[serde(default)]
    pub encrypted_private_key: String,
    /// Hex salt.
    #[serde(default)]
    pub salt: String,
    /// Hex public key.
    #[serde(default)]
    pub public_key: String,
}

impl LegacyDocument {
    /// Returns whether the secret, salt and public key are all present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.encrypted_private_key.is_empty() && !self.salt.is_empty() && !self.public_key.is_empty()
    }
}

/// A parsed config file in whichever shape it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredDocument {
    /// Multi-profile document.
    Current(Config),
    /// Flat single-profile document awaiting migration.
    Legacy(LegacyDocument),
}

impl StoredDocument {
    /// Key whose presence marks the multi-profile shape.
    pub const PROFILES_KEY: &'static str = "profiles";

    /// Classifies a parsed JSON value by probing for the `profiles` key.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object or does not
    /// deserialize into the detected shape.
    pub fn probe(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        use serde::de::Error;

        let is_current = value
            .as_object()
            .ok_or_else(|| serde_json::Error::custom("config root must be a JSON object"))?
            .contains_key(Self::PROFILES_KEY);

        if is_current {
            serde_json::from_value(value).map(Self::Current)
        } else {
            serde_json::from_value(value).map(Self::Legacy)
        }
    }
}

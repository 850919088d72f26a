//! Upgrade of the flat single-profile document.

use super::types::{default_relays, Config, LegacyDocument, Profile, DEFAULT_ALIAS};

/// Wraps a legacy document's fields into a profile named `"default"`.
///
/// An empty legacy relay list is replaced with the built-in defaults. The
/// caller is responsible for rejecting incomplete documents first (see
/// [`LegacyDocument::is_complete`]).
#[must_use]
pub fn migrate(legacy: LegacyDocument) -> Config {
    let relays = if legacy.relays.is_empty() {
        default_relays()
    } else {
        legacy.relays
    };

    let profile = Profile {
        relays,
        encrypted_private_key: legacy.encrypted_private_key,
        salt: legacy.salt,
        public_key: legacy.public_key,
    };

    let mut config = Config::new();
    config.profiles.insert(DEFAULT_ALIAS.to_string(), profile);
    config.current_profile = DEFAULT_ALIAS.to_string();
    config
}

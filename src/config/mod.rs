//! On-disk configuration: profiles, schema detection and legacy migration.
//!
//! # Document shapes
//!
//! ```text
//! current: { "current_profile": "work",
//!            "profiles": { "work": { relays, encrypted_private_key, salt, public_key } } }
//!
//! legacy:  { relays, encrypted_private_key, salt, public_key }
//! ```
//!
//! [`ConfigStore::load`] probes for the `profiles` key and converts a legacy
//! document to the current shape before returning. Code outside this module
//! only ever sees [`Config`].

mod error;
mod legacy;
mod store;
mod types;

pub use error::{ConfigError, Result};
pub use legacy::migrate;
pub use store::ConfigStore;
pub use types::{
    default_relays, Config, LegacyDocument, Profile, StoredDocument, DEFAULT_ALIAS,
    DEFAULT_RELAYS,
};

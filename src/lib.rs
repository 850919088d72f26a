//! Nostr Vault Core Library
//!
//! Password-sealed Nostr keys under named profiles, and relay lists kept in
//! sync with each identity's NIP-65 outbox.
//!
//! A typical command loads the config, resolves a profile, edits or
//! discovers its relays and saves:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nostr_vault_core::config::ConfigStore;
//! use nostr_vault_core::relay::{pull_outbox, NostrSdkTransport, OutboxSynchronizer};
//! use tokio_util::sync::CancellationToken;
//!
//! let store = ConfigStore::open_default()?;
//! let mut config = store.load()?;
//! let sync = OutboxSynchronizer::new(Arc::new(NostrSdkTransport::new()));
//! pull_outbox(&mut config, None, &sync, &CancellationToken::new()).await?;
//! store.save(&mut config)?;
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod config;
pub mod nostr;
pub mod profile;
pub mod relay;

//! Relay list management and NIP-65 outbox synchronization.
//!
//! # Architecture
//!
//! ```text
//! relays add / remove ──▶ list::{add_relays, remove_relays} ──▶ Profile.relays
//!
//! relays pull
//!     │
//!     ▼
//! outbox::pull_outbox ──▶ OutboxSynchronizer::discover
//!                              │  one candidate at a time
//!                              ▼
//!                         RelayTransport (nostr-sdk Client per relay)
//!                              │  kind 10002, author, limit 1
//!                              ▼
//!                         "r" tags minus read-only ──▶ Profile.relays (replaced)
//! ```
//!
//! # Failure model
//!
//! | Failure | Effect |
//! |---------|--------|
//! | One candidate unreachable or slow | Logged, next candidate tried |
//! | No candidate advertises write relays | [`RelayError::NoMetadata`], relays unchanged |
//! | Token cancelled | [`RelayError::Cancelled`] before the next candidate |

mod error;
pub mod list;
pub mod outbox;
pub mod transport;
mod types;

pub use error::{RelayError, RelayResult};
pub use list::{
    add_relays, dedup_relays, ensure_relays_given, normalize, normalized_key, remove_relays,
    RemovalOutcome,
};
pub use outbox::{publish_to_relays, pull_outbox, OutboxSynchronizer};
pub use transport::{NostrSdkTransport, RelayConnection, RelayTransport};
pub use types::{
    OutboxOptions, PublishResult, RelayListEvent, RelayListQuery, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_QUERY_TIMEOUT, RELAY_LIST_KIND,
};

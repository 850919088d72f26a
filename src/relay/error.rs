//! Error types for relay operations.
//!
//! Per-relay failures (`Connection`, `Timeout`, `Fetch`, `Publish`) are
//! normally logged and skipped by the callers in this module. The remaining
//! variants describe the outcome of a whole operation.

use thiserror::Error;

use crate::profile::ProfileError;

/// Errors that can occur during relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Connection to relay failed.
    #[error("Failed to connect to relay {url}: {reason}")]
    Connection {
        /// The relay URL that failed.
        url: String,
        /// The reason for the failure.
        reason: String,
    },

    /// Timeout waiting for operation.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Event fetch failed.
    #[error("Failed to fetch events: {0}")]
    Fetch(String),

    /// Event publishing failed.
    #[error("Failed to publish event: {0}")]
    Publish(String),

    /// Invalid relay URL.
    #[error("Invalid relay URL: {0}")]
    InvalidUrl(String),

    /// Outbox discovery found no write relays on any candidate.
    #[error("No relay list metadata found on any candidate relay")]
    NoMetadata,

    /// Removal targets were given but none matched the relay list.
    #[error("None of the given relays are configured")]
    NothingRemoved,

    /// A relay edit was requested without any relay URLs.
    #[error("No relay URLs given")]
    NoRelaysGiven,

    /// The caller cancelled the operation between relays.
    #[error("Relay operation cancelled")]
    Cancelled,

    /// Profile resolution failed before any relay was contacted.
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

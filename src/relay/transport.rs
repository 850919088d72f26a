//! Relay transport seam.
//!
//! Discovery and publishing only need three things from a relay: open a
//! connection, run a relay list query and send a signed event.
//! [`RelayTransport`] captures that, so the synchronizer can be driven by
//! [`NostrSdkTransport`] in production and by a scripted transport in tests.

use std::time::Duration;

use async_trait::async_trait;
use nostr::{Event, Filter, Kind, PublicKey, RelayUrl};
use nostr_sdk::Client;
use tracing::debug;

use super::error::{RelayError, RelayResult};
use super::types::{RelayListEvent, RelayListQuery};

/// Opens connections to individual relays.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Connects to `url`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidUrl`], [`RelayError::Connection`] or
    /// [`RelayError::Timeout`] if no usable connection was established.
    async fn connect(&self, url: &str, timeout: Duration) -> RelayResult<Box<dyn RelayConnection>>;
}

/// An open connection to one relay.
#[async_trait]
pub trait RelayConnection: Send + Sync {
    /// Runs a relay list query.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Fetch`] or [`RelayError::Timeout`].
    async fn query(
        &self,
        query: &RelayListQuery,
        timeout: Duration,
    ) -> RelayResult<Vec<RelayListEvent>>;

    /// Sends a signed event.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Publish`] if the relay did not accept it.
    async fn publish(&self, event: &Event, timeout: Duration) -> RelayResult<()>;

    /// Closes the connection. Never fails.
    async fn close(&self);
}

/// [`RelayTransport`] backed by a fresh `nostr-sdk` client per relay.
///
/// Every connection gets its own [`Client`] holding exactly one relay, so a
/// slow or broken candidate cannot affect the next one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NostrSdkTransport;

impl NostrSdkTransport {
    /// Creates the transport.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RelayTransport for NostrSdkTransport {
    async fn connect(&self, url: &str, timeout: Duration) -> RelayResult<Box<dyn RelayConnection>> {
        let relay_url =
            RelayUrl::parse(url).map_err(|e| RelayError::InvalidUrl(format!("{url}: {e}")))?;

        let client = Client::builder().build();
        client
            .add_relay(relay_url.as_str())
            .await
            .map_err(|e| RelayError::Connection {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        client.connect().await;
        client.wait_for_connection(timeout).await;

        let connected = client
            .relays()
            .await
            .values()
            .any(nostr_sdk::Relay::is_connected);
        if !connected {
            client.disconnect().await;
            return Err(RelayError::Connection {
                url: url.to_string(),
                reason: format!("not connected after {}ms", timeout.as_millis()),
            });
        }

        debug!(relay = %relay_url, "Connected");
        Ok(Box::new(NostrSdkConnection {
            client,
            url: relay_url.to_string(),
        }))
    }
}

/// One relay connection held by a dedicated client.
struct NostrSdkConnection {
    client: Client,
    url: String,
}

#[async_trait]
impl RelayConnection for NostrSdkConnection {
    async fn query(
        &self,
        query: &RelayListQuery,
        timeout: Duration,
    ) -> RelayResult<Vec<RelayListEvent>> {
        let author = PublicKey::from_hex(&query.author)
            .map_err(|e| RelayError::Fetch(format!("invalid author {}: {e}", query.author)))?;

        let filter = Filter::new()
            .author(author)
            .kind(Kind::from(query.kind))
            .limit(query.limit);

        let events = self
            .client
            .fetch_events(filter, timeout)
            .await
            .map_err(|e| RelayError::Fetch(format!("{}: {e}", self.url)))?;

        Ok(events
            .into_iter()
            .map(|event| RelayListEvent::from(&event))
            .collect())
    }

    async fn publish(&self, event: &Event, timeout: Duration) -> RelayResult<()> {
        let output = tokio::time::timeout(timeout, self.client.send_event(event))
            .await
            .map_err(|_| RelayError::Timeout(format!("publish to {}", self.url)))?
            .map_err(|e| RelayError::Publish(e.to_string()))?;

        if output.success.is_empty() {
            let reason = output
                .failed
                .values()
                .next()
                .cloned()
                .unwrap_or_else(|| "not accepted".to_string());
            return Err(RelayError::Publish(reason));
        }
        Ok(())
    }

    async fn close(&self) {
        self.client.disconnect().await;
    }
}

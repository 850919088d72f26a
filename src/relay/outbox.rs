//! NIP-65 outbox discovery and best-effort publishing.
//!
//! Discovery asks each candidate relay, in order, for the newest relay list
//! event (kind 10002) of a public key and collects the write relays it
//! advertises. A candidate that cannot be reached or queried in time is
//! logged and skipped. The result replaces the profile's relay list.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use nostr::Event;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::{RelayError, RelayResult};
use super::list::{dedup_relays, normalize, normalized_key};
use super::transport::RelayTransport;
use super::types::{OutboxOptions, PublishResult, RelayListEvent, RelayListQuery};
use crate::config::{default_relays, Config};
use crate::profile::ProfileVault;

/// Tag name of a relay entry in a relay list event.
const RELAY_TAG: &str = "r";

/// Marker of relays the author only reads from.
const READ_MARKER: &str = "read";

/// Discovers an identity's write relays from its relay list event.
pub struct OutboxSynchronizer {
    transport: Arc<dyn RelayTransport>,
    options: OutboxOptions,
}

impl OutboxSynchronizer {
    /// Creates a synchronizer with default timeouts.
    #[must_use]
    pub fn new(transport: Arc<dyn RelayTransport>) -> Self {
        Self::with_options(transport, OutboxOptions::default())
    }

    /// Creates a synchronizer with custom timeouts.
    #[must_use]
    pub fn with_options(transport: Arc<dyn RelayTransport>, options: OutboxOptions) -> Self {
        Self { transport, options }
    }

    /// Returns the configured timeouts.
    #[must_use]
    pub const fn options(&self) -> OutboxOptions {
        self.options
    }

    /// Returns the write relays advertised for `pubkey_hex`.
    ///
    /// Candidates are tried one at a time. URLs are normalized and deduped
    /// across all candidates in first-seen order.
    ///
    /// # Errors
    ///
    /// - [`RelayError::Cancelled`] if `cancel` fires before a candidate is tried
    /// - [`RelayError::NoMetadata`] if no candidate yielded a write relay
    pub async fn discover<S: AsRef<str> + Sync>(
        &self,
        cancel: &CancellationToken,
        candidates: &[S],
        pubkey_hex: &str,
    ) -> RelayResult<Vec<String>> {
        let query = RelayListQuery::for_author(pubkey_hex);
        let mut seen = HashSet::new();
        let mut discovered = Vec::new();

        for candidate in candidates {
            if cancel.is_cancelled() {
                return Err(RelayError::Cancelled);
            }

            let url = normalize(candidate.as_ref());
            if url.is_empty() {
                continue;
            }

            let events = match self.query_candidate(&url, &query).await {
                Ok(events) => events,
                Err(e) => {
                    warn!(relay = %url, error = %e, "Skipping relay during outbox discovery");
                    continue;
                }
            };

            for relay in events.iter().flat_map(write_relays) {
                if seen.insert(normalized_key(&relay)) {
                    discovered.push(relay);
                }
            }
        }

        if discovered.is_empty() {
            return Err(RelayError::NoMetadata);
        }

        info!(author = %query.author, count = discovered.len(), "Discovered outbox relays");
        Ok(discovered)
    }

    async fn query_candidate(
        &self,
        url: &str,
        query: &RelayListQuery,
    ) -> RelayResult<Vec<RelayListEvent>> {
        let OutboxOptions {
            connect_timeout,
            query_timeout,
        } = self.options;

        let connection = bounded(
            connect_timeout,
            format!("connect to {url}"),
            self.transport.connect(url, connect_timeout),
        )
        .await?;

        let result = bounded(
            query_timeout,
            format!("query {url}"),
            connection.query(query, query_timeout),
        )
        .await;
        connection.close().await;

        if let Ok(events) = &result {
            debug!(relay = %url, events = events.len(), "Relay list query finished");
        }
        result
    }
}

/// Runs `fut` with a deadline, mapping expiry to [`RelayError::Timeout`].
async fn bounded<T, F>(limit: Duration, what: String, fut: F) -> RelayResult<T>
where
    F: Future<Output = RelayResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| RelayError::Timeout(what))?
}

/// Extracts the normalized write relays from one relay list event.
fn write_relays(event: &RelayListEvent) -> Vec<String> {
    event
        .tags
        .iter()
        .filter(|tag| tag.first().map(String::as_str) == Some(RELAY_TAG))
        .filter(|tag| {
            tag.get(2)
                .map_or(true, |marker| !marker.trim().eq_ignore_ascii_case(READ_MARKER))
        })
        .filter_map(|tag| tag.get(1))
        .map(|url| normalize(url))
        .filter(|url| !url.is_empty())
        .collect()
}

/// Replaces the active profile's relays with its discovered outbox.
///
/// Candidates are the profile's current relays, or the built-in defaults if
/// it has none. The relay list is left untouched when discovery fails. The
/// caller persists the config.
///
/// # Errors
///
/// - [`RelayError::Profile`] if the profile cannot be resolved or has no public key
/// - otherwise as [`OutboxSynchronizer::discover`]
pub async fn pull_outbox(
    config: &mut Config,
    alias_override: Option<&str>,
    sync: &OutboxSynchronizer,
    cancel: &CancellationToken,
) -> RelayResult<Vec<String>> {
    let (profile, alias) = ProfileVault::active_profile(config, alias_override)?;
    let identity = ProfileVault::public_identity(profile)?;
    let candidates = if profile.relays.is_empty() {
        default_relays()
    } else {
        profile.relays.clone()
    };

    let discovered = sync.discover(cancel, &candidates, &identity.hex).await?;

    let (profile, _) = ProfileVault::active_profile_mut(config, Some(&alias))?;
    profile.relays.clone_from(&discovered);
    info!(alias = %alias, count = discovered.len(), "Replaced relay list with outbox");
    Ok(discovered)
}

/// Sends `event` to every relay in `relays`, one at a time.
///
/// Never fails as a whole: unreachable relays land in
/// [`PublishResult::failed`], refusals in [`PublishResult::rejected_by`].
/// Duplicate and blank URLs are skipped.
pub async fn publish_to_relays<S: AsRef<str>>(
    transport: &dyn RelayTransport,
    relays: &[S],
    event: &Event,
    timeout: Duration,
) -> PublishResult {
    let mut result = PublishResult::new(event.id);

    for url in dedup_relays(relays) {
        let connection = match bounded(
            timeout,
            format!("connect to {url}"),
            transport.connect(&url, timeout),
        )
        .await
        {
            Ok(connection) => connection,
            Err(e) => {
                warn!(relay = %url, error = %e, "Relay unreachable, event not sent");
                result.failed.push(url);
                continue;
            }
        };

        let sent = bounded(
            timeout,
            format!("publish to {url}"),
            connection.publish(event, timeout),
        )
        .await;
        connection.close().await;

        match sent {
            Ok(()) => result.accepted_by.push(url),
            Err(e) => {
                warn!(relay = %url, error = %e, "Relay did not accept event");
                result.rejected_by.push((url, e.to_string()));
            }
        }
    }

    info!(
        event_id = %event.id,
        accepted = result.success_count(),
        attempted = result.total_attempted(),
        "Published event"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(tags: &[&[&str]]) -> RelayListEvent {
        RelayListEvent {
            tags: tags
                .iter()
                .map(|tag| tag.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }

    #[test]
    fn write_relays_skips_read_markers_and_other_tags() {
        let event = event(&[
            &["r", "wss://x/"],
            &["r", "wss://y", "read"],
            &["r", "wss://z", " READ "],
            &["r", "wss://w", "write"],
            &["p", "wss://not-a-relay"],
            &["r"],
            &["r", "  "],
        ]);
        assert_eq!(write_relays(&event), vec!["wss://x", "wss://w"]);
    }

    #[test]
    fn write_relays_of_empty_event_is_empty() {
        assert!(write_relays(&RelayListEvent::default()).is_empty());
    }

    #[tokio::test]
    async fn bounded_maps_expiry_to_timeout() {
        let result: RelayResult<()> = bounded(
            Duration::from_millis(10),
            "query wss://slow".to_string(),
            std::future::pending(),
        )
        .await;
        match result {
            Err(RelayError::Timeout(what)) => assert_eq!(what, "query wss://slow"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bounded_passes_inner_error_through() {
        let result: RelayResult<()> = bounded(Duration::from_secs(1), "x".to_string(), async {
            Err(RelayError::Fetch("closed".to_string()))
        })
        .await;
        assert!(matches!(result, Err(RelayError::Fetch(_))));
    }
}

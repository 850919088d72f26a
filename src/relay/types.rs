//! Types shared by the relay transport, outbox discovery and publishing.

use std::time::Duration;

use nostr::EventId;

/// Event kind of NIP-65 relay list metadata.
pub const RELAY_LIST_KIND: u16 = 10002;

/// Default budget for opening one relay connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default budget for one relay list query.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Filter for the latest relay list event of one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayListQuery {
    /// Hex public key of the author.
    pub author: String,
    /// Event kind, always [`RELAY_LIST_KIND`].
    pub kind: u16,
    /// Maximum number of events to return.
    pub limit: usize,
}

impl RelayListQuery {
    /// Query for the single newest relay list event of `author`.
    #[must_use]
    pub fn for_author(author: &str) -> Self {
        Self {
            author: author.trim().to_string(),
            kind: RELAY_LIST_KIND,
            limit: 1,
        }
    }
}

/// The part of a relay list event that discovery reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayListEvent {
    /// Raw tags, e.g. `["r", "wss://relay.example.com", "write"]`.
    pub tags: Vec<Vec<String>>,
}

impl From<&nostr::Event> for RelayListEvent {
    fn from(event: &nostr::Event) -> Self {
        Self {
            tags: event.tags.iter().map(|tag| tag.as_slice().to_vec()).collect(),
        }
    }
}

/// Timeouts for outbox discovery.
///
/// Each candidate relay gets its own connect and query budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboxOptions {
    /// Budget for opening a connection to one candidate.
    pub connect_timeout: Duration,
    /// Budget for the relay list query on one candidate.
    pub query_timeout: Duration,
}

impl Default for OutboxOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// Result of publishing an event to relays.
#[derive(Debug, Clone)]
pub struct PublishResult {
    /// The event ID that was published.
    pub event_id: EventId,
    /// Relays that accepted the event.
    pub accepted_by: Vec<String>,
    /// Relays that rejected the event (with reasons).
    pub rejected_by: Vec<(String, String)>,
    /// Relays that could not be reached.
    pub failed: Vec<String>,
}

impl PublishResult {
    /// Creates an empty result for `event_id`.
    #[must_use]
    pub const fn new(event_id: EventId) -> Self {
        Self {
            event_id,
            accepted_by: Vec::new(),
            rejected_by: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Returns true if at least one relay accepted the event.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.accepted_by.is_empty()
    }

    /// Returns the number of successful relays.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.accepted_by.len()
    }

    /// Returns the total number of relays attempted.
    #[must_use]
    pub fn total_attempted(&self) -> usize {
        self.accepted_by.len() + self.rejected_by.len() + self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr::{EventBuilder, Keys, Kind, Tag};

    #[test]
    fn relay_list_kind_matches_nip65() {
        assert_eq!(Kind::RelayList.as_u16(), RELAY_LIST_KIND);
    }

    #[test]
    fn query_for_author_trims_and_limits() {
        let query = RelayListQuery::for_author("  abcd \n");
        assert_eq!(query.author, "abcd");
        assert_eq!(query.kind, 10002);
        assert_eq!(query.limit, 1);
    }

    #[test]
    fn outbox_options_default_to_five_seconds() {
        let options = OutboxOptions::default();
        assert_eq!(options.connect_timeout, Duration::from_secs(5));
        assert_eq!(options.query_timeout, Duration::from_secs(5));
    }

    #[test]
    fn relay_list_event_from_signed_event_keeps_tags() {
        let keys = Keys::generate();
        let tags = vec![
            Tag::parse(["r", "wss://x"]).unwrap(),
            Tag::parse(["r", "wss://y", "read"]).unwrap(),
        ];
        let event = EventBuilder::new(Kind::RelayList, "")
            .tags(tags)
            .sign_with_keys(&keys)
            .unwrap();

        let view = RelayListEvent::from(&event);
        assert_eq!(
            view.tags,
            vec![
                vec!["r".to_string(), "wss://x".to_string()],
                vec!["r".to_string(), "wss://y".to_string(), "read".to_string()],
            ]
        );
    }

    #[test]
    fn publish_result_is_success_with_accepted() {
        let mut result = PublishResult::new(EventId::all_zeros());
        result.accepted_by.push("wss://relay.example.com".to_string());
        assert!(result.is_success());
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.total_attempted(), 1);
    }

    #[test]
    fn publish_result_not_success_when_empty() {
        let result = PublishResult {
            event_id: EventId::all_zeros(),
            accepted_by: vec![],
            rejected_by: vec![("wss://relay.com".to_string(), "rejected".to_string())],
            failed: vec!["wss://fail.com".to_string()],
        };
        assert!(!result.is_success());
        assert_eq!(result.success_count(), 0);
        assert_eq!(result.total_attempted(), 2);
    }
}

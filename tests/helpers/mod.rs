//! Reusable helpers for vault and relay integration tests.
//!
//! Config files live in a fresh temp directory per test. Relays are
//! simulated by [`MockTransport`], which serves real signed kind 10002
//! events so the tag conversion path is exercised too.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nostr::{Event, EventBuilder, Keys, Kind, Tag};
use nostr_vault_core::config::ConfigStore;
use nostr_vault_core::relay::{
    OutboxOptions, RelayConnection, RelayError, RelayListEvent, RelayListQuery, RelayResult,
    RelayTransport,
};
use tempfile::TempDir;

/// Well-known secret key `1`.
pub const SECRET_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

/// Public key of [`SECRET_ONE`].
pub const PUBLIC_ONE: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

/// A config store inside a temp directory that is removed on drop.
pub struct TempStore {
    pub dir: TempDir,
    pub store: ConfigStore,
}

/// Creates a store at `<tmp>/nostr/config.json`. The parent does not exist yet.
pub fn temp_store() -> TempStore {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let store = ConfigStore::new(dir.path().join("nostr").join("config.json"));
    TempStore { dir, store }
}

/// Writes raw JSON to the store's path, creating the parent directory.
pub fn write_raw(store: &ConfigStore, json: &str) {
    let path = store.path();
    std::fs::create_dir_all(path.parent().expect("config path has a parent"))
        .expect("should create config dir");
    std::fs::write(path, json).expect("should write config");
}

/// Short timeouts so hanging relays do not slow the suite down.
pub fn fast_options() -> OutboxOptions {
    OutboxOptions {
        connect_timeout: Duration::from_millis(100),
        query_timeout: Duration::from_millis(100),
    }
}

/// Creates a signed relay list event (kind 10002) with the given `r` tags.
///
/// Each entry is `(url, marker)`.
pub fn create_relay_list_event(keys: &Keys, relays: &[(&str, Option<&str>)]) -> Event {
    let tags: Vec<Tag> = relays
        .iter()
        .map(|(url, marker)| {
            let mut parts = vec!["r", *url];
            parts.extend(marker.iter());
            Tag::parse(parts).expect("should parse r tag")
        })
        .collect();

    EventBuilder::new(Kind::RelayList, "")
        .tags(tags)
        .sign_with_keys(keys)
        .expect("should sign relay list event")
}

/// Behaviour of one simulated relay.
#[derive(Debug, Clone)]
pub enum MockRelay {
    /// Refuses connections.
    Down,
    /// Accepts the connection but never answers.
    Silent,
    /// Accepts the connection, then fails every query.
    Broken,
    /// Answers relay list queries with these events.
    Serving(Vec<Event>),
}

/// Scripted [`RelayTransport`]. URLs without a script are down.
#[derive(Debug, Default)]
pub struct MockTransport {
    relays: HashMap<String, MockRelay>,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relay(mut self, url: &str, relay: MockRelay) -> Self {
        self.relays.insert(url.to_string(), relay);
        self
    }

    /// Every call seen, as `"<call> <url>"` for connect, query, publish and close.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// URLs passed to `connect`, in order.
    pub fn connects(&self) -> Vec<String> {
        self.log()
            .iter()
            .filter_map(|entry| entry.strip_prefix("connect "))
            .map(ToString::to_string)
            .collect()
    }
}

struct MockConnection {
    url: String,
    relay: MockRelay,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl RelayTransport for MockTransport {
    async fn connect(&self, url: &str, _timeout: Duration) -> RelayResult<Box<dyn RelayConnection>> {
        self.log.lock().unwrap().push(format!("connect {url}"));
        match self.relays.get(url).cloned().unwrap_or(MockRelay::Down) {
            MockRelay::Down => Err(RelayError::Connection {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
            relay => Ok(Box::new(MockConnection {
                url: url.to_string(),
                relay,
                log: Arc::clone(&self.log),
            })),
        }
    }
}

#[async_trait]
impl RelayConnection for MockConnection {
    async fn query(
        &self,
        query: &RelayListQuery,
        _timeout: Duration,
    ) -> RelayResult<Vec<RelayListEvent>> {
        self.log.lock().unwrap().push(format!("query {}", self.url));
        match &self.relay {
            MockRelay::Serving(events) => Ok(events
                .iter()
                .filter(|event| {
                    event.kind.as_u16() == query.kind && event.pubkey.to_hex() == query.author
                })
                .take(query.limit)
                .map(RelayListEvent::from)
                .collect()),
            MockRelay::Broken => Err(RelayError::Fetch(format!("{}: closed", self.url))),
            _ => std::future::pending().await,
        }
    }

    async fn publish(&self, _event: &Event, _timeout: Duration) -> RelayResult<()> {
        self.log.lock().unwrap().push(format!("publish {}", self.url));
        match self.relay {
            MockRelay::Serving(_) => Ok(()),
            _ => Err(RelayError::Publish("read-only relay".to_string())),
        }
    }

    async fn close(&self) {
        self.log.lock().unwrap().push(format!("close {}", self.url));
    }
}

//! Relay list editing.
//!
//! Two URLs name the same relay when their [`normalized_key`]s match, i.e.
//! after trimming whitespace, dropping trailing slashes and lowercasing. The
//! key is only used for comparison; stored URLs keep the caller's casing.

use std::collections::HashSet;

use super::error::{RelayError, RelayResult};
use crate::config::Profile;

/// Outcome of [`remove_relays`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// Stored URLs that were removed, in list order.
    pub removed: Vec<String>,
    /// Requested URLs that matched nothing, as given.
    pub missing: Vec<String>,
}

impl RemovalOutcome {
    /// Fails if removal targets were given but none matched.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::NothingRemoved`] when `removed` is empty.
    pub fn ensure_any_removed(&self) -> RelayResult<()> {
        if self.removed.is_empty() {
            return Err(RelayError::NothingRemoved);
        }
        Ok(())
    }
}

/// Trims whitespace and trailing slashes.
#[must_use]
pub fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Comparison key for a relay URL.
#[must_use]
pub fn normalized_key(url: &str) -> String {
    normalize(url).to_lowercase()
}

/// Fails when `urls` holds no non-blank entry.
///
/// # Errors
///
/// Returns [`RelayError::NoRelaysGiven`].
pub fn ensure_relays_given<S: AsRef<str>>(urls: &[S]) -> RelayResult<()> {
    if urls.iter().all(|url| normalize(url.as_ref()).is_empty()) {
        return Err(RelayError::NoRelaysGiven);
    }
    Ok(())
}

/// Normalizes `urls` and drops blanks and duplicates, keeping first-seen order.
#[must_use]
pub fn dedup_relays<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .map(|url| normalize(url.as_ref()))
        .filter(|url| !url.is_empty() && seen.insert(url.to_lowercase()))
        .collect()
}

/// Appends relays that are not already configured.
///
/// Returns the normalized URLs actually added, in input order.
pub fn add_relays<S: AsRef<str>>(profile: &mut Profile, urls: &[S]) -> Vec<String> {
    let mut seen: HashSet<String> = profile.relays.iter().map(|r| normalized_key(r)).collect();
    let mut added = Vec::new();

    for url in urls {
        let url = normalize(url.as_ref());
        if url.is_empty() || !seen.insert(url.to_lowercase()) {
            continue;
        }
        profile.relays.push(url.clone());
        added.push(url);
    }

    added
}

/// Removes the given relays from the profile.
///
/// The remaining relays keep their order. Blank inputs are ignored.
/// `missing` holds one entry per unmatched normalized key, spelled as the
/// first input that produced it, so two spellings of the same absent relay
/// are reported once.
pub fn remove_relays<S: AsRef<str>>(profile: &mut Profile, urls: &[S]) -> RemovalOutcome {
    let targets: Vec<(&str, String)> = urls
        .iter()
        .map(|url| url.as_ref())
        .filter(|url| !normalize(url).is_empty())
        .map(|url| (url, normalized_key(url)))
        .collect();
    let target_keys: HashSet<&str> = targets.iter().map(|(_, key)| key.as_str()).collect();

    let mut matched = HashSet::new();
    let mut outcome = RemovalOutcome::default();
    profile.relays.retain(|relay| {
        let key = normalized_key(relay);
        if target_keys.contains(key.as_str()) {
            outcome.removed.push(relay.clone());
            matched.insert(key);
            false
        } else {
            true
        }
    });

    let mut reported = HashSet::new();
    for (url, key) in &targets {
        if !matched.contains(key) && reported.insert(key.as_str()) {
            outcome.missing.push((*url).to_string());
        }
    }

    outcome
}

//! Property-based tests for relay list editing.

use nostr_vault_core::config::Profile;
use nostr_vault_core::relay::{add_relays, dedup_relays, normalize, normalized_key, remove_relays};
use proptest::prelude::*;
use std::collections::HashSet;

/// Strategy to generate relay URLs with random casing, padding and slashes
fn relay_url_strategy() -> impl Strategy<Value = String> {
    ("[a-dA-D]{1,3}", " {0,2}", "/{0,2}").prop_map(|(host, pad, slash)| {
        format!("{pad}wss://{host}.relay{slash}{pad}")
    })
}

fn relay_list_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(relay_url_strategy(), 0..12)
}

fn keys(relays: &[String]) -> Vec<String> {
    relays.iter().map(|r| normalized_key(r)).collect()
}

proptest! {
    /// Property: Normalizing is idempotent
    #[test]
    fn normalize_is_idempotent(url in relay_url_strategy()) {
        let once = normalize(&url);
        prop_assert_eq!(normalize(&once), once);
    }

    /// Property: After adding, the relay list never holds two equal keys
    #[test]
    fn add_never_creates_duplicates(
        existing in relay_list_strategy(),
        incoming in relay_list_strategy(),
    ) {
        let mut profile = Profile { relays: dedup_relays(&existing), ..Profile::default() };
        let before = profile.relays.clone();

        let added = add_relays(&mut profile, &incoming);

        let all = keys(&profile.relays);
        let unique: HashSet<_> = all.iter().collect();
        prop_assert_eq!(all.len(), unique.len());
        prop_assert_eq!(&profile.relays[..before.len()], &before[..]);
        prop_assert_eq!(&profile.relays[before.len()..], &added[..]);
    }

    /// Property: Removal partitions the list and keeps survivor order
    #[test]
    fn remove_partitions_list(
        existing in relay_list_strategy(),
        targets in relay_list_strategy(),
    ) {
        let relays = dedup_relays(&existing);
        let mut profile = Profile { relays: relays.clone(), ..Profile::default() };

        let outcome = remove_relays(&mut profile, &targets);

        let target_keys: HashSet<String> = keys(&targets).into_iter().collect();
        let expected_kept: Vec<String> = relays
            .iter()
            .filter(|r| !target_keys.contains(&normalized_key(r)))
            .cloned()
            .collect();
        prop_assert_eq!(&profile.relays, &expected_kept);
        prop_assert_eq!(outcome.removed.len() + profile.relays.len(), relays.len());

        for missing in &outcome.missing {
            let key = normalized_key(missing);
            prop_assert!(relays.iter().all(|r| normalized_key(r) != key));
        }
    }

    /// Property: Dedup keeps the first spelling of every key
    #[test]
    fn dedup_keeps_first_seen(urls in relay_list_strategy()) {
        let deduped = dedup_relays(&urls);
        let mut seen = HashSet::new();
        let expected: Vec<String> = urls
            .iter()
            .map(|u| normalize(u))
            .filter(|u| seen.insert(u.to_lowercase()))
            .collect();
        prop_assert_eq!(deduped, expected);
    }
}

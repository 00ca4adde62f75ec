//! Behavior tests for the persisted recent-search list.

mod support;

use std::sync::Arc;
use std::time::Duration;

use support::{api, ok, search_body, ScriptedHttpClient};
use tempfile::TempDir;
use tickerlens_core::{
    FileStorage, KeyValueStorage, RecentSearchStore, SearchConfig, SearchOrchestrator,
    MAX_RECENT_SEARCHES, RECENT_SEARCHES_KEY,
};

fn file_store(dir: &TempDir) -> RecentSearchStore {
    RecentSearchStore::load(Arc::new(FileStorage::new(dir.path())))
}

#[test]
fn when_app_restarts_system_restores_recent_searches_from_disk() {
    // Given: A store that recorded two searches
    let dir = TempDir::new().expect("temp dir");
    let store = file_store(&dir);
    store.record("tesla").expect("record");
    store.record("apple").expect("record");

    // When: A new store loads from the same directory
    let reloaded = file_store(&dir);

    // Then: The list survives, newest first
    assert_eq!(reloaded.list(), vec!["apple".to_owned(), "tesla".to_owned()]);
    assert!(dir.path().join(format!("{RECENT_SEARCHES_KEY}.json")).exists());
}

#[test]
fn when_query_repeats_system_moves_it_to_front_and_caps_the_list() {
    // Given: A full list
    let store = RecentSearchStore::in_memory();
    for index in 0..MAX_RECENT_SEARCHES {
        store.record(&format!("query {index}")).expect("record");
    }

    // When: An existing query is repeated and a new one is added
    store.record("query 3").expect("record");
    let list = store.record("fresh").expect("record");

    // Then: No duplicates, newest first, oldest dropped
    assert_eq!(list.len(), MAX_RECENT_SEARCHES);
    assert_eq!(list[0], "fresh");
    assert_eq!(list[1], "query 3");
    assert_eq!(list.iter().filter(|entry| *entry == "query 3").count(), 1);
    assert!(!list.contains(&"query 0".to_owned()));
}

#[test]
fn when_persisted_list_is_corrupt_system_starts_empty() {
    // Given: A storage file that is not a JSON list
    let dir = TempDir::new().expect("temp dir");
    let storage = FileStorage::new(dir.path());
    storage
        .save(RECENT_SEARCHES_KEY, "{not json")
        .expect("write corrupt file");

    // When: The store loads
    let store = file_store(&dir);

    // Then: It is empty and still writable
    assert!(store.list().is_empty());
    assert_eq!(store.record("msft").expect("record"), vec!["msft".to_owned()]);
}

#[test]
fn when_history_is_cleared_system_removes_the_file() {
    // Given: A store with one entry on disk
    let dir = TempDir::new().expect("temp dir");
    let store = file_store(&dir);
    store.record("nvidia").expect("record");

    // When: The history is cleared
    store.clear().expect("clear");

    // Then: Nothing remains in memory or on disk
    assert!(store.list().is_empty());
    assert!(file_store(&dir).list().is_empty());
    assert!(!dir.path().join(format!("{RECENT_SEARCHES_KEY}.json")).exists());
}

#[tokio::test(start_paused = true)]
async fn when_orchestrator_starts_system_shows_and_extends_saved_history() {
    // Given: History saved by an earlier session
    let dir = TempDir::new().expect("temp dir");
    file_store(&dir).record("amazon").expect("record");
    let http = ScriptedHttpClient::new();
    http.route("/search?", vec![ok(search_body(&["GOOGL"]))]);

    // When: An orchestrator starts on the same storage and runs a search
    let search = SearchOrchestrator::new(
        Arc::new(api(&http)),
        Some(file_store(&dir)),
        SearchConfig::default(),
    );
    let initial = search.snapshot().recent_searches;
    search.search_now("google");
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Then: Saved history is visible at once and the new query is persisted
    assert_eq!(initial, vec!["amazon".to_owned()]);
    assert_eq!(
        file_store(&dir).list(),
        vec!["google".to_owned(), "amazon".to_owned()]
    );
}

#[tokio::test(start_paused = true)]
async fn when_queries_differ_only_in_spacing_system_keeps_one_history_entry() {
    // Given: A backend that always finds a company
    let http = ScriptedHttpClient::new();
    http.route("/search?", vec![ok(search_body(&["AAPL"]))]);
    let search = SearchOrchestrator::new(
        Arc::new(api(&http)),
        Some(RecentSearchStore::in_memory()),
        SearchConfig::default(),
    );

    // When: The same query is searched with different internal spacing
    search.search_now("apple   inc");
    tokio::time::sleep(Duration::from_millis(10)).await;
    search.search_now(" apple inc ");
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Then: One request was cached and one normalized entry is remembered
    assert_eq!(http.count("/search?"), 1);
    assert_eq!(search.recent_searches(), vec!["apple inc".to_owned()]);
    assert_eq!(search.snapshot().debounced_query, "apple inc");
}

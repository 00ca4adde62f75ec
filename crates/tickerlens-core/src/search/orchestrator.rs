use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;
use tokio::task::AbortHandle;

use super::debounce::Debouncer;
use super::state::{SearchConfig, SearchFailure, SearchPhase, SearchSequence, SearchSnapshot};
use super::SearchBackend;
use crate::classify::ApiError;
use crate::domain::{normalize_query, SearchResult, SearchResults, Suggestion};
use crate::recent::RecentSearchStore;

type ResultsObserver = Arc<dyn Fn(&[SearchResult]) + Send + Sync>;

/// Debounced search state machine for one search widget.
///
/// Every keystroke updates the raw query at once and re-arms two timers: the
/// suggestion timer and the slower search timer. Each fetch is tagged with a
/// sequence number; a response is applied only if no newer fetch of the same
/// kind was issued in the meantime, and superseded fetches are aborted.
///
/// All methods must be called from within a tokio runtime.
#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn SearchBackend>,
    recent: Option<RecentSearchStore>,
    config: SearchConfig,
    state: Mutex<State>,
    updates: watch::Sender<SearchSnapshot>,
    search_timer: Debouncer,
    suggestion_timer: Debouncer,
    observers: Mutex<Vec<ResultsObserver>>,
}

#[derive(Default)]
struct State {
    snapshot: SearchSnapshot,
    search_seq: SearchSequence,
    suggestion_seq: SearchSequence,
    search_task: Option<AbortHandle>,
    suggestion_task: Option<AbortHandle>,
}

impl State {
    fn abort_search(&mut self) {
        if let Some(task) = self.search_task.take() {
            task.abort();
        }
    }

    fn abort_suggestions(&mut self) {
        if let Some(task) = self.suggestion_task.take() {
            task.abort();
        }
    }
}

impl SearchOrchestrator {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        recent: Option<RecentSearchStore>,
        config: SearchConfig,
    ) -> Self {
        let snapshot = SearchSnapshot {
            recent_searches: recent.as_ref().map(RecentSearchStore::list).unwrap_or_default(),
            ..SearchSnapshot::default()
        };
        let (updates, _) = watch::channel(snapshot.clone());

        Self {
            inner: Arc::new(Inner {
                backend,
                recent,
                search_timer: Debouncer::new(config.debounce),
                suggestion_timer: Debouncer::new(config.suggestion_debounce),
                config,
                state: Mutex::new(State {
                    snapshot,
                    ..State::default()
                }),
                updates,
                observers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.inner.config
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.updates.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.lock().snapshot.clone()
    }

    /// Register a callback invoked with the committed results list, including
    /// the empty list published by [`clear`](Self::clear).
    pub fn on_results<F>(&self, observer: F)
    where
        F: Fn(&[SearchResult]) + Send + Sync + 'static,
    {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Keystroke: update the raw query and re-arm both debounce timers.
    ///
    /// While a search is in flight the phase stays `Loading`.
    pub fn set_query(&self, query: &str) {
        {
            let mut state = self.inner.lock();
            state.snapshot.query = query.to_owned();
            if !state.snapshot.loading {
                state.snapshot.phase = SearchPhase::AwaitingDebounce;
            }
            self.inner.publish(&state);
        }

        let weak = Arc::downgrade(&self.inner);
        let owned = query.to_owned();
        self.inner.suggestion_timer.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                Inner::start_suggestions(&inner, owned);
            }
        });

        let weak = Arc::downgrade(&self.inner);
        let owned = query.to_owned();
        self.inner.search_timer.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                Inner::start_search(&inner, owned);
            }
        });
    }

    /// Search immediately, skipping the debounce window (e.g. on Enter).
    pub fn search_now(&self, query: &str) {
        self.inner.search_timer.cancel();
        self.inner.suggestion_timer.cancel();
        {
            let mut state = self.inner.lock();
            state.snapshot.query = query.to_owned();
            state.suggestion_seq.supersede();
            state.abort_suggestions();
            state.snapshot.suggestions.clear();
        }
        Inner::start_search(&self.inner, query.to_owned());
    }

    /// Re-run a query picked from the recent-search list.
    pub fn select_recent(&self, query: &str) {
        self.search_now(query);
    }

    /// Reset to the initial state and notify observers with no results.
    pub fn clear(&self) {
        self.inner.search_timer.cancel();
        self.inner.suggestion_timer.cancel();
        {
            let mut state = self.inner.lock();
            state.search_seq.supersede();
            state.suggestion_seq.supersede();
            state.abort_search();
            state.abort_suggestions();
            let previous = std::mem::take(&mut state.snapshot);
            state.snapshot = SearchSnapshot {
                recent_searches: previous.recent_searches,
                completed_searches: previous.completed_searches,
                ..SearchSnapshot::default()
            };
            self.inner.publish(&state);
        }
        self.inner.notify(&[]);
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.inner.lock().snapshot.recent_searches.clone()
    }

    pub fn clear_recent_searches(&self) {
        if let Some(recent) = &self.inner.recent {
            if let Err(error) = recent.clear() {
                tracing::warn!(error = %error, "failed to clear recent searches");
            }
        }
        let mut state = self.inner.lock();
        state.snapshot.recent_searches.clear();
        self.inner.publish(&state);
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.updates.send_replace(state.snapshot.clone());
    }

    fn notify(&self, results: &[SearchResult]) {
        let observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer(results);
        }
    }

    fn below_threshold(&self, query: &str) -> bool {
        query.chars().count() < self.config.min_query_len
    }

    fn start_search(inner: &Arc<Self>, query: String) {
        let query = normalize_query(&query);
        let mut state = inner.lock();

        if inner.below_threshold(&query) {
            state.search_seq.supersede();
            state.abort_search();
            let snapshot = &mut state.snapshot;
            snapshot.debounced_query = query;
            snapshot.results.clear();
            snapshot.phase = SearchPhase::Idle;
            snapshot.loading = false;
            snapshot.error = None;
            snapshot.has_searched = false;
            inner.publish(&state);
            return;
        }

        let seq = state.search_seq.issue();
        state.abort_search();
        state.snapshot.debounced_query = query.clone();
        state.snapshot.phase = SearchPhase::Loading;
        state.snapshot.loading = true;
        state.snapshot.error = None;
        inner.publish(&state);
        tracing::debug!(seq, query = %query, "issuing search");

        let weak = Arc::downgrade(inner);
        let backend = Arc::clone(&inner.backend);
        let limit = inner.config.result_limit;
        let task = tokio::spawn(async move {
            let outcome = backend.search(query.clone(), limit).await;
            if let Some(inner) = weak.upgrade() {
                inner.finish_search(seq, &query, outcome);
            }
        });
        state.search_task = Some(task.abort_handle());
    }

    fn finish_search(&self, seq: u64, query: &str, outcome: Result<SearchResults, ApiError>) {
        let results = {
            let mut state = self.lock();
            if !state.search_seq.is_current(seq) {
                tracing::debug!(seq, query, "discarding superseded search response");
                return;
            }
            state.search_task = None;

            match outcome {
                Ok(found) => {
                    if !found.results.is_empty() {
                        if let Some(list) = self.remember(query) {
                            state.snapshot.recent_searches = list;
                        }
                    }
                    state.snapshot.results = found.results;
                    state.snapshot.phase = SearchPhase::Success;
                    state.snapshot.error = None;
                }
                Err(error) => {
                    tracing::warn!(query, kind = %error.kind(), error = %error, "search failed");
                    state.snapshot.results.clear();
                    state.snapshot.phase = SearchPhase::Error;
                    state.snapshot.error = Some(SearchFailure::from(&error));
                }
            }
            state.snapshot.loading = false;
            state.snapshot.has_searched = true;
            state.snapshot.completed_searches += 1;
            self.publish(&state);
            state.snapshot.results.clone()
        };

        self.notify(&results);
    }

    fn remember(&self, query: &str) -> Option<Vec<String>> {
        let recent = self.recent.as_ref()?;
        match recent.record(query) {
            Ok(list) => Some(list),
            Err(error) => {
                tracing::warn!(error = %error, "failed to persist recent search");
                Some(recent.list())
            }
        }
    }

    fn start_suggestions(inner: &Arc<Self>, query: String) {
        let query = normalize_query(&query);
        let mut state = inner.lock();

        if inner.below_threshold(&query) {
            state.suggestion_seq.supersede();
            state.abort_suggestions();
            if !state.snapshot.suggestions.is_empty() {
                state.snapshot.suggestions.clear();
                inner.publish(&state);
            }
            return;
        }

        let seq = state.suggestion_seq.issue();
        state.abort_suggestions();

        let weak = Arc::downgrade(inner);
        let backend = Arc::clone(&inner.backend);
        let limit = inner.config.suggestion_limit;
        let task = tokio::spawn(async move {
            let outcome = backend.suggest(query.clone(), limit).await;
            if let Some(inner) = weak.upgrade() {
                inner.finish_suggestions(seq, &query, outcome);
            }
        });
        state.suggestion_task = Some(task.abort_handle());
    }

    fn finish_suggestions(&self, seq: u64, query: &str, outcome: Result<Vec<Suggestion>, ApiError>) {
        let mut state = self.lock();
        if !state.suggestion_seq.is_current(seq) {
            return;
        }
        state.suggestion_task = None;

        state.snapshot.suggestions = match outcome {
            Ok(suggestions) => suggestions,
            Err(error) => {
                tracing::warn!(query, error = %error, "suggestion fetch failed");
                Vec::new()
            }
        };
        self.publish(&state);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.abort_search();
        state.abort_suggestions();
    }
}

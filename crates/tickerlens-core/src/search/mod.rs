//! # Debounced Search
//!
//! Coordinates keystrokes with two independently debounced fetches: a fast
//! suggestion lookup and a slower full search. Results are published as
//! [`SearchSnapshot`] values through a `tokio::sync::watch` channel.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SearchOrchestrator`] | Owns the search state machine |
//! | [`Debouncer`] | Single cancellable timer |
//! | [`SearchSequence`] | "Last issued wins" ordering guard |
//! | [`SearchBackend`] | Data source for search and suggestions |

mod debounce;
mod orchestrator;
mod state;

use std::future::Future;
use std::pin::Pin;

pub use debounce::Debouncer;
pub use orchestrator::SearchOrchestrator;
pub use state::{SearchConfig, SearchFailure, SearchPhase, SearchSequence, SearchSnapshot};

use crate::classify::ApiError;
use crate::domain::{SearchResults, Suggestion};

/// Source of search results and suggestions for the orchestrator.
pub trait SearchBackend: Send + Sync {
    fn search<'a>(
        &'a self,
        query: String,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<SearchResults, ApiError>> + Send + 'a>>;

    fn suggest<'a>(
        &'a self,
        query: String,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Suggestion>, ApiError>> + Send + 'a>>;
}

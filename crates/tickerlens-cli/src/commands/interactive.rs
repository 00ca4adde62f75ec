use std::sync::Arc;

use serde_json::json;
use tickerlens_core::{ApiClient, AppConfig, SearchOrchestrator, SearchPhase, SearchSnapshot};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::CliError;
use crate::output;

const HELP: &str =
    "type to search; !<query> searches now, :clear resets, :recent lists recent searches, :q quits";

pub async fn run(api: &ApiClient, config: &AppConfig, pretty: bool) -> Result<(), CliError> {
    let orchestrator = SearchOrchestrator::new(
        Arc::new(api.clone()),
        api.recent_store().cloned(),
        config.search.clone(),
    );
    let mut updates = orchestrator.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut rendered = orchestrator.snapshot().completed_searches;
    let mut last_suggestions = Vec::new();
    let mut input_closed = false;

    eprintln!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line(), if !input_closed => {
                match line? {
                    None => {
                        input_closed = true;
                        if is_settled(&orchestrator.snapshot()) {
                            break;
                        }
                    }
                    Some(line) => match line.trim() {
                        ":q" | ":quit" => break,
                        ":clear" => orchestrator.clear(),
                        ":recent" => output::render(
                            &json!({ "recent_searches": orchestrator.recent_searches() }),
                            pretty,
                        )?,
                        other => match other.strip_prefix('!') {
                            Some(query) => orchestrator.search_now(query),
                            None => orchestrator.set_query(&line),
                        },
                    },
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();

                if snapshot.suggestions != last_suggestions && !snapshot.suggestions.is_empty() {
                    let texts = snapshot
                        .suggestions
                        .iter()
                        .map(|suggestion| suggestion.text.as_str())
                        .collect::<Vec<_>>();
                    eprintln!("suggestions: {}", texts.join(" | "));
                }
                last_suggestions = snapshot.suggestions.clone();

                if has_new_completion(rendered, &snapshot) {
                    render_snapshot(&snapshot, pretty)?;
                    rendered = snapshot.completed_searches;
                }

                if input_closed && is_settled(&snapshot) {
                    break;
                }
            }
        }
    }

    Ok(())
}

// Updates coalesce in the watch channel, so completions are detected by
// counter rather than by phase transitions.
fn has_new_completion(rendered: u64, snapshot: &SearchSnapshot) -> bool {
    snapshot.completed_searches != rendered
        && matches!(snapshot.phase, SearchPhase::Success | SearchPhase::Error)
}

fn is_settled(snapshot: &SearchSnapshot) -> bool {
    !matches!(
        snapshot.phase,
        SearchPhase::AwaitingDebounce | SearchPhase::Loading
    )
}

fn render_snapshot(snapshot: &SearchSnapshot, pretty: bool) -> Result<(), CliError> {
    output::render(
        &json!({
            "query": snapshot.debounced_query,
            "phase": snapshot.phase,
            "results": snapshot.results,
            "error": snapshot.error,
            "recent_searches": snapshot.recent_searches,
        }),
        pretty,
    )
}

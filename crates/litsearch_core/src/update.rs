use crate::state::StatusTone;
use crate::table::export_projection;
use crate::{
    AppState, Effect, LogEntry, LogLevel, Msg, SearchEvent, SearchStatus, EXPORT_HEADERS,
    MAX_RESULTS_MAX, MAX_RESULTS_MIN,
};

/// Log text that makes the status line look like the search has started.
const STARTED_MARKERS: [&str; 2] = ["开始搜索", "search started"];
/// Log text that makes the status line look finished. Cosmetic only: the
/// collaborator also says "完成" after every processed record.
const COMPLETED_MARKERS: [&str; 2] = ["完成", "complete"];

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::KeywordChanged(keyword) => {
            if state.status() == SearchStatus::Ready {
                state.set_keyword_input(keyword);
            }
            Vec::new()
        }
        Msg::SearchSubmitted => {
            submit_search(&mut state);
            Vec::new()
        }
        Msg::MaxResultsChanged(raw) => {
            if state.status() == SearchStatus::Confirming {
                state.set_max_results_input(raw);
            }
            Vec::new()
        }
        Msg::FulltextToggled(enabled) => {
            if state.status() == SearchStatus::Confirming && state.set_enable_fulltext(enabled) {
                if enabled {
                    state.push_log(LogLevel::Info, "Full-text search enabled");
                } else {
                    state.push_log(LogLevel::Warning, "Full-text search disabled");
                }
            }
            Vec::new()
        }
        Msg::ConfirmClicked => confirm_search(&mut state),
        Msg::ConfirmCancelled => {
            if state.status() == SearchStatus::Confirming {
                state.close_confirmation();
            }
            Vec::new()
        }
        Msg::StopClicked => match state.stop_session() {
            Some((session_id, _)) => {
                state.push_log(LogLevel::Warning, "Search stopped by user");
                vec![Effect::CancelStream { session_id }]
            }
            None => Vec::new(),
        },
        Msg::RestartClicked => {
            if state.status().is_terminal() {
                state.reset();
                state.push_log(LogLevel::Info, "Ready for a new search");
            }
            Vec::new()
        }
        Msg::ExportClicked => request_export(&mut state),
        Msg::ExportFinished(result) => {
            match result {
                Ok(filename) => {
                    state.push_log(LogLevel::Success, format!("CSV exported: {filename}"))
                }
                Err(message) => {
                    state.push_log(LogLevel::Error, format!("CSV export failed: {message}"))
                }
            }
            Vec::new()
        }
        Msg::StreamEvent { session_id, event } => {
            if state.accepts(session_id) {
                apply_event(&mut state, event);
            }
            Vec::new()
        }
        Msg::StreamClosed { session_id } => {
            if state.accepts(session_id) {
                finish(&mut state);
            }
            Vec::new()
        }
        Msg::StreamFailed {
            session_id,
            message,
        } => {
            if state.accepts(session_id) && state.fail_session(&message).is_some() {
                state.push_log(LogLevel::Error, format!("Search request failed: {message}"));
            }
            Vec::new()
        }
        Msg::Tick { clock } => {
            state.set_clock(clock);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_search(state: &mut AppState) {
    if state.is_active() {
        state.push_log(
            LogLevel::Warning,
            "A search is already running; wait for it to finish",
        );
        return;
    }
    if state.status() != SearchStatus::Ready {
        return;
    }

    let keyword = state.keyword_input().trim().to_string();
    if keyword.is_empty() {
        state.push_log(LogLevel::Warning, "Please enter a search keyword");
        return;
    }

    state.push_log(
        LogLevel::Info,
        format!("Preparing to search keyword: \"{keyword}\""),
    );
    state.open_confirmation(keyword);
}

fn confirm_search(state: &mut AppState) -> Vec<Effect> {
    if state.status() != SearchStatus::Confirming || state.is_active() {
        return Vec::new();
    }
    let Some(max_results) = state.parsed_max_results() else {
        state.push_log(
            LogLevel::Error,
            format!("Enter a valid result count ({MAX_RESULTS_MIN}-{MAX_RESULTS_MAX})"),
        );
        return Vec::new();
    };

    let (session_id, params) = state.begin_session(max_results);
    state.push_log(
        LogLevel::Info,
        format!("Search keyword: \"{}\"", params.keyword),
    );
    state.push_log(LogLevel::Info, format!("Max results: {max_results}"));
    state.push_log(
        LogLevel::Info,
        format!(
            "Full-text search: {}",
            if params.enable_fulltext { "on" } else { "off" }
        ),
    );

    vec![Effect::OpenStream { session_id, params }]
}

fn apply_event(state: &mut AppState, event: SearchEvent) {
    match event {
        SearchEvent::Log(entry) => apply_log(state, entry),
        SearchEvent::Row(record) => state.append_row(&record),
        SearchEvent::End => finish(state),
        SearchEvent::Stopped => {
            if let Some((_, count)) = state.stop_session() {
                state.push_log(
                    LogLevel::Warning,
                    format!("Search stopped, {count} results received"),
                );
            }
        }
    }
}

fn apply_log(state: &mut AppState, entry: LogEntry) {
    let message = entry.message.to_lowercase();
    if STARTED_MARKERS.iter().any(|m| message.contains(m)) {
        state.set_status_line("Searching...", StatusTone::Busy);
    } else if COMPLETED_MARKERS.iter().any(|m| message.contains(m)) {
        state.set_status_line("Search complete", StatusTone::Success);
    }
    state.push_entry(entry);
}

fn finish(state: &mut AppState) {
    if let Some((_, count)) = state.complete_session() {
        state.push_log(
            LogLevel::Success,
            format!("Search complete, {count} results received"),
        );
    }
}

fn request_export(state: &mut AppState) -> Vec<Effect> {
    if state.rows().is_empty() {
        state.push_log(LogLevel::Warning, "No search results to export");
        return Vec::new();
    }

    let keyword = state
        .session()
        .map(|session| session.keyword.clone())
        .unwrap_or_default();
    vec![Effect::ExportCsv {
        keyword,
        headers: EXPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: export_projection(state.rows()),
    }]
}

use std::sync::Once;

use litsearch_core::{
    update, AppState, Effect, LogLevel, MaxResultsHint, Msg, SearchParams, SearchStatus,
    DEFAULT_MAX_RESULTS,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(search_logging::initialize_for_tests);
}

fn submit_keyword(state: AppState, keyword: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::KeywordChanged(keyword.to_string()));
    update(state, Msg::SearchSubmitted)
}

fn start_search(keyword: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = submit_keyword(AppState::new(), keyword);
    update(state, Msg::ConfirmClicked)
}

#[test]
fn empty_keyword_is_rejected_inline() {
    init_logging();
    let (mut state, effects) = submit_keyword(AppState::new(), "   ");
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.status, SearchStatus::Ready);
    assert_eq!(view.logs.len(), 1);
    assert_eq!(view.logs[0].level, LogLevel::Warning);
    assert!(state.consume_dirty());
}

#[test]
fn submit_opens_confirmation_with_trimmed_keyword() {
    init_logging();
    let (state, effects) = submit_keyword(AppState::new(), "  vitamin d  ");
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.status, SearchStatus::Confirming);
    let confirm = view.confirm.expect("confirmation open");
    assert_eq!(confirm.keyword, "vitamin d");
    assert_eq!(confirm.max_results_input, DEFAULT_MAX_RESULTS.to_string());
    assert!(confirm.max_results_valid);
    assert!(confirm.enable_fulltext);
}

#[test]
fn confirm_opens_stream_with_parameters() {
    init_logging();
    let (state, _) = submit_keyword(AppState::new(), "zinc");
    let (state, _) = update(state, Msg::MaxResultsChanged("35".to_string()));
    let (state, _) = update(state, Msg::FulltextToggled(false));
    let (state, effects) = update(state, Msg::ConfirmClicked);

    assert_eq!(
        effects,
        vec![Effect::OpenStream {
            session_id: 1,
            params: SearchParams {
                keyword: "zinc".to_string(),
                max_results: 35,
                enable_fulltext: false,
            },
        }]
    );
    let view = state.view();
    assert_eq!(view.status, SearchStatus::Running);
    assert!(view.confirm.is_none());
    assert!(view.can_stop);
    assert!(!view.can_restart);
    // Prior log is cleared; only the configuration lines remain.
    assert_eq!(view.logs.len(), 3);
    assert!(view.logs[0].message.contains("zinc"));
    assert!(view.logs[2].message.ends_with("off"));
}

#[test]
fn out_of_range_count_blocks_confirmation() {
    init_logging();
    for raw in ["0", "101", "abc", ""] {
        let (state, _) = submit_keyword(AppState::new(), "iron");
        let (state, _) = update(state, Msg::MaxResultsChanged(raw.to_string()));
        assert!(!state.view().confirm.unwrap().max_results_valid);

        let (state, effects) = update(state, Msg::ConfirmClicked);
        assert!(effects.is_empty(), "confirmed with {raw:?}");
        assert_eq!(state.view().status, SearchStatus::Confirming);
        assert_eq!(state.view().logs.last().unwrap().level, LogLevel::Error);
    }
}

#[test]
fn range_bounds_are_inclusive() {
    init_logging();
    for raw in ["1", "100"] {
        let (state, _) = submit_keyword(AppState::new(), "iron");
        let (state, _) = update(state, Msg::MaxResultsChanged(raw.to_string()));
        let (_, effects) = update(state, Msg::ConfirmClicked);
        assert_eq!(effects.len(), 1, "rejected {raw}");
    }
}

#[test]
fn hint_tracks_the_count_field() {
    init_logging();
    let (state, _) = submit_keyword(AppState::new(), "iron");
    let (state, _) = update(state, Msg::MaxResultsChanged("80".to_string()));
    assert_eq!(state.view().confirm.unwrap().hint, MaxResultsHint::Many);
}

#[test]
fn cancel_returns_to_ready() {
    init_logging();
    let (state, _) = submit_keyword(AppState::new(), "iron");
    let (state, effects) = update(state, Msg::ConfirmCancelled);

    assert!(effects.is_empty());
    assert_eq!(state.view().status, SearchStatus::Ready);
    assert!(state.session().is_none());
}

#[test]
fn start_while_active_is_rejected() {
    init_logging();
    let (state, _) = start_search("magnesium");
    let session_before = state.session().cloned();

    let (state, effects) = update(state, Msg::SearchSubmitted);
    assert!(effects.is_empty());
    assert_eq!(state.view().status, SearchStatus::Running);
    assert_eq!(state.session().cloned(), session_before);

    let (state, effects) = update(state, Msg::ConfirmClicked);
    assert!(effects.is_empty());
    assert_eq!(state.session().cloned(), session_before);
    assert_eq!(state.view().logs.last().unwrap().level, LogLevel::Warning);
}

#[test]
fn stop_cancels_active_stream() {
    init_logging();
    let (state, _) = start_search("magnesium");
    let (state, effects) = update(state, Msg::StopClicked);

    assert_eq!(effects, vec![Effect::CancelStream { session_id: 1 }]);
    let view = state.view();
    assert_eq!(view.status, SearchStatus::Stopped);
    assert!(!view.can_stop);
    assert!(view.can_restart);
    assert_eq!(view.logs.last().unwrap().level, LogLevel::Warning);
    assert!(!state.is_active());
}

#[test]
fn stop_on_inactive_session_is_noop() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::StopClicked);
    assert_eq!(next, state);
    assert!(effects.is_empty());

    let (mut stopped, _) = start_search("magnesium");
    let (s, _) = update(stopped, Msg::StopClicked);
    stopped = s;
    stopped.consume_dirty();
    let (next, effects) = update(stopped.clone(), Msg::StopClicked);
    assert_eq!(next, stopped);
    assert!(effects.is_empty());
}

#[test]
fn restart_resets_inputs_and_screen() {
    init_logging();
    let (state, _) = submit_keyword(AppState::new(), "iron");
    let (state, _) = update(state, Msg::MaxResultsChanged("5".to_string()));
    let (state, _) = update(state, Msg::FulltextToggled(false));
    let (state, _) = update(state, Msg::ConfirmClicked);
    let (state, _) = update(state, Msg::StopClicked);
    let (state, effects) = update(state, Msg::RestartClicked);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.status, SearchStatus::Ready);
    assert_eq!(view.keyword_input, "");
    assert!(view.rows.is_empty());
    assert_eq!(view.logs.len(), 1);
    assert_eq!(view.result_count, 0);
    assert!(state.session().is_none());

    // Defaults come back for the next confirmation.
    let (state, _) = submit_keyword(state, "zinc");
    let confirm = state.view().confirm.unwrap();
    assert_eq!(confirm.max_results_input, "20");
    assert!(confirm.enable_fulltext);
}

#[test]
fn restart_is_ignored_while_running() {
    init_logging();
    let (state, _) = start_search("iron");
    let (next, effects) = update(state.clone(), Msg::RestartClicked);
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn new_session_gets_fresh_id() {
    init_logging();
    let (state, _) = start_search("iron");
    let (state, _) = update(state, Msg::StopClicked);
    let (state, _) = update(state, Msg::RestartClicked);
    let (state, _) = submit_keyword(state, "zinc");
    let (_, effects) = update(state, Msg::ConfirmClicked);

    assert!(matches!(
        effects.as_slice(),
        [Effect::OpenStream { session_id: 2, .. }]
    ));
}

#[test]
fn local_log_lines_use_tick_clock() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::Tick {
            clock: "09:15:02".to_string(),
        },
    );
    let (state, _) = submit_keyword(state, "iron");
    assert_eq!(state.view().logs[0].timestamp, "09:15:02");
}

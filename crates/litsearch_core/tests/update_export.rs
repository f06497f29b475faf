use litsearch_core::{
    update, AppState, Effect, LogLevel, Msg, ResultRecord, SearchEvent, EXPORT_HEADERS,
    PLACEHOLDER,
};
use pretty_assertions::assert_eq;

fn running(keyword: &str) -> AppState {
    let (state, _) = update(AppState::new(), Msg::KeywordChanged(keyword.to_string()));
    let (state, _) = update(state, Msg::SearchSubmitted);
    let (state, _) = update(state, Msg::ConfirmClicked);
    state
}

#[test]
fn export_without_rows_is_refused() {
    let state = running("zinc");
    let (state, effects) = update(state, Msg::ExportClicked);

    assert!(effects.is_empty());
    assert!(!state.view().export_enabled);
    let last = state.view().logs.last().cloned().unwrap();
    assert_eq!(last.level, LogLevel::Warning);
}

#[test]
fn export_on_fresh_state_is_refused() {
    let (_, effects) = update(AppState::new(), Msg::ExportClicked);
    assert!(effects.is_empty());
}

#[test]
fn export_reads_rendered_table() {
    let state = running("vitamin d");
    let record = ResultRecord::new()
        .with_field("发表年份", "2021")
        .with_field("国家", "Japan")
        .with_field("标题", "Effects of D3, a \"trial\"")
        .with_field("翻译标题", "维生素D3的作用")
        .with_field("PMID", "34567890")
        .with_field("免费全文状态", "可用");
    let (state, _) = update(
        state,
        Msg::StreamEvent {
            session_id: 1,
            event: SearchEvent::Row(record),
        },
    );
    let (_, effects) = update(state, Msg::ExportClicked);

    let [Effect::ExportCsv {
        keyword,
        headers,
        rows,
    }] = effects.as_slice()
    else {
        panic!("expected one export effect, got {effects:?}");
    };
    assert_eq!(keyword, "vitamin d");
    assert_eq!(headers.len(), EXPORT_HEADERS.len());
    assert_eq!(
        rows[0],
        vec![
            "2021",
            PLACEHOLDER,
            "Japan",
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            "Effects of D3, a \"trial\"",
            "34567890",
            "免费",
        ]
    );
}

#[test]
fn export_result_is_logged() {
    let state = running("zinc");
    let (state, _) = update(
        state,
        Msg::ExportFinished(Ok("literature_results_zinc.csv".to_string())),
    );
    let (state, _) = update(state, Msg::ExportFinished(Err("disk full".to_string())));

    let logs = state.view().logs;
    let tail = &logs[logs.len() - 2..];
    assert_eq!(tail[0].level, LogLevel::Success);
    assert!(tail[0].message.contains("literature_results_zinc.csv"));
    assert_eq!(tail[1].level, LogLevel::Error);
}

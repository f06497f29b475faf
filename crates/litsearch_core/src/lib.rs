//! Litsearch core: pure search-session state machine and view-model helpers.
mod effect;
mod msg;
mod record;
mod state;
mod table;
mod update;
mod view_model;

pub use effect::{Effect, SearchParams};
pub use msg::Msg;
pub use record::{LogEntry, LogLevel, ResultRecord, SearchEvent};
pub use state::{
    AppState, SearchStatus, Session, SessionId, StatusLine, StatusTone, DEFAULT_MAX_RESULTS,
    MAX_RESULTS_MAX, MAX_RESULTS_MIN,
};
pub use table::{
    render_row, RenderedRow, EXPORT_HEADERS, FULLTEXT_FREE, FULLTEXT_PAID, PLACEHOLDER,
    TABLE_HEADERS,
};
pub use update::update;
pub use view_model::{AppViewModel, ConfirmView, MaxResultsHint};

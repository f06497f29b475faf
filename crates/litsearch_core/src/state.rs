use crate::table::{render_row, RenderedRow};
use crate::view_model::{AppViewModel, ConfirmView, MaxResultsHint};
use crate::{LogEntry, LogLevel, ResultRecord, SearchParams};

pub const MAX_RESULTS_MIN: u32 = 1;
pub const MAX_RESULTS_MAX: u32 = 100;
pub const DEFAULT_MAX_RESULTS: u32 = 20;

pub type SessionId = u64;

/// Authoritative search status. Only explicit events and transport outcomes
/// move it; log text never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Ready,
    Confirming,
    Running,
    Completed,
    Stopped,
    Error,
}

impl SearchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SearchStatus::Completed | SearchStatus::Stopped | SearchStatus::Error
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Success,
    Failure,
}

/// Human-facing status indicator. Cosmetic: may run ahead of `SearchStatus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub tone: StatusTone,
}

impl StatusLine {
    fn new(text: impl Into<String>, tone: StatusTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn ready() -> Self {
        Self::new("Ready", StatusTone::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub keyword: String,
    pub max_results: u32,
    pub enable_fulltext: bool,
    pub result_count: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    status: SearchStatus,
    status_line: StatusLine,
    keyword_input: String,
    pending_keyword: String,
    max_results_input: String,
    enable_fulltext: bool,
    session: Option<Session>,
    next_session_id: SessionId,
    logs: Vec<LogEntry>,
    rows: Vec<RenderedRow>,
    clock: String,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            status: SearchStatus::Ready,
            status_line: StatusLine::ready(),
            keyword_input: String::new(),
            pending_keyword: String::new(),
            max_results_input: DEFAULT_MAX_RESULTS.to_string(),
            enable_fulltext: true,
            session: None,
            next_session_id: 1,
            logs: Vec::new(),
            rows: Vec::new(),
            clock: String::new(),
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a prefilled keyword and confirmation parameters.
    pub fn with_inputs(keyword: &str, max_results: u32, enable_fulltext: bool) -> Self {
        Self {
            keyword_input: keyword.to_string(),
            max_results_input: max_results.to_string(),
            enable_fulltext,
            ..Self::default()
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.active)
    }

    pub fn view(&self) -> AppViewModel {
        let confirm = (self.status == SearchStatus::Confirming).then(|| ConfirmView {
            keyword: self.pending_keyword.clone(),
            max_results_input: self.max_results_input.clone(),
            max_results_valid: self.parsed_max_results().is_some(),
            hint: MaxResultsHint::for_input(&self.max_results_input),
            enable_fulltext: self.enable_fulltext,
        });

        AppViewModel {
            status: self.status,
            status_line: self.status_line.clone(),
            keyword_input: self.keyword_input.clone(),
            confirm,
            result_count: self.session.as_ref().map_or(0, |s| s.result_count),
            logs: self.logs.clone(),
            rows: self.rows.clone(),
            can_stop: self.is_active(),
            can_restart: self.status.is_terminal(),
            export_enabled: !self.rows.is_empty(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_clock(&mut self, clock: String) {
        self.clock = clock;
    }

    pub(crate) fn set_keyword_input(&mut self, keyword: String) {
        self.keyword_input = keyword;
        self.mark_dirty();
    }

    pub(crate) fn keyword_input(&self) -> &str {
        &self.keyword_input
    }

    pub(crate) fn set_max_results_input(&mut self, raw: String) {
        self.max_results_input = raw;
        self.mark_dirty();
    }

    /// Returns true when the flag actually changed.
    pub(crate) fn set_enable_fulltext(&mut self, enabled: bool) -> bool {
        if self.enable_fulltext == enabled {
            return false;
        }
        self.enable_fulltext = enabled;
        self.mark_dirty();
        true
    }

    pub(crate) fn parsed_max_results(&self) -> Option<u32> {
        self.max_results_input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| (MAX_RESULTS_MIN..=MAX_RESULTS_MAX).contains(n))
    }

    pub(crate) fn open_confirmation(&mut self, keyword: String) {
        self.pending_keyword = keyword;
        self.status = SearchStatus::Confirming;
        self.mark_dirty();
    }

    pub(crate) fn close_confirmation(&mut self) {
        self.pending_keyword.clear();
        self.status = SearchStatus::Ready;
        self.mark_dirty();
    }

    /// Opens a new session from the confirmed parameters and clears the
    /// previous results and log.
    pub(crate) fn begin_session(&mut self, max_results: u32) -> (SessionId, SearchParams) {
        let id = self.next_session_id;
        self.next_session_id += 1;

        let keyword = std::mem::take(&mut self.pending_keyword);
        self.logs.clear();
        self.rows.clear();
        self.session = Some(Session {
            id,
            keyword: keyword.clone(),
            max_results,
            enable_fulltext: self.enable_fulltext,
            result_count: 0,
            active: true,
        });
        self.status = SearchStatus::Running;
        self.status_line = StatusLine::new("Initializing...", StatusTone::Busy);
        self.mark_dirty();

        let params = SearchParams {
            keyword,
            max_results,
            enable_fulltext: self.enable_fulltext,
        };
        (id, params)
    }

    /// True when `session_id` names the session that is currently streaming.
    pub(crate) fn accepts(&self, session_id: SessionId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.active && s.id == session_id)
    }

    /// Ends the active session in `status`. Returns the session id and the
    /// number of rows received, or `None` when nothing was active.
    pub(crate) fn end_session(
        &mut self,
        status: SearchStatus,
        line: StatusLine,
    ) -> Option<(SessionId, usize)> {
        let session = self.session.as_mut().filter(|s| s.active)?;
        session.active = false;
        let ended = (session.id, session.result_count);
        self.status = status;
        self.status_line = line;
        self.mark_dirty();
        Some(ended)
    }

    pub(crate) fn complete_session(&mut self) -> Option<(SessionId, usize)> {
        self.end_session(
            SearchStatus::Completed,
            StatusLine::new("Search complete", StatusTone::Success),
        )
    }

    pub(crate) fn stop_session(&mut self) -> Option<(SessionId, usize)> {
        self.end_session(
            SearchStatus::Stopped,
            StatusLine::new("Search stopped", StatusTone::Failure),
        )
    }

    pub(crate) fn fail_session(&mut self, message: &str) -> Option<(SessionId, usize)> {
        self.end_session(
            SearchStatus::Error,
            StatusLine::new(format!("Search failed: {message}"), StatusTone::Failure),
        )
    }

    pub(crate) fn append_row(&mut self, record: &ResultRecord) {
        self.rows.push(render_row(record));
        if let Some(session) = self.session.as_mut() {
            session.result_count += 1;
        }
        self.mark_dirty();
    }

    pub(crate) fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub(crate) fn push_log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.push_entry(LogEntry::new(level, message));
    }

    pub(crate) fn push_entry(&mut self, mut entry: LogEntry) {
        if entry.timestamp.trim().is_empty() {
            entry.timestamp = self.clock.clone();
        }
        self.logs.push(entry);
        self.mark_dirty();
    }

    pub(crate) fn set_status_line(&mut self, text: &str, tone: StatusTone) {
        if self.status_line.text != text || self.status_line.tone != tone {
            self.status_line = StatusLine::new(text, tone);
            self.mark_dirty();
        }
    }

    /// Back to the pre-search screen with default inputs.
    pub(crate) fn reset(&mut self) {
        let next_session_id = self.next_session_id;
        let clock = std::mem::take(&mut self.clock);
        *self = Self {
            next_session_id,
            clock,
            ..Self::default()
        };
        self.mark_dirty();
    }
}

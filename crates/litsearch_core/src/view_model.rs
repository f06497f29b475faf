use crate::{LogEntry, RenderedRow, SearchStatus, StatusLine};

/// Advice shown under the result-count field while confirming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxResultsHint {
    Invalid,
    Few,
    Recommended,
    Many,
}

impl MaxResultsHint {
    pub fn for_input(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Err(_) => MaxResultsHint::Invalid,
            Ok(n) if n < 10 => MaxResultsHint::Few,
            Ok(n) if n > 50 => MaxResultsHint::Many,
            Ok(_) => MaxResultsHint::Recommended,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            MaxResultsHint::Invalid => "Enter a valid number",
            MaxResultsHint::Few => "Few results; the analysis may be less complete",
            MaxResultsHint::Many => "Many results; the search may take a while",
            MaxResultsHint::Recommended => "Recommended range",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmView {
    pub keyword: String,
    pub max_results_input: String,
    pub max_results_valid: bool,
    pub hint: MaxResultsHint,
    pub enable_fulltext: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub status: SearchStatus,
    pub status_line: StatusLine,
    pub keyword_input: String,
    /// Present while the confirmation step is open.
    pub confirm: Option<ConfirmView>,
    pub result_count: usize,
    pub logs: Vec<LogEntry>,
    pub rows: Vec<RenderedRow>,
    pub can_stop: bool,
    pub can_restart: bool,
    pub export_enabled: bool,
    pub dirty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_follows_thresholds() {
        assert_eq!(MaxResultsHint::for_input("abc"), MaxResultsHint::Invalid);
        assert_eq!(MaxResultsHint::for_input("5"), MaxResultsHint::Few);
        assert_eq!(MaxResultsHint::for_input(" 20 "), MaxResultsHint::Recommended);
        assert_eq!(MaxResultsHint::for_input("50"), MaxResultsHint::Recommended);
        assert_eq!(MaxResultsHint::for_input("51"), MaxResultsHint::Many);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the keyword field.
    KeywordChanged(String),
    /// User submitted the keyword; opens the confirmation step.
    SearchSubmitted,
    /// User edited the result-count field in the confirmation step.
    MaxResultsChanged(String),
    /// User toggled full-text extraction in the confirmation step.
    FulltextToggled(bool),
    /// User confirmed the search parameters.
    ConfirmClicked,
    /// User dismissed the confirmation step.
    ConfirmCancelled,
    /// User clicked Stop.
    StopClicked,
    /// User clicked Restart after a finished search.
    RestartClicked,
    /// User asked for a CSV export of the table.
    ExportClicked,
    /// Export effect finished; `Ok` carries the path of the written file.
    ExportFinished(Result<String, String>),
    /// One decoded event from the collaborator's stream.
    StreamEvent {
        session_id: crate::SessionId,
        event: crate::SearchEvent,
    },
    /// The transport reported end of body.
    StreamClosed { session_id: crate::SessionId },
    /// The transport failed (HTTP status or network).
    StreamFailed {
        session_id: crate::SessionId,
        message: String,
    },
    /// UI tick carrying the wall-clock label used to stamp local log lines.
    Tick { clock: String },
    /// Fallback for placeholder wiring.
    NoOp,
}

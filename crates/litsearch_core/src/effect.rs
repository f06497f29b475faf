use crate::SessionId;

/// Parameters sent to the collaborator when a stream is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub keyword: String,
    pub max_results: u32,
    pub enable_fulltext: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenStream {
        session_id: SessionId,
        params: SearchParams,
    },
    CancelStream {
        session_id: SessionId,
    },
    /// Write the rendered table; `rows` is already projected onto `headers`.
    ExportCsv {
        keyword: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

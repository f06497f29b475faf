use std::collections::BTreeMap;
use std::fmt;

pub type SessionId = u64;

/// Log record as sent by the collaborator. `level` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

/// One event-bearing line of the collaborator's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRecord {
    Log(LogRecord),
    Row(BTreeMap<String, String>),
    End,
    Stopped { message: Option<String> },
    /// The collaborator's generator failed; the stream usually closes next.
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamSummary {
    pub bytes: u64,
    pub records: usize,
    pub malformed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Record {
        session_id: SessionId,
        record: StreamRecord,
    },
    StreamFinished {
        session_id: SessionId,
        result: Result<StreamSummary, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "stream cancelled")
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == FailureKind::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Network,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

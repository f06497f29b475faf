use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

impl LogLevel {
    /// Maps the collaborator's level string. Unknown levels read as info.
    pub fn from_wire(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "warning" | "warn" => LogLevel::Warning,
            "error" | "danger" => LogLevel::Error,
            "success" => LogLevel::Success,
            _ => LogLevel::Info,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Empty when the producer did not stamp the entry; the state machine
    /// fills it with the current clock label.
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: String::new(),
            level,
            message: message.into(),
        }
    }
}

/// One literature record as an open mapping of field name to display text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultRecord {
    fields: BTreeMap<String, String>,
}

impl ResultRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns the field text, treating blank values as missing.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for ResultRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Event decoded from the collaborator's stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Log(LogEntry),
    Row(ResultRecord),
    End,
    Stopped,
}

//! Incremental decoding of the collaborator's line-oriented event stream.
//!
//! Chunk boundaries are arbitrary: they can fall inside a line and inside a
//! multi-byte character. Bytes go through a streaming UTF-8 decoder, and the
//! text after the last newline is held back until the next chunk (or
//! [`StreamDecoder::finish`]) completes it.

use std::collections::BTreeMap;

use encoding_rs::{CoderResult, Decoder, UTF_8};
use serde::Deserialize;
use serde_json::Value;

use crate::{LogRecord, StreamRecord};

/// Marker that identifies event-bearing lines.
pub const RECORD_PREFIX: &str = "data:";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Json(String),
    #[error("record type {kind:?} has no content")]
    MissingContent { kind: String },
    #[error("record type {kind:?} has unusable content")]
    InvalidContent { kind: String },
    #[error("unknown record type {0:?}")]
    UnknownType(String),
}

pub type DecodedRecord = Result<StreamRecord, DecodeError>;

pub struct StreamDecoder {
    text: Decoder,
    pending: String,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            text: UTF_8.new_decoder(),
            pending: String::new(),
        }
    }

    /// Feeds one transport chunk and returns the records of every line it
    /// completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<DecodedRecord> {
        self.decode_text(chunk, false);

        let Some(last_newline) = self.pending.rfind('\n') else {
            return Vec::new();
        };
        let remainder = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, remainder);
        complete.lines().filter_map(parse_line).collect()
    }

    /// Flushes the decoder at end of body. An unterminated last line is
    /// parsed like any other line.
    pub fn finish(&mut self) -> Vec<DecodedRecord> {
        self.decode_text(&[], true);
        self.text = UTF_8.new_decoder();
        let rest = std::mem::take(&mut self.pending);
        rest.lines().filter_map(parse_line).collect()
    }

    /// Bytes still waiting for a newline.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    fn decode_text(&mut self, mut bytes: &[u8], last: bool) {
        loop {
            if let Some(needed) = self.text.max_utf8_buffer_length(bytes.len()) {
                self.pending.reserve(needed);
            }
            let (result, read, _had_errors) =
                self.text.decode_to_string(bytes, &mut self.pending, last);
            bytes = &bytes[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }
}

/// Returns `None` for lines that carry no record.
pub fn parse_line(line: &str) -> Option<DecodedRecord> {
    let payload = line.trim().strip_prefix(RECORD_PREFIX)?;
    Some(parse_payload(payload.trim_start()))
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Option<Value>,
}

#[derive(Deserialize)]
struct RawLog {
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    level: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Default)]
struct RawMessage {
    #[serde(default)]
    message: Option<String>,
}

pub fn parse_payload(payload: &str) -> DecodedRecord {
    let raw: RawRecord =
        serde_json::from_str(payload).map_err(|err| DecodeError::Json(err.to_string()))?;

    match raw.kind.as_str() {
        "log" => {
            let content = require_content(&raw)?;
            let log: RawLog = serde_json::from_value(content).map_err(|_| {
                DecodeError::InvalidContent {
                    kind: raw.kind.clone(),
                }
            })?;
            Ok(StreamRecord::Log(LogRecord {
                timestamp: log.timestamp,
                level: log.level,
                message: log.message,
            }))
        }
        "row" => match require_content(&raw)? {
            Value::Object(fields) => Ok(StreamRecord::Row(
                fields
                    .iter()
                    .filter_map(|(name, value)| Some((name.clone(), value_text(value)?)))
                    .collect::<BTreeMap<_, _>>(),
            )),
            _ => Err(DecodeError::InvalidContent { kind: raw.kind }),
        },
        "end" => Ok(StreamRecord::End),
        "stopped" => Ok(StreamRecord::Stopped {
            message: optional_message(raw.content),
        }),
        "error" => Ok(StreamRecord::Failed {
            message: optional_message(raw.content).unwrap_or_default(),
        }),
        _ => Err(DecodeError::UnknownType(raw.kind)),
    }
}

fn require_content(raw: &RawRecord) -> Result<Value, DecodeError> {
    match &raw.content {
        Some(content) if !content.is_null() => Ok(content.clone()),
        _ => Err(DecodeError::MissingContent {
            kind: raw.kind.clone(),
        }),
    }
}

fn optional_message(content: Option<Value>) -> Option<String> {
    content
        .and_then(|value| serde_json::from_value::<RawMessage>(value).ok())
        .unwrap_or_default()
        .message
}

/// Display text of a row field; `null` counts as missing.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_text)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

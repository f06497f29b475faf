//! Litsearch engine: stream consumption, effect execution and file output.
mod decode;
mod engine;
mod export;
mod fetch;
mod filename;
mod persist;
mod types;

pub use decode::{
    parse_line, parse_payload, DecodeError, DecodedRecord, StreamDecoder, RECORD_PREFIX,
};
pub use engine::EngineHandle;
pub use export::{
    clean_cell, encode_csv, export_csv, ExportError, ExportRequest, ExportSummary, UTF8_BOM,
};
pub use fetch::{
    search_url, ChannelEventSink, EventSink, ReqwestStreamer, SearchRequest, SearchStreamer,
    StreamSettings,
};
pub use filename::export_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    EngineEvent, FailureKind, FetchError, LogRecord, SessionId, StreamRecord, StreamSummary,
};
pub use tokio_util::sync::CancellationToken;

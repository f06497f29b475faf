use std::time::Duration;

use futures_util::StreamExt;
use search_logging::{search_debug, search_info, search_warn, STREAM_TARGET};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::decode::{DecodedRecord, StreamDecoder};
use crate::{EngineEvent, FailureKind, FetchError, SessionId, StreamSummary};

#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Streaming search endpoint (GET).
    pub endpoint: String,
    /// Optional endpoint told about user stops (POST), so the collaborator
    /// can stop its own work.
    pub stop_endpoint: Option<String>,
    pub connect_timeout: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5001/stream_search".to_string(),
            stop_endpoint: Some("http://localhost:5001/stop_search".to_string()),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    pub max_results: u32,
    pub enable_fulltext: bool,
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait SearchStreamer: Send + Sync {
    /// Streams one search, emitting a `Record` event per decoded line until
    /// the body ends, the transport fails or `cancel` fires.
    async fn stream(
        &self,
        session_id: SessionId,
        request: &SearchRequest,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, FetchError>;

    /// Tells the collaborator that the user stopped the search.
    async fn notify_stop(&self) -> Result<(), FetchError>;
}

/// Builds the GET url with the search parameters as query pairs.
pub fn search_url(endpoint: &str, request: &SearchRequest) -> Result<Url, FetchError> {
    Url::parse_with_params(
        endpoint,
        [
            ("keyword", request.keyword.clone()),
            ("max_results", request.max_results.to_string()),
            ("enable_fulltext", request.enable_fulltext.to_string()),
        ],
    )
    .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
}

#[derive(Debug, Clone)]
pub struct ReqwestStreamer {
    settings: StreamSettings,
}

impl ReqwestStreamer {
    pub fn new(settings: StreamSettings) -> Self {
        Self { settings }
    }

    // No overall request timeout: a search legitimately streams for minutes.
    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl SearchStreamer for ReqwestStreamer {
    async fn stream(
        &self,
        session_id: SessionId,
        request: &SearchRequest,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, FetchError> {
        let url = search_url(&self.settings.endpoint, request)?;
        let client = self.build_client()?;
        search_info!("session {} GET {}", session_id, url);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::cancelled()),
            response = client.get(url).send() => response.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let mut decoder = StreamDecoder::new();
        let mut summary = StreamSummary::default();
        let mut body = response.bytes_stream();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::cancelled()),
                next = body.next() => next,
            };
            let Some(chunk) = next else {
                break;
            };
            let chunk = chunk.map_err(map_reqwest_error)?;
            summary.bytes += chunk.len() as u64;
            let records = decoder.push(&chunk);
            dispatch(session_id, records, sink, cancel, &mut summary)?;
        }
        dispatch(session_id, decoder.finish(), sink, cancel, &mut summary)?;

        search_debug!(
            "session {} body closed: {} bytes, {} records, {} malformed",
            session_id,
            summary.bytes,
            summary.records,
            summary.malformed
        );
        Ok(summary)
    }

    async fn notify_stop(&self) -> Result<(), FetchError> {
        let Some(endpoint) = self.settings.stop_endpoint.as_deref() else {
            return Ok(());
        };
        let url = Url::parse(endpoint)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self
            .build_client()?
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }
}

/// Emits decoded records in order. Stops at the first record found after
/// cancellation; malformed records are logged and skipped.
fn dispatch(
    session_id: SessionId,
    records: Vec<DecodedRecord>,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
    summary: &mut StreamSummary,
) -> Result<(), FetchError> {
    for decoded in records {
        if cancel.is_cancelled() {
            return Err(FetchError::cancelled());
        }
        match decoded {
            Ok(record) => {
                summary.records += 1;
                sink.emit(EngineEvent::Record { session_id, record });
            }
            Err(err) => {
                summary.malformed += 1;
                search_warn!(
                    target: STREAM_TARGET,
                    "session {}: skipping record: {}",
                    session_id,
                    err
                );
            }
        }
    }
    Ok(())
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    FetchError::new(FailureKind::Network, err.to_string())
}

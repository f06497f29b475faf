use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use litsearch_core::{Effect, LogEntry, LogLevel, Msg, ResultRecord, SearchEvent};
use litsearch_engine::{
    export_csv, EngineEvent, EngineHandle, ExportRequest, SearchRequest, StreamRecord,
    StreamSettings,
};
use search_logging::{search_error, search_info, search_warn};

/// File-name timestamp for exports.
const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Runs core effects against the engine and feeds engine events back as
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
    export_dir: PathBuf,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(settings: StreamSettings, export_dir: PathBuf, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self {
            engine: EngineHandle::new(settings),
            export_dir,
            msg_tx,
        };
        runner.spawn_event_loop();
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenStream { session_id, params } => {
                    search_info!(
                        "OpenStream session_id={} keyword={:?} max_results={} fulltext={}",
                        session_id,
                        params.keyword,
                        params.max_results,
                        params.enable_fulltext
                    );
                    self.engine.open(
                        session_id,
                        SearchRequest {
                            keyword: params.keyword,
                            max_results: params.max_results,
                            enable_fulltext: params.enable_fulltext,
                        },
                    );
                }
                Effect::CancelStream { session_id } => {
                    search_info!("CancelStream session_id={}", session_id);
                    self.engine.cancel(session_id);
                }
                Effect::ExportCsv {
                    keyword,
                    headers,
                    rows,
                } => {
                    let request = ExportRequest {
                        keyword,
                        timestamp: Local::now().format(EXPORT_TIMESTAMP_FORMAT).to_string(),
                        headers,
                        rows,
                    };
                    self.spawn_export(request);
                }
            }
        }
    }

    /// Runs the effects of quitting. Stream cancellations wait up to `grace`
    /// for the stop notification to reach the collaborator.
    pub fn enqueue_at_exit(&self, effects: Vec<Effect>, grace: Duration) {
        for effect in effects {
            match effect {
                Effect::CancelStream { session_id } => {
                    search_info!("CancelStream session_id={} (exit)", session_id);
                    if !self.engine.cancel_and_wait(session_id, grace) {
                        search_warn!("stop notification for session {} not confirmed", session_id);
                    }
                }
                other => self.enqueue(vec![other]),
            }
        }
    }

    /// Writes the export off the calling thread and reports the outcome as
    /// `Msg::ExportFinished`.
    fn spawn_export(&self, request: ExportRequest) {
        let export_dir = self.export_dir.clone();
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || {
            let outcome = match export_csv(&export_dir, &request) {
                Ok(summary) => Ok(summary.path.display().to_string()),
                Err(err) => {
                    search_error!("export failed: {}", err);
                    Err(err.to_string())
                }
            };
            let _ = msg_tx.send(Msg::ExportFinished(outcome));
        });
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.try_recv() else {
                thread::sleep(Duration::from_millis(20));
                continue;
            };
            if let Some(msg) = engine_event_to_msg(event) {
                if msg_tx.send(msg).is_err() {
                    break;
                }
            }
        });
    }
}

/// Translates one engine event. Cancelled streams yield nothing: the core
/// already ended the session when the user stopped it.
pub(crate) fn engine_event_to_msg(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Record { session_id, record } => {
            let event = match record {
                StreamRecord::Log(log) => SearchEvent::Log(LogEntry {
                    timestamp: log.timestamp,
                    level: LogLevel::from_wire(&log.level),
                    message: log.message,
                }),
                StreamRecord::Row(fields) => {
                    SearchEvent::Row(fields.into_iter().collect::<ResultRecord>())
                }
                StreamRecord::End => SearchEvent::End,
                StreamRecord::Stopped { message } => {
                    if let Some(message) = message {
                        search_info!(
                            "session {} stopped by collaborator: {}",
                            session_id,
                            message
                        );
                    }
                    SearchEvent::Stopped
                }
                StreamRecord::Failed { message } => {
                    SearchEvent::Log(LogEntry::new(LogLevel::Error, message))
                }
            };
            Some(Msg::StreamEvent { session_id, event })
        }
        EngineEvent::StreamFinished { session_id, result } => match result {
            Ok(_) => Some(Msg::StreamClosed { session_id }),
            Err(err) if err.is_cancelled() => None,
            Err(err) => Some(Msg::StreamFailed {
                session_id,
                message: err.to_string(),
            }),
        },
    }
}

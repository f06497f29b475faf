use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use search_logging::{search_error, search_info, search_warn};
use tokio_util::sync::CancellationToken;

use crate::fetch::{
    ChannelEventSink, ReqwestStreamer, SearchRequest, SearchStreamer, StreamSettings,
};
use crate::{EngineEvent, SessionId};

enum EngineCommand {
    Open {
        session_id: SessionId,
        request: SearchRequest,
    },
    Cancel {
        session_id: SessionId,
        ack: Option<mpsc::Sender<()>>,
    },
}

/// The one stream still running, if any. Cleared by the stream task when it
/// ends so a late cancel finds nothing to stop.
type OpenSlot = Arc<Mutex<Option<(SessionId, CancellationToken)>>>;

fn lock_slot(slot: &OpenSlot) -> MutexGuard<'_, Option<(SessionId, CancellationToken)>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn take_if_open(slot: &OpenSlot, session_id: SessionId) -> Option<CancellationToken> {
    let mut open = lock_slot(slot);
    match open.take() {
        Some((open_id, token)) if open_id == session_id => Some(token),
        other => {
            *open = other;
            None
        }
    }
}

/// Handle to the engine thread. The thread owns the async runtime and the
/// cancellation token of the one open stream.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: StreamSettings) -> Self {
        Self::with_streamer(Arc::new(ReqwestStreamer::new(settings)))
    }

    pub fn with_streamer(streamer: Arc<dyn SearchStreamer>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    search_error!("failed to start engine runtime: {}", err);
                    return;
                }
            };

            let open: OpenSlot = Arc::default();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Open {
                        session_id,
                        request,
                    } => {
                        let token = CancellationToken::new();
                        let previous = lock_slot(&open).replace((session_id, token.clone()));
                        if let Some((previous, previous_token)) = previous {
                            search_warn!(
                                "session {} still open when {} started; cancelling it",
                                previous,
                                session_id
                            );
                            previous_token.cancel();
                        }
                        runtime.spawn(run_stream(
                            streamer.clone(),
                            session_id,
                            request,
                            token,
                            open.clone(),
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::Cancel { session_id, ack } => {
                        let Some(token) = take_if_open(&open, session_id) else {
                            continue;
                        };
                        search_info!("cancelling session {}", session_id);
                        token.cancel();
                        let streamer = streamer.clone();
                        runtime.spawn(async move {
                            if let Err(err) = streamer.notify_stop().await {
                                search_warn!("stop notification failed: {}", err);
                            }
                            if let Some(ack) = ack {
                                let _ = ack.send(());
                            }
                        });
                    }
                }
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn open(&self, session_id: SessionId, request: SearchRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Open {
            session_id,
            request,
        });
    }

    pub fn cancel(&self, session_id: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel {
            session_id,
            ack: None,
        });
    }

    /// Cancels like [`cancel`](Self::cancel), then blocks until the stop
    /// notification has been sent or `timeout` passes. Returns `false` when
    /// nothing was stopped or the notification did not finish in time.
    pub fn cancel_and_wait(&self, session_id: SessionId, timeout: Duration) -> bool {
        let (ack_tx, ack_rx) = mpsc::channel();
        let sent = self.cmd_tx.send(EngineCommand::Cancel {
            session_id,
            ack: Some(ack_tx),
        });
        sent.is_ok() && ack_rx.recv_timeout(timeout).is_ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn run_stream(
    streamer: Arc<dyn SearchStreamer>,
    session_id: SessionId,
    request: SearchRequest,
    cancel: CancellationToken,
    open: OpenSlot,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink = ChannelEventSink::new(event_tx.clone());
    let result = streamer
        .stream(session_id, &request, &sink, &cancel)
        .await;
    match &result {
        Ok(summary) => search_info!(
            "session {} finished with {} records",
            session_id,
            summary.records
        ),
        Err(err) if err.is_cancelled() => search_info!("session {} cancelled", session_id),
        Err(err) => search_warn!("session {} failed: {}", session_id, err),
    }
    take_if_open(&open, session_id);
    let _ = event_tx.send(EngineEvent::StreamFinished { session_id, result });
}

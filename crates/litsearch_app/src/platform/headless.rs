use std::io::{self, Write};
use std::sync::mpsc;

use anyhow::{bail, Context, Result};
use litsearch_core::{update, AppState, LogEntry, Msg, SearchStatus};
use search_logging::search_info;

use super::app::{clock_label, spawn_clock};
use super::cli::StartInputs;
use super::effects::EffectRunner;
use super::settings::Settings;

/// Runs one search to completion, printing each log line as it arrives.
/// Fails when the search ends in error or the export fails.
pub fn run(settings: &Settings, start: StartInputs, export: bool) -> Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects = EffectRunner::new(
        settings.stream_settings(),
        settings.export_dir.clone(),
        msg_tx.clone(),
    );
    spawn_clock(msg_tx);

    let mut session = Headless::new(
        AppState::with_inputs(&start.keyword, start.max_results, start.enable_fulltext),
        io::stdout().lock(),
    );

    session.apply(
        Msg::Tick {
            clock: clock_label(),
        },
        &effects,
    )?;
    session.apply(Msg::SearchSubmitted, &effects)?;
    if session.state.status() != SearchStatus::Confirming {
        bail!("search was not started");
    }
    session.apply(Msg::ConfirmClicked, &effects)?;
    if session.state.status() != SearchStatus::Running {
        bail!("search parameters were rejected");
    }

    while !session.state.status().is_terminal() {
        let msg = msg_rx.recv().context("message channel closed")?;
        session.apply(msg, &effects)?;
    }
    let status = session.state.status();
    search_info!("headless search finished with status {:?}", status);

    let mut export_failed = false;
    if export {
        let has_rows = session.state.view().export_enabled;
        session.apply(Msg::ExportClicked, &effects)?;
        if has_rows {
            // The export runs on its own thread and reports through the channel.
            let outcome = loop {
                match msg_rx.recv().context("message channel closed")? {
                    msg @ Msg::ExportFinished(_) => break msg,
                    other => session.apply(other, &effects)?,
                }
            };
            export_failed = matches!(outcome, Msg::ExportFinished(Err(_)));
            session.apply(outcome, &effects)?;
        }
    }

    match status {
        SearchStatus::Error => bail!("search failed"),
        _ if export_failed => bail!("export failed"),
        _ => Ok(()),
    }
}

struct Headless<W: Write> {
    state: AppState,
    out: W,
    printed: usize,
    /// First log entry of the printed run; a new session replaces the log.
    first_seen: Option<LogEntry>,
}

impl<W: Write> Headless<W> {
    fn new(state: AppState, out: W) -> Self {
        Self {
            state,
            out,
            printed: 0,
            first_seen: None,
        }
    }

    /// Applies one message, runs its effects and prints new log lines.
    fn apply(&mut self, msg: Msg, effects: &EffectRunner) -> Result<()> {
        let (state, produced) = update(std::mem::take(&mut self.state), msg);
        self.state = state;
        effects.enqueue(produced);
        self.state.consume_dirty();
        self.print_new_logs()
    }

    fn print_new_logs(&mut self) -> Result<()> {
        let logs = self.state.view().logs;
        if logs.first() != self.first_seen.as_ref() {
            self.printed = 0;
            self.first_seen = logs.first().cloned();
        }
        for entry in &logs[self.printed..] {
            writeln!(self.out, "{}", format_log_line(entry))?;
        }
        self.printed = logs.len();
        self.out.flush()?;
        Ok(())
    }
}

pub(crate) fn format_log_line(entry: &LogEntry) -> String {
    format!(
        "[{}] {:<7} {}",
        entry.timestamp,
        entry.level.label().to_uppercase(),
        entry.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use litsearch_core::{LogLevel, SearchEvent};
    use litsearch_engine::StreamSettings;
    use std::path::PathBuf;

    fn offline_runner() -> EffectRunner {
        let (tx, _rx) = mpsc::channel();
        EffectRunner::new(
            StreamSettings {
                endpoint: "http://127.0.0.1:9/stream_search".to_string(),
                stop_endpoint: None,
                ..StreamSettings::default()
            },
            PathBuf::from("."),
            tx,
        )
    }

    fn output(session: Headless<Vec<u8>>) -> Vec<String> {
        String::from_utf8(session.out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn log_line_format() {
        let mut entry = LogEntry::new(LogLevel::Warning, "slow response");
        entry.timestamp = "10:00:00".to_string();
        assert_eq!(format_log_line(&entry), "[10:00:00] WARNING slow response");
    }

    #[test]
    fn prints_each_line_once_across_a_session_start() {
        let effects = offline_runner();
        let mut session = Headless::new(AppState::with_inputs("zinc", 20, true), Vec::new());
        for msg in [
            Msg::Tick {
                clock: "09:00:00".to_string(),
            },
            Msg::SearchSubmitted,
            Msg::ConfirmClicked,
            Msg::StreamEvent {
                session_id: 1,
                event: SearchEvent::Log(LogEntry {
                    timestamp: "09:00:02".to_string(),
                    level: LogLevel::Info,
                    message: "found 3 papers".to_string(),
                }),
            },
        ] {
            session.apply(msg, &effects).unwrap();
        }

        assert_eq!(
            output(session),
            vec![
                "[09:00:00] INFO    Preparing to search keyword: \"zinc\"",
                "[09:00:00] INFO    Search keyword: \"zinc\"",
                "[09:00:00] INFO    Max results: 20",
                "[09:00:00] INFO    Full-text search: on",
                "[09:00:02] INFO    found 3 papers",
            ]
        );
    }
}

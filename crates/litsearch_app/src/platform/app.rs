use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use litsearch_core::{update, AppState, AppViewModel, Msg};
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::widgets::TableState;
use ratatui::DefaultTerminal;
use search_logging::search_info;

use super::cli::StartInputs;
use super::effects::EffectRunner;
use super::settings::Settings;
use super::ui;
use super::ui::input::KeyAction;

const INPUT_POLL: Duration = Duration::from_millis(50);
const TICK_INTERVAL: Duration = Duration::from_millis(250);
/// How long quitting waits for the stop notification of an active search.
const STOP_GRACE: Duration = Duration::from_secs(2);

pub fn run(settings: &Settings, start: StartInputs) -> Result<()> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects = EffectRunner::new(
        settings.stream_settings(),
        settings.export_dir.clone(),
        msg_tx.clone(),
    );
    spawn_clock(msg_tx);

    let mut app = App {
        state: AppState::with_inputs(&start.keyword, start.max_results, start.enable_fulltext),
        effects,
        msg_rx,
        table_state: TableState::default(),
    };

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}

/// Sends the wall-clock label used to stamp local log lines.
pub(crate) fn spawn_clock(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while msg_tx.send(Msg::Tick { clock: clock_label() }).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}

pub(crate) fn clock_label() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

struct App {
    state: AppState,
    effects: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    table_state: TableState,
}

impl App {
    fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.dispatch(Msg::Tick {
            clock: clock_label(),
        });
        let mut view = self.state.view();
        terminal.draw(|frame| ui::render::draw(frame, &view, &mut self.table_state))?;

        loop {
            let mut redraw = false;

            if event::poll(INPUT_POLL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        match ui::input::map_key(key, &view) {
                            KeyAction::Quit => break,
                            KeyAction::Dispatch(msg) => redraw |= self.dispatch(msg),
                            KeyAction::ScrollUp => {
                                self.table_state.select_previous();
                                redraw = true;
                            }
                            KeyAction::ScrollDown => {
                                self.table_state.select_next();
                                redraw = true;
                            }
                            KeyAction::Ignore => {}
                        }
                    }
                    Event::Resize(_, _) => redraw = true,
                    _ => {}
                }
            }

            while let Ok(msg) = self.msg_rx.try_recv() {
                redraw |= self.dispatch(msg);
            }

            if redraw {
                view = self.state.view();
                terminal.draw(|frame| ui::render::draw(frame, &view, &mut self.table_state))?;
            }
        }

        self.shutdown(&view);
        Ok(())
    }

    /// Runs one message through `update`; returns whether a re-render is due.
    fn dispatch(&mut self, msg: Msg) -> bool {
        let (state, effects) = update(std::mem::take(&mut self.state), msg);
        self.state = state;
        self.effects.enqueue(effects);
        self.state.consume_dirty()
    }

    fn shutdown(&mut self, view: &AppViewModel) {
        if view.can_stop {
            search_info!("quitting with an active search; stopping it");
            let (state, effects) = update(std::mem::take(&mut self.state), Msg::StopClicked);
            self.state = state;
            self.effects.enqueue_at_exit(effects, STOP_GRACE);
        }
    }
}

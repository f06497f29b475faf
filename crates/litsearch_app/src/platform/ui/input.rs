use litsearch_core::{AppViewModel, ConfirmView, Msg, SearchStatus};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press means in the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Dispatch(Msg),
    ScrollUp,
    ScrollDown,
    Quit,
    Ignore,
}

pub fn map_key(key: KeyEvent, view: &AppViewModel) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('e') => KeyAction::Dispatch(Msg::ExportClicked),
            _ => KeyAction::Ignore,
        };
    }
    if let Some(confirm) = &view.confirm {
        return confirm_key(key, confirm);
    }

    match (view.status, key.code) {
        (_, KeyCode::Up) => KeyAction::ScrollUp,
        (_, KeyCode::Down) => KeyAction::ScrollDown,
        (SearchStatus::Ready, code) => keyword_key(code, &view.keyword_input),
        (SearchStatus::Running, KeyCode::Esc) => KeyAction::Dispatch(Msg::StopClicked),
        (status, code) if status.is_terminal() => match code {
            KeyCode::Char('r') | KeyCode::Enter => KeyAction::Dispatch(Msg::RestartClicked),
            KeyCode::Char('e') => KeyAction::Dispatch(Msg::ExportClicked),
            KeyCode::Char('q') => KeyAction::Quit,
            _ => KeyAction::Ignore,
        },
        _ => KeyAction::Ignore,
    }
}

fn keyword_key(code: KeyCode, keyword: &str) -> KeyAction {
    match code {
        KeyCode::Enter => KeyAction::Dispatch(Msg::SearchSubmitted),
        KeyCode::Char(c) => KeyAction::Dispatch(Msg::KeywordChanged(format!("{keyword}{c}"))),
        KeyCode::Backspace if !keyword.is_empty() => {
            let mut edited = keyword.to_string();
            edited.pop();
            KeyAction::Dispatch(Msg::KeywordChanged(edited))
        }
        _ => KeyAction::Ignore,
    }
}

fn confirm_key(key: KeyEvent, confirm: &ConfirmView) -> KeyAction {
    let input = &confirm.max_results_input;
    match key.code {
        KeyCode::Enter => KeyAction::Dispatch(Msg::ConfirmClicked),
        KeyCode::Esc => KeyAction::Dispatch(Msg::ConfirmCancelled),
        KeyCode::Tab | KeyCode::Char(' ') => {
            KeyAction::Dispatch(Msg::FulltextToggled(!confirm.enable_fulltext))
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            KeyAction::Dispatch(Msg::MaxResultsChanged(format!("{input}{c}")))
        }
        KeyCode::Backspace if !input.is_empty() => {
            let mut edited = input.clone();
            edited.pop();
            KeyAction::Dispatch(Msg::MaxResultsChanged(edited))
        }
        _ => KeyAction::Ignore,
    }
}

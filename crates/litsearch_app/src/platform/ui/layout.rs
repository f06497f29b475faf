use ratatui::layout::{Constraint, Layout, Rect};

use super::constants::*;

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub keyword: Rect,
    pub logs: Rect,
    pub table: Rect,
    pub footer: Rect,
}

pub fn areas(area: Rect) -> Areas {
    let [header, keyword, logs, table, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(KEYWORD_HEIGHT),
        Constraint::Length(LOG_PANE_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    Areas {
        header,
        keyword,
        logs,
        table,
        footer,
    }
}

/// Centered box for the confirmation step, shrunk to fit small terminals.
pub fn modal(area: Rect) -> Rect {
    let width = MODAL_WIDTH.min(area.width);
    let height = MODAL_HEIGHT.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

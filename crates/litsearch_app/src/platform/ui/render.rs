use litsearch_core::{
    AppViewModel, ConfirmView, LogLevel, MaxResultsHint, SearchStatus, StatusTone,
    FULLTEXT_FREE, TABLE_HEADERS,
};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use super::constants::*;
use super::layout;

pub fn draw(frame: &mut Frame, view: &AppViewModel, table_state: &mut TableState) {
    let areas = layout::areas(frame.area());

    frame.render_widget(header(view), areas.header);
    draw_keyword(frame, view, areas.keyword);
    draw_logs(frame, view, areas.logs);
    draw_table(frame, view, areas.table, table_state);
    frame.render_widget(
        Paragraph::new(footer_hint(view)).style(Style::default().fg(Color::DarkGray)),
        areas.footer,
    );

    if let Some(confirm) = &view.confirm {
        draw_confirm(frame, confirm);
    }
}

fn header(view: &AppViewModel) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            " litsearch ",
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw("  "),
        Span::styled(
            view.status_line.text.clone(),
            tone_style(view.status_line.tone),
        ),
        Span::raw(format!("  | Results: {}", view.result_count)),
    ])
}

fn draw_keyword(frame: &mut Frame, view: &AppViewModel, area: Rect) {
    let editable = view.status == SearchStatus::Ready;
    let block = Block::bordered().title(" Keyword ").border_style(if editable {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    });
    let input = Line::from(view.keyword_input.as_str());
    let input_width = input.width() as u16;
    frame.render_widget(Paragraph::new(input).block(block), area);

    if editable && view.confirm.is_none() {
        let max_x = area.x + area.width.saturating_sub(2);
        frame.set_cursor_position(Position::new(
            (area.x + 1 + input_width).min(max_x),
            area.y + 1,
        ));
    }
}

fn draw_logs(frame: &mut Frame, view: &AppViewModel, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = view.logs.len().saturating_sub(visible);
    let items: Vec<ListItem> = view
        .logs
        .iter()
        .skip(skip)
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", entry.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(entry.message.clone(), level_style(entry.level)),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).block(Block::bordered().title(" Log ")), area);
}

fn draw_table(frame: &mut Frame, view: &AppViewModel, area: Rect, state: &mut TableState) {
    let header = Row::new(TABLE_HEADERS.iter().map(|h| Cell::from(*h)))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view.rows.iter().map(|row| {
        Row::new(row.cells().iter().enumerate().map(|(column, text)| {
            let cell = Cell::from(text.as_str());
            if column == FULLTEXT_COLUMN {
                cell.style(fulltext_style(text))
            } else {
                cell
            }
        }))
    });

    if state.selected().is_some_and(|i| i >= view.rows.len()) {
        state.select(view.rows.len().checked_sub(1));
    }

    let table = Table::new(rows, COLUMN_WIDTHS)
        .header(header)
        .block(Block::bordered().title(format!(" Results ({}) ", view.rows.len())))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(table, area, state);
}

fn draw_confirm(frame: &mut Frame, confirm: &ConfirmView) {
    let area = layout::modal(frame.area());
    let count_style = if confirm.max_results_valid {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Red)
    };
    let hint_style = match confirm.hint {
        MaxResultsHint::Invalid => Style::default().fg(Color::Red),
        MaxResultsHint::Few | MaxResultsHint::Many => Style::default().fg(Color::Yellow),
        MaxResultsHint::Recommended => Style::default().fg(Color::Green),
    };
    let fulltext = if confirm.enable_fulltext { "[x]" } else { "[ ]" };

    let lines = vec![
        Line::from(vec![
            Span::raw("Keyword:      "),
            Span::styled(
                confirm.keyword.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::default(),
        Line::from(vec![
            Span::raw("Max results:  "),
            Span::styled(confirm.max_results_input.clone(), count_style),
        ]),
        Line::from(vec![
            Span::raw("              "),
            Span::styled(confirm.hint.text(), hint_style),
        ]),
        Line::from(format!("Full text:    {fulltext}")),
        Line::default(),
        Line::from(Span::styled(
            "Enter: start  Tab: toggle full text  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .title(" Confirm search ")
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        area,
    );
}

pub(crate) fn footer_hint(view: &AppViewModel) -> &'static str {
    if view.confirm.is_some() {
        return " 0-9 edit count | Tab toggle full text | Enter start | Esc cancel";
    }
    match view.status {
        SearchStatus::Ready => " Enter search | Ctrl+E export | Ctrl+C quit",
        SearchStatus::Running => " Esc stop | Up/Down scroll | Ctrl+E export | Ctrl+C quit",
        SearchStatus::Completed | SearchStatus::Stopped | SearchStatus::Error => {
            " r new search | e export | Up/Down scroll | q quit"
        }
        SearchStatus::Confirming => "",
    }
}

fn tone_style(tone: StatusTone) -> Style {
    match tone {
        StatusTone::Idle => Style::default().fg(Color::Gray),
        StatusTone::Busy => Style::default().fg(Color::Yellow),
        StatusTone::Success => Style::default().fg(Color::Green),
        StatusTone::Failure => Style::default().fg(Color::Red),
    }
}

fn level_style(level: LogLevel) -> Style {
    match level {
        LogLevel::Info => Style::default().fg(Color::Cyan),
        LogLevel::Warning => Style::default().fg(Color::Yellow),
        LogLevel::Error => Style::default().fg(Color::Red),
        LogLevel::Success => Style::default().fg(Color::Green),
    }
}

fn fulltext_style(label: &str) -> Style {
    if label == FULLTEXT_FREE {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

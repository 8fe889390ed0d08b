//! Renders [`App`] with tui widgets.

mod dialog;
mod table;
mod toast;

use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

const HINTS: [(&str, &str); 7] = [
    ("n", "nova"),
    ("e", "editar"),
    ("d", "excluir"),
    ("r", "atualizar"),
    ("←/→", "página"),
    ("p", "linhas por página"),
    ("q", "sair"),
];

pub fn draw<B: Backend>(f: &mut Frame<B>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.size());

    let header = Paragraph::new(Spans::from(Span::styled(
        "Lista de Tarefas",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("tarefas"));
    f.render_widget(header, chunks[0]);

    table::render(f, chunks[1], app);
    f.render_widget(hint_line(&HINTS), chunks[2]);

    if let Some(dialog) = &app.dialog {
        dialog::render(f, dialog);
    }
    if let Some(toast) = &app.toast {
        toast::render(f, toast);
    }
}

/// One line of `key description` pairs.
fn hint_line<'a>(hints: &[(&'a str, &'a str)]) -> Paragraph<'a> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Paragraph::new(Spans::from(spans)).alignment(Alignment::Center)
}

/// Area of `width` x `height` centered in `area`, clipped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

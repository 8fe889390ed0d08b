use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use tarefas_shared::TarefaId;

use super::{centered, hint_line};
use crate::app::{Dialog, Field, Form};

pub(super) fn render<B: Backend>(f: &mut Frame<B>, dialog: &Dialog) {
    match dialog {
        Dialog::Create(form) => render_form(f, "Nova Tarefa".to_string(), form),
        Dialog::Edit { id, form } => render_form(f, format!("Editar Tarefa #{}", id), form),
        Dialog::ConfirmDelete { id, titulo } => render_confirm(f, id, titulo),
    }
}

fn frame_block(title: String, color: Color) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn input(label: &str, value: String, focused: bool) -> Paragraph<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label)
            .border_style(border),
    )
}

fn with_cursor(value: &str, focused: bool) -> String {
    if focused {
        format!("{}▏", value)
    } else {
        value.to_string()
    }
}

fn render_form<B: Backend>(f: &mut Frame<B>, title: String, form: &Form) {
    let area = centered(f.size(), 64, 14);
    f.render_widget(Clear, area);
    let block = frame_block(title, Color::Cyan);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(inner);

    let editable = !form.is_pending();
    let focused = |field: Field| editable && form.focus == field;

    f.render_widget(
        input(
            "Titulo",
            with_cursor(&form.draft.titulo, focused(Field::Titulo)),
            focused(Field::Titulo),
        ),
        chunks[0],
    );
    f.render_widget(
        input(
            "Descrição",
            with_cursor(&form.draft.descricao, focused(Field::Descricao)),
            focused(Field::Descricao),
        ),
        chunks[1],
    );
    f.render_widget(
        input(
            "Status",
            format!("◀ {} ▶", form.draft.status.label()),
            focused(Field::Status),
        ),
        chunks[2],
    );

    if form.is_pending() {
        let saving = Paragraph::new(Span::styled(
            "Salvando…",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center);
        f.render_widget(saving, chunks[3]);
    } else {
        f.render_widget(
            hint_line(&[("Enter", "salvar"), ("Tab", "próximo campo"), ("Esc", "cancelar")]),
            chunks[3],
        );
    }
}

fn render_confirm<B: Backend>(f: &mut Frame<B>, id: &TarefaId, titulo: &str) {
    let area = centered(f.size(), 56, 6);
    f.render_widget(Clear, area);
    let block = frame_block("Excluir".to_string(), Color::Red);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(inner);

    let question = Paragraph::new(Spans::from(vec![
        Span::raw(format!("Excluir a tarefa #{} ", id)),
        Span::styled(
            format!("\"{}\"", titulo),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("?"),
    ]))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(question, chunks[0]);
    f.render_widget(hint_line(&[("y", "confirmar"), ("n", "cancelar")]), chunks[1]);
}

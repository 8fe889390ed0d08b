use tui::{
    backend::Backend,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use tarefas_shared::Status;

use crate::app::App;

const HEADERS: [&str; 6] = [
    "ID",
    "Titulo",
    "Descrição",
    "Data Criação",
    "Data Conclusão",
    "Status",
];

const WIDTHS: [Constraint; 6] = [
    Constraint::Percentage(6),
    Constraint::Percentage(18),
    Constraint::Percentage(24),
    Constraint::Percentage(18),
    Constraint::Percentage(18),
    Constraint::Percentage(16),
];

fn status_style(status: Status) -> Style {
    match status {
        Status::Aberta => Style::default().fg(Color::Yellow),
        Status::EmAndamento => Style::default().fg(Color::Cyan),
        Status::Concluida => Style::default().fg(Color::Green),
    }
}

pub(super) fn render<B: Backend>(f: &mut Frame<B>, area: Rect, app: &App) {
    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let visible = app.visible();
    let rows: Vec<Row> = if visible.is_empty() {
        let message = if app.sync.is_loaded() {
            "Nenhuma tarefa"
        } else {
            "Carregando…"
        };
        vec![Row::new(vec![Cell::from(""), Cell::from(message)])
            .style(Style::default().fg(Color::DarkGray))]
    } else {
        visible
            .iter()
            .map(|row| {
                let [id, titulo, descricao, criada, concluida, status] = row.cells();
                Row::new(vec![
                    Cell::from(id),
                    Cell::from(titulo),
                    Cell::from(descricao),
                    Cell::from(criada),
                    Cell::from(concluida),
                    Cell::from(status).style(status_style(row.tarefa.status)),
                ])
            })
            .collect()
    };

    let mut title = format!(
        " {} tarefas | página {}/{} | {} por página ",
        app.rows().len(),
        app.page() + 1,
        app.page_count(),
        app.page_size
    );
    if app.sync.in_flight() > 0 {
        title.push_str("| sincronizando… ");
    }

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .widths(&WIDTHS)
        .column_spacing(1)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !visible.is_empty() {
        state.select(Some(app.selected - app.page() * app.page_size));
    }
    f.render_stateful_widget(table, area, &mut state);
}

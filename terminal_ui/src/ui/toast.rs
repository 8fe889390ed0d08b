use tui::{
    backend::Backend,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{Toast, ToastLevel};

/// Draws the toast centered near the bottom of the screen.
pub(super) fn render<B: Backend>(f: &mut Frame<B>, toast: &Toast) {
    let area = f.size();
    let height = 3;
    let width = u16::try_from(toast.message.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(6)
        .min(area.width.saturating_sub(4));
    if width == 0 || area.height < height + 3 {
        return;
    }
    let toast_area = Rect::new(
        (area.width - width) / 2,
        area.height - height - 2,
        width,
        height,
    );

    let color = match toast.level {
        ToastLevel::Info => Color::Green,
        ToastLevel::Error => Color::Red,
    };

    f.render_widget(Clear, toast_area);
    let paragraph = Paragraph::new(toast.message.as_str())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(paragraph, toast_area);
}

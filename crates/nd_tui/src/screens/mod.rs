use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Clear, Paragraph};
use tui::Frame;

use crate::app::{App, Screen};

mod detail;
mod form;
mod list;

pub fn draw<B: Backend>(f: &mut Frame<B>, app: &App) {
    match &app.screen {
        Screen::List => list::draw(f, app),
        Screen::Detail { .. } => detail::draw(f, app),
        Screen::Create | Screen::Edit { .. } => form::draw(f, app),
    }
    draw_notices(f, app);
}

/// Notifications stack in the bottom-right corner, newest at the bottom,
/// each with its kind's icon and color.
fn draw_notices<B: Backend>(f: &mut Frame<B>, app: &App) {
    if app.notices.is_empty() {
        return;
    }
    let area = f.size();
    let count = app.notices.len() as u16;
    let width = area.width.min(44);
    let height = (count * 3).min(area.height);
    let rect = Rect {
        x: area.width.saturating_sub(width),
        y: area.height.saturating_sub(height),
        width,
        height,
    };
    f.render_widget(Clear, rect);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); count as usize])
        .split(rect);
    for (notice, row) in app.notices.iter().zip(rows) {
        let color = notice.kind.color();
        let line = Spans::from(vec![
            Span::styled(
                format!(" {} ", notice.kind.icon()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(notice.message.clone()),
        ]);
        let widget = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(widget, row);
    }
}

/// Full-frame status banner for the loading and failure states.
fn status_message<B: Backend>(f: &mut Frame<B>, message: &str, color: Color) {
    let area = f.size();
    let widget = Paragraph::new(Span::styled(message, Style::default().fg(color)))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

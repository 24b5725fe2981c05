use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout};
use tui::style::{Color, Style};
use tui::text::Span;
use tui::widgets::{Block, Borders, Paragraph};
use tui::Frame;

use crate::app::{App, LoadState, Screen, FORM_FIELDS};

pub fn draw<B: Backend>(f: &mut Frame<B>, app: &App) {
    match &app.load {
        LoadState::Loading => {
            super::status_message(f, "Loading article...", Color::Gray);
            return;
        }
        LoadState::Failed(message) => {
            super::status_message(f, message, Color::Red);
            return;
        }
        LoadState::Ready => {}
    }

    let title = match app.screen {
        Screen::Edit { .. } => "Edit Article",
        _ => "Create New Article",
    };

    let mut constraints = vec![Constraint::Length(1)]; // error line
    constraints.extend(FORM_FIELDS.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(1)); // help
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.size());

    let error = app.form.error.as_deref().unwrap_or("");
    f.render_widget(
        Paragraph::new(Span::styled(error, Style::default().fg(Color::Red))),
        chunks[0],
    );

    for (i, label) in FORM_FIELDS.iter().enumerate() {
        let required = matches!(i, 0 | 1 | 4);
        let label = if required {
            format!("{} *", label)
        } else {
            label.to_string()
        };
        let style = if app.form.focus == i {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let field = Paragraph::new(app.form.values[i].as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(label),
        );
        f.render_widget(field, chunks[i + 1]);
    }

    let help = format!(
        "{} — tab next field  ⏎ save  esc cancel",
        title
    );
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
        chunks[FORM_FIELDS.len() + 1],
    );
}

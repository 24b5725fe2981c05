use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Paragraph, Wrap};
use tui::Frame;

use crate::app::{App, LoadState};

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
    let Some(article) = &app.detail else {
        super::status_message(f, "Article not found", Color::Red);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Min(3),    // body
            Constraint::Length(2), // source link + help
        ])
        .split(f.size());

    let date = article
        .published_at
        .map(|d| format!("Published: {}", d.format("%B %e, %Y")))
        .unwrap_or_default();
    let header = Paragraph::new(vec![
        Spans::from(Span::styled(
            article.source_label().to_uppercase(),
            Style::default().fg(Color::DarkGray),
        )),
        Spans::from(Span::styled(
            article.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled(date, Style::default().fg(Color::DarkGray))),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, chunks[0]);

    let body = Paragraph::new(article.content.as_str())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::NONE));
    f.render_widget(body, chunks[1]);

    let mut footer = vec![Spans::from(Span::styled(
        "esc back  e edit",
        Style::default().fg(Color::DarkGray),
    ))];
    if let Some(base_url) = article.base_url() {
        footer.insert(
            0,
            Spans::from(vec![
                Span::styled("Source: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    base_url.to_string(),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]),
        );
    }
    f.render_widget(Paragraph::new(footer), chunks[2]);
}

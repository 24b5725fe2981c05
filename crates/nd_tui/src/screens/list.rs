use tui::backend::Backend;
use tui::layout::{Constraint, Direction, Layout};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, List, ListItem, Paragraph};
use tui::Frame;

use nd_core::source_options;

use crate::app::{App, LoadState};

pub fn draw<B: Backend>(f: &mut Frame<B>, app: &App) {
    match &app.load {
        LoadState::Loading => {
            super::status_message(f, "Loading articles...", Color::Gray);
            return;
        }
        LoadState::Failed(message) => {
            super::status_message(f, message, Color::Red);
            return;
        }
        LoadState::Ready => {}
    }

    let page = app.visible();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search bar
            Constraint::Length(1), // filter + sort line
            Constraint::Min(3),    // article list
            Constraint::Length(1), // pagination footer
            Constraint::Length(1), // key help
        ])
        .split(f.size());

    let search_style = if app.search_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(app.query.search.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(search_style)
            .title(format!("Search — Articles ({})", page.total_matches)),
    );
    f.render_widget(search, chunks[0]);

    let source_count = source_options(&app.articles).len();
    let filters = Paragraph::new(Spans::from(vec![
        Span::raw(format!(
            "Source: {} ({} sources)",
            app.query.source, source_count
        )),
        Span::raw("   "),
        Span::raw(format!("Sort: {}", app.query.sort.label())),
    ]));
    f.render_widget(filters, chunks[1]);

    if page.items.is_empty() {
        let message = if app.query.search.trim().is_empty()
            && app.query.source == nd_core::SourceFilter::All
        {
            "No articles found. Press n to create your first article."
        } else {
            "No articles match your filters."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, chunks[2]);
    } else {
        let items: Vec<ListItem> = page
            .items
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let date = article
                    .published_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "no date".into());
                let mut title_style = Style::default().add_modifier(Modifier::BOLD);
                if i == app.selected {
                    title_style = title_style.fg(Color::Cyan);
                }
                let title = if article.id.is_missing() {
                    // Not actionable without an identifier.
                    format!("{} (no id)", article.title)
                } else {
                    article.title.clone()
                };
                ListItem::new(vec![
                    Spans::from(Span::styled(title, title_style)),
                    Spans::from(Span::styled(
                        format!("{} · {}", article.source_label(), date),
                        Style::default().fg(Color::DarkGray),
                    )),
                    Spans::from(Span::raw(truncate(article.summary_text(), 80))),
                ])
            })
            .collect();
        let list =
            List::new(items).block(Block::default().borders(Borders::ALL).title("Articles"));
        f.render_widget(list, chunks[2]);
    }

    let footer = if page.total_pages > 0 {
        format!(
            "page {} of {} ({} matches)",
            app.query.page, page.total_pages, page.total_matches
        )
    } else {
        "no matches".to_string()
    };
    f.render_widget(
        Paragraph::new(Span::styled(footer, Style::default().fg(Color::DarkGray))),
        chunks[3],
    );

    let help = "/ search  f source  s sort  ↑↓ select  ←→ page  ⏎ open  n new  e edit  d delete  r refresh  q quit";
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
        chunks[4],
    );
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}…", cut)
    }
}

//! Terminal view shell: list, detail, create and edit screens over the
//! article gateway, driven by crossterm events.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use tui::backend::CrosstermBackend;
use tui::Terminal;

use nd_client::ArticleGateway;
use nd_core::Result;

pub mod app;
pub mod notify;
pub mod screens;

pub use app::App;

const TICK: Duration = Duration::from_millis(100);

/// Run the interactive UI until the user quits.
pub async fn run(gateway: ArticleGateway) -> Result<()> {
    enable_raw_mode().map_err(terminal_error)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(terminal_error)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(gateway);
    app.refresh().await;

    let result = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode().map_err(terminal_error)?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(terminal_error)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.notices.prune(Instant::now());
        terminal.draw(|f| screens::draw(f, app))?;

        if event::poll(TICK).map_err(terminal_error)? {
            if let Event::Key(key) = event::read().map_err(terminal_error)? {
                app.handle_key(key).await;
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

fn terminal_error(e: io::Error) -> nd_core::Error {
    nd_core::Error::Terminal(e.to_string())
}

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use glide_core::{AppConfig, TextView};
use glide_tui::event::{AppEvent, EventHandler};
use glide_tui::input::handle_key_event;
use glide_tui::{ui, App};

pub fn run(config: AppConfig, config_path: Option<PathBuf>, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let title = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let tick_rate_ms = config.ui.tick_rate_ms;
    let view = TextView::from_text(&text, 1);
    let mut app = App::new(view, config, title.clone());
    if let Some(path) = config_path {
        app = app.with_config_path(path);
    }
    info!(file = %file.display(), lines = text.lines().count(), "Opening pager");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(format!("glide - {title}")))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut app, &mut terminal, tick_rate_ms);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    tick_rate_ms: u64,
) -> Result<()> {
    let event_handler = EventHandler::new(tick_rate_ms);
    app.resize(terminal.size()?.height);

    loop {
        terminal.draw(|frame| ui::draw(frame, &app.view, &app.chrome()))?;

        if let Some(event) = event_handler.next_within(app.poll_timeout())? {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app, &app.keymap);
                    app.handle_action(action, terminal)?;
                }
                AppEvent::Resize(_, height) => app.resize(height),
                AppEvent::Tick => {}
            }
        }

        // Motion ticks run on their own interval, whatever woke the loop
        app.advance();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

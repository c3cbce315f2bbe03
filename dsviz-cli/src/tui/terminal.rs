//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dsviz_core::DsvizConfig;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use super::app::{App, MainTab};
use super::event::{handle_key, help_text, poll_event, HandleResult};
use super::ui;

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Run the TUI application
pub fn run(config: &DsvizConfig, seed: Option<u64>, tab: MainTab) -> Result<()> {
    // Build state before touching the terminal so config errors print normally
    let mut app = App::new(config, seed, tab).context("Failed to set up games")?;
    info!(tab = tab.title(), ?seed, "starting tui");

    let mut terminal = init_terminal()?;

    let result = run_loop(&mut terminal, &mut app, config);

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;

    info!(score = app.array.score(), "tui exited");
    result
}

/// Main event loop
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    config: &DsvizConfig,
) -> Result<()> {
    let tick_rate = config.ui.tick_rate();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(event) = poll_event(tick_rate)? {
            match event {
                Event::Key(key) => {
                    // Dismiss help on any key if showing
                    if app.help_text.is_some() {
                        app.dismiss_help();
                    } else {
                        match handle_key(app, key, Instant::now()) {
                            HandleResult::Quit => break,
                            HandleResult::Continue => {}
                            HandleResult::ShowHelp => app.show_help(help_text()),
                        }
                    }
                }
                Event::Resize(_, _) => {
                    // Terminal resized, will be handled on next draw
                }
                _ => {}
            }
        }

        // Countdown, notices and the pending maze move
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

//! Event handling for the TUI

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, MainTab, Mode};

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit the application
    Quit,
    /// Show the help overlay
    ShowHelp,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> HandleResult {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return HandleResult::Continue;
    }

    // Global quit shortcuts (Ctrl+C, Ctrl+Q)
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return HandleResult::Quit,
            _ => {}
        }
    }

    match app.mode {
        Mode::Edit => handle_edit_mode(app, key, now),
        Mode::Normal => handle_normal_mode(app, key, now),
    }
}

/// Keys shared by every tab, then the active tab's keys
fn handle_normal_mode(app: &mut App, key: KeyEvent, now: Instant) -> HandleResult {
    match key.code {
        KeyCode::Char('q') => return HandleResult::Quit,
        KeyCode::Char('?') => return HandleResult::ShowHelp,
        KeyCode::Char('1') => {
            app.switch_tab(MainTab::Array);
            return HandleResult::Continue;
        }
        KeyCode::Char('2') => {
            app.switch_tab(MainTab::Hash);
            return HandleResult::Continue;
        }
        KeyCode::Char('3') => {
            app.switch_tab(MainTab::Maze);
            return HandleResult::Continue;
        }
        KeyCode::Tab => {
            app.next_tab();
            return HandleResult::Continue;
        }
        _ => {}
    }

    match app.main_tab {
        MainTab::Array => handle_array_keys(app, key, now),
        MainTab::Hash => handle_hash_keys(app, key),
        MainTab::Maze => handle_maze_keys(app, key, now),
    }
    HandleResult::Continue
}

fn handle_array_keys(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('s') | KeyCode::Enter if !app.array.is_playing() => app.array_start(now),
        KeyCode::Char('h') | KeyCode::Left => app.array_left(),
        KeyCode::Char('l') | KeyCode::Right => app.array_right(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.array_place(now),
        KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => app.array_remove(),
        _ => {}
    }
}

fn handle_hash_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => {
            app.mode = Mode::Edit;
            app.set_status("-- EDIT -- Tab: switch field, Enter: insert, Esc: cancel");
        }
        KeyCode::Char('j') | KeyCode::Down => app.hash_select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.hash_select_prev(),
        KeyCode::Char('d') | KeyCode::Delete => app.hash_delete_selected(),
        _ => {}
    }
}

fn handle_maze_keys(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('m') | KeyCode::Enter => app.maze_step(now),
        KeyCode::Char('r') => app.maze_reset(),
        _ => {}
    }
}

/// Handle keys in edit mode (hash table input fields)
fn handle_edit_mode(app: &mut App, key: KeyEvent, now: Instant) -> HandleResult {
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Normal;
            app.clear_status();
        }
        KeyCode::Enter => app.hash_submit(now),
        KeyCode::Tab | KeyCode::BackTab => app.hash.toggle_field(),
        KeyCode::Backspace => {
            app.hash.active_input().pop();
        }
        KeyCode::Char(c) => app.hash.active_input().push(c),
        _ => {}
    }
    HandleResult::Continue
}

/// Help text for the overlay
pub fn help_text() -> &'static str {
    "Global
  1 / 2 / 3     Array / Hash Table / Graphs tab
  Tab           Next tab
  ?             This help
  q, Ctrl+C     Quit

Array Game
  s, Enter      Start (or play again)
  h/l, Left/Right  Move the cursor
  Space, p      Place the dish
  x, Delete     Remove the dish under the cursor

Hash Table
  i, Enter      Edit key/value (Tab switches field, Enter inserts, Esc cancels)
  j/k           Select an entry
  d             Delete the selected entry

Graphs
  Space, m      Move Thorne one step
  r             Reset the maze"
}

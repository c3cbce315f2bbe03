//! Core application state and tab management

use std::time::{Duration, Instant};

use dsviz_core::array_game::{ArrayGame, Outcome};
use dsviz_core::hash_table::{HashVisualizer, InsertOutcome};
use dsviz_core::maze::{Maze, StepOutcome};
use dsviz_core::timer::Interval;
use dsviz_core::{DsvizConfig, Result};
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::commands::make_rng;

/// Input mode for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keys are game commands
    #[default]
    Normal,
    /// Keys are typed into the hash table's key/value fields
    Edit,
}

/// Active tab, one per game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainTab {
    #[default]
    Array,
    Hash,
    Maze,
}

impl MainTab {
    pub const ALL: [MainTab; 3] = [MainTab::Array, MainTab::Hash, MainTab::Maze];

    pub fn title(self) -> &'static str {
        match self {
            MainTab::Array => "Array Game",
            MainTab::Hash => "Hash Table",
            MainTab::Maze => "Graphs",
        }
    }

    pub fn index(self) -> usize {
        match self {
            MainTab::Array => 0,
            MainTab::Hash => 1,
            MainTab::Maze => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Current input mode
    pub mode: Mode,
    /// Active tab
    pub main_tab: MainTab,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message (shown in status bar)
    pub status_message: Option<String>,
    /// Help overlay text (when showing)
    pub help_text: Option<String>,
    pub array: ArrayGame,
    /// One-second countdown; armed only while the array game is playing and visible
    pub countdown: Interval,
    pub hash: HashVisualizer,
    /// Selected entry in the flattened chain list
    pub hash_selected: usize,
    pub maze: Maze,
    config: DsvizConfig,
    rng: StdRng,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &DsvizConfig, seed: Option<u64>, tab: MainTab) -> Result<Self> {
        let mut rng = make_rng(seed);
        let mut maze = Maze::new(config.maze.grid()?, config.maze.step_delay());
        maze.reset(&mut rng);

        Ok(Self {
            mode: Mode::Normal,
            main_tab: tab,
            should_quit: false,
            status_message: None,
            help_text: None,
            array: ArrayGame::new(config.array.clone()),
            countdown: Interval::new(Duration::from_secs(1)),
            hash: HashVisualizer::new(&config.hash)?,
            hash_selected: 0,
            maze,
            config: config.clone(),
            rng,
        })
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn show_help(&mut self, text: impl Into<String>) {
        self.help_text = Some(text.into());
    }

    pub fn dismiss_help(&mut self) {
        self.help_text = None;
    }

    /// Switch to a tab. Only one game is mounted at a time: leaving a tab
    /// throws its state away and entering one starts it fresh.
    pub fn switch_tab(&mut self, tab: MainTab) {
        if tab == self.main_tab {
            return;
        }
        self.main_tab = tab;
        self.mode = Mode::Normal;
        self.clear_status();
        self.countdown.cancel();

        if let Err(err) = self.mount(tab) {
            warn!(tab = tab.title(), error = %err, "failed to remount tab");
            self.set_status(format!("Could not reset {}: {err}", tab.title()));
        }
        debug!(tab = tab.title(), "switched tab");
    }

    /// Fresh state for the game behind `tab`
    fn mount(&mut self, tab: MainTab) -> Result<()> {
        match tab {
            MainTab::Array => self.array = ArrayGame::new(self.config.array.clone()),
            MainTab::Hash => {
                self.hash = HashVisualizer::new(&self.config.hash)?;
                self.hash_selected = 0;
            }
            MainTab::Maze => {
                self.maze = Maze::new(self.config.maze.grid()?, self.config.maze.step_delay());
                self.maze.reset(&mut self.rng);
            }
        }
        Ok(())
    }

    pub fn next_tab(&mut self) {
        self.switch_tab(self.main_tab.next());
    }

    /// Advance every timer to `now`
    pub fn tick(&mut self, now: Instant) {
        for _ in 0..self.countdown.due(now) {
            let outcome = self.array.tick(&mut self.rng);
            if !matches!(outcome, Outcome::Ticked { .. } | Outcome::Ignored) {
                self.set_status(self.array.message().to_string());
            }
        }
        if !self.array.is_playing() {
            self.countdown.cancel();
        }

        self.hash.expire(now);

        if let Some(step) = self.maze.poll(now) {
            self.set_status(format!(
                "Moved {} to {}",
                step.best.direction.as_str(),
                step.best.pos
            ));
            if self.maze.at_goal() {
                self.set_status(format!("Reached a star gate at {}!", step.best.pos));
            }
        }
    }

    // === Array game ===

    pub fn array_start(&mut self, now: Instant) {
        self.array.start(&mut self.rng);
        self.countdown.arm(now);
        self.set_status(self.array.message().to_string());
    }

    pub fn array_left(&mut self) {
        self.array.move_left();
    }

    pub fn array_right(&mut self) {
        self.array.move_right();
    }

    pub fn array_place(&mut self, now: Instant) {
        match self.array.place(&mut self.rng) {
            Outcome::Ignored => {}
            Outcome::GameOver { .. } => {
                self.countdown.cancel();
                self.set_status(self.array.message().to_string());
            }
            _ => {
                // a fresh target gets a full second before the first tick
                self.countdown.arm(now);
                self.set_status(self.array.message().to_string());
            }
        }
    }

    pub fn array_remove(&mut self) {
        if let Outcome::Removed { index } = self.array.remove() {
            self.set_status(format!("Cleared slot [{index}]"));
        }
    }

    // === Hash table ===

    pub fn hash_submit(&mut self, now: Instant) {
        match self.hash.submit(now) {
            InsertOutcome::Ignored => {
                self.set_status("Key and value are both required");
                return;
            }
            InsertOutcome::Inserted { trace } => {
                self.set_status(format!("Inserted into pod {}", trace.index));
            }
            InsertOutcome::Updated { trace } => {
                self.set_status(format!("Updated value in pod {}", trace.index));
            }
            InsertOutcome::Collided(collision) => {
                self.set_status(format!("Collision in pod {}", collision.index));
            }
        }
        self.mode = Mode::Normal;
    }

    pub fn hash_select_next(&mut self) {
        let len = self.hash.entries().len();
        if len > 0 {
            self.hash_selected = (self.hash_selected + 1) % len;
        }
    }

    pub fn hash_select_prev(&mut self) {
        let len = self.hash.entries().len();
        if len > 0 {
            self.hash_selected = self
                .hash_selected
                .checked_sub(1)
                .unwrap_or(len.saturating_sub(1));
        }
    }

    /// Entry under the selection, as (bucket, key)
    pub fn hash_selected_entry(&self) -> Option<(usize, String)> {
        self.hash
            .entries()
            .get(self.hash_selected)
            .map(|(bucket, entry)| (*bucket, entry.key.clone()))
    }

    pub fn hash_delete_selected(&mut self) {
        let Some((bucket, key)) = self.hash_selected_entry() else {
            return;
        };
        if self.hash.delete(bucket, &key) {
            self.set_status(format!("Removed \"{key}\" from pod {bucket}"));
        }
        let len = self.hash.entries().len();
        self.hash_selected = self.hash_selected.min(len.saturating_sub(1));
    }

    // === Maze ===

    pub fn maze_step(&mut self, now: Instant) {
        match self.maze.begin_step(now) {
            StepOutcome::Stuck => self.set_status("No way out: every neighbour is an asteroid field"),
            StepOutcome::Busy => {}
            StepOutcome::Scheduled(step) => {
                self.set_status(format!("Heading {}...", step.best.direction.as_str()))
            }
            StepOutcome::Moved(_) => {}
        }
    }

    pub fn maze_reset(&mut self) {
        self.maze.reset(&mut self.rng);
        self.set_status("Maze reset with fresh weights");
    }
}

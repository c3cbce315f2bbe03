//! Array indexing game
//!
//! A conveyor of fixed slots and a cursor. Each round names a target slot
//! and a dish; placing the dish at the right index scores, anything else
//! (wrong index or the countdown running out) costs a life.
//!
//! All transitions are synchronous and take the RNG as a parameter. The
//! one-second countdown is driven from outside by calling [`ArrayGame::tick`].

use rand::Rng;
use tracing::{debug, info};

use crate::config::ArrayConfig;

/// Every third consecutive hit adds this much on top of the dish's points
pub const STREAK_BONUS: u32 = 10;

/// A placeable item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dish {
    pub name: &'static str,
    pub symbol: &'static str,
    pub points: u32,
}

pub const MENU: [Dish; 5] = [
    Dish { name: "Salmon Nigiri", symbol: "🍣", points: 10 },
    Dish { name: "Tuna Roll", symbol: "🍱", points: 15 },
    Dish { name: "Shrimp Tempura", symbol: "🦐", points: 20 },
    Dish { name: "California Roll", symbol: "🥢", points: 12 },
    Dish { name: "Dragon Roll", symbol: "🐉", points: 25 },
];

/// What the player is asked to place, and where
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub index: usize,
    pub dish: Dish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Never started
    #[default]
    Idle,
    Playing,
    /// Lives exhausted; only `start` leaves this phase
    GameOver,
}

/// Result of a player action or timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not playing, slot occupied, nothing to remove, and so on
    Ignored,
    Moved { cursor: usize },
    Placed { points: u32, bonus: u32 },
    Removed { index: usize },
    /// Countdown advanced without running out
    Ticked { time_left: u32 },
    /// Wrong index or timeout, with lives remaining
    Missed { lives: u32 },
    GameOver { score: u32 },
}

#[derive(Debug, Clone)]
pub struct ArrayGame {
    config: ArrayConfig,
    slots: Vec<Option<Dish>>,
    cursor: usize,
    score: u32,
    lives: u32,
    streak: u32,
    time_left: u32,
    target: Option<Target>,
    phase: Phase,
    message: String,
}

impl ArrayGame {
    /// Create an idle game. `config.slots` must be non-zero (see `DsvizConfig::validate`).
    pub fn new(config: ArrayConfig) -> Self {
        let slots = vec![None; config.slots.max(1)];
        Self {
            lives: config.lives,
            time_left: config.round_seconds,
            config,
            slots,
            cursor: 0,
            score: 0,
            streak: 0,
            target: None,
            phase: Phase::Idle,
            message: String::from("Press start to play"),
        }
    }

    /// Reset score, lives, streak and slots and pick the first target
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.cursor = 0;
        self.score = 0;
        self.lives = self.config.lives;
        self.streak = 0;
        self.phase = Phase::Playing;
        self.new_target(rng);
        self.message = String::from("Welcome! Place the dish at the correct index!");
        info!(slots = self.slots.len(), lives = self.lives, "array game started");
    }

    pub fn move_left(&mut self) -> Outcome {
        if self.phase != Phase::Playing {
            return Outcome::Ignored;
        }
        self.cursor = self.cursor.saturating_sub(1);
        Outcome::Moved {
            cursor: self.cursor,
        }
    }

    pub fn move_right(&mut self) -> Outcome {
        if self.phase != Phase::Playing {
            return Outcome::Ignored;
        }
        self.cursor = (self.cursor + 1).min(self.slots.len() - 1);
        Outcome::Moved {
            cursor: self.cursor,
        }
    }

    /// Place the target dish at the cursor
    pub fn place<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Outcome {
        if self.phase != Phase::Playing || self.slots[self.cursor].is_some() {
            return Outcome::Ignored;
        }
        let Some(target) = self.target else {
            return Outcome::Ignored;
        };

        if self.cursor != target.index {
            self.message = String::from("Wrong index! Try again!");
            return self.lose_life(rng);
        }

        self.slots[self.cursor] = Some(target.dish);
        self.streak += 1;
        let bonus = (self.streak / 3) * STREAK_BONUS;
        let points = target.dish.points + bonus;
        self.score += points;
        self.message = if bonus > 0 {
            format!("Perfect! Streak bonus: +{bonus} points!")
        } else {
            String::from("Perfect!")
        };
        debug!(index = self.cursor, points, streak = self.streak, "dish placed");

        self.new_target(rng);
        Outcome::Placed { points, bonus }
    }

    /// Clear the slot under the cursor
    pub fn remove(&mut self) -> Outcome {
        if self.phase != Phase::Playing {
            return Outcome::Ignored;
        }
        match self.slots[self.cursor].take() {
            Some(_) => Outcome::Removed { index: self.cursor },
            None => Outcome::Ignored,
        }
    }

    /// Advance the countdown by one second. Running out counts as a miss.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Outcome {
        if self.phase != Phase::Playing {
            return Outcome::Ignored;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return Outcome::Ticked {
                time_left: self.time_left,
            };
        }

        debug!("round timed out");
        self.message = String::from("Time's up!");
        self.lose_life(rng)
    }

    fn lose_life<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Outcome {
        self.streak = 0;
        self.lives = self.lives.saturating_sub(1);

        if self.lives == 0 {
            self.phase = Phase::GameOver;
            self.target = None;
            self.message = String::from("Game Over!");
            info!(score = self.score, "array game over");
            return Outcome::GameOver { score: self.score };
        }

        self.new_target(rng);
        Outcome::Missed { lives: self.lives }
    }

    fn new_target<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let index = rng.gen_range(0..self.slots.len());
        let dish = MENU[rng.gen_range(0..MENU.len())];
        self.target = Some(Target { index, dish });
        self.time_left = self.config.round_seconds;
    }

    pub fn slots(&self) -> &[Option<Dish>] {
        &self.slots
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    #[cfg(test)]
    pub(crate) fn set_target(&mut self, index: usize, dish: Dish) {
        self.target = Some(Target { index, dish });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started() -> (ArrayGame, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let mut game = ArrayGame::new(ArrayConfig::default());
        game.start(&mut rng);
        (game, rng)
    }

    /// Walk the cursor to the current target and place it
    fn hit(game: &mut ArrayGame, rng: &mut StdRng) -> Outcome {
        let target = game.target().unwrap();
        // clear the way in case the target landed on a filled slot
        while game.cursor() > target.index {
            game.move_left();
        }
        while game.cursor() < target.index {
            game.move_right();
        }
        game.remove();
        game.place(rng)
    }

    #[test]
    fn test_idle_game_ignores_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = ArrayGame::new(ArrayConfig::default());
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.move_right(), Outcome::Ignored);
        assert_eq!(game.place(&mut rng), Outcome::Ignored);
        assert_eq!(game.tick(&mut rng), Outcome::Ignored);
        assert_eq!(game.cursor(), 0);
    }

    #[test]
    fn test_cursor_is_clamped() {
        let (mut game, _) = started();
        assert_eq!(game.move_left(), Outcome::Moved { cursor: 0 });
        for _ in 0..20 {
            game.move_right();
        }
        assert_eq!(game.cursor(), 5);
    }

    #[test]
    fn test_streak_bonus_on_third_hit() {
        let (mut game, mut rng) = started();
        let mut awarded = Vec::new();
        for _ in 0..3 {
            let dish = MENU[0];
            game.set_target(game.cursor(), dish);
            game.remove();
            match game.place(&mut rng) {
                Outcome::Placed { points, bonus } => awarded.push((points, bonus)),
                other => panic!("expected placement, got {other:?}"),
            }
        }
        assert_eq!(awarded, vec![(10, 0), (10, 0), (20, 10)]);
        assert_eq!(game.score(), 40);
        assert_eq!(game.streak(), 3);
    }

    #[test]
    fn test_hit_resets_timer_and_picks_new_target() {
        let (mut game, mut rng) = started();
        game.tick(&mut rng);
        game.tick(&mut rng);
        assert_eq!(game.time_left(), 28);

        assert!(matches!(hit(&mut game, &mut rng), Outcome::Placed { .. }));
        assert_eq!(game.time_left(), 30);
        assert!(game.target().is_some());
    }

    #[test]
    fn test_occupied_slot_is_silent_noop() {
        let (mut game, mut rng) = started();
        game.set_target(0, MENU[1]);
        game.place(&mut rng);
        assert!(game.slots()[0].is_some());

        // target elsewhere, but the slot is full so nothing happens
        game.set_target(3, MENU[1]);
        assert_eq!(game.place(&mut rng), Outcome::Ignored);
        assert_eq!(game.lives(), 3);
    }

    #[test]
    fn test_miss_costs_life_and_streak() {
        let (mut game, mut rng) = started();
        game.set_target(0, MENU[0]);
        game.place(&mut rng);
        assert_eq!(game.streak(), 1);

        game.set_target(4, MENU[0]);
        game.move_right();
        assert_eq!(game.place(&mut rng), Outcome::Missed { lives: 2 });
        assert_eq!(game.streak(), 0);
        assert_eq!(game.slots()[1], None);
    }

    #[test]
    fn test_three_misses_end_the_game() {
        let (mut game, mut rng) = started();
        game.move_right();
        game.set_target(0, MENU[0]);
        game.place(&mut rng);
        game.set_target(0, MENU[0]);
        game.place(&mut rng);
        game.set_target(0, MENU[0]);
        assert_eq!(game.place(&mut rng), Outcome::GameOver { score: 0 });
        assert_eq!(game.phase(), Phase::GameOver);

        // nothing is accepted until restart
        game.set_target(1, MENU[0]);
        assert_eq!(game.place(&mut rng), Outcome::Ignored);
        assert_eq!(game.remove(), Outcome::Ignored);

        game.start(&mut rng);
        assert!(game.is_playing());
        assert_eq!(game.lives(), 3);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_timeouts_count_as_misses() {
        let (mut game, mut rng) = started();
        let mut outcomes = Vec::new();
        for _ in 0..90 {
            let outcome = game.tick(&mut rng);
            if !matches!(outcome, Outcome::Ticked { .. }) {
                outcomes.push(outcome);
            }
        }
        assert_eq!(
            outcomes,
            vec![
                Outcome::Missed { lives: 2 },
                Outcome::Missed { lives: 1 },
                Outcome::GameOver { score: 0 },
            ]
        );
        assert_eq!(game.message(), "Game Over!");
    }

    #[test]
    fn test_remove_does_not_touch_score() {
        let (mut game, mut rng) = started();
        game.set_target(0, MENU[4]);
        game.place(&mut rng);
        assert_eq!(game.score(), 25);

        assert_eq!(game.remove(), Outcome::Removed { index: 0 });
        assert_eq!(game.remove(), Outcome::Ignored);
        assert_eq!(game.score(), 25);
        assert_eq!(game.lives(), 3);
    }
}

pub mod array_game;
pub mod config;
pub mod error;
pub mod graph;
pub mod hash_table;
pub mod maze;
pub mod timer;

pub use array_game::{ArrayGame, Dish, Outcome, Phase, Target, MENU};
pub use config::DsvizConfig;
pub use error::{DsvizError, Result};
pub use graph::{Edge, EdgeStyle, Graph, Node};
pub use hash_table::{ChainedTable, Collision, HashTrace, HashVisualizer, InsertOutcome, Operation};
pub use maze::{Cell, Direction, Grid, Maze, Pos, Step, StepOutcome};
pub use timer::{Delayed, Interval, Notice};

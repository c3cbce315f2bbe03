//! Maze navigator: a small grid, random per-cell weights, and a greedy walker.
//!
//! The walker has no memory and no notion of the goal. Each step looks at
//! the current cell's passable neighbours and moves to the heaviest one.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DsvizError, Result};
use crate::graph::{Edge, EdgeStyle, Graph, Node, NodePayload};
use crate::timer::Delayed;

/// Weights are drawn from `[0, MAX_WEIGHT)`
pub const MAX_WEIGHT: f64 = 0.5;

/// Spacing between node positions handed to the renderer
pub const NODE_SPACING: i32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Open,
    /// Impassable
    Hazard,
    Goal,
    Start,
    Portal(u8),
}

impl Cell {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            'O' => Some(Cell::Open),
            'A' => Some(Cell::Hazard),
            'S' => Some(Cell::Goal),
            'T' => Some(Cell::Start),
            d if d.is_ascii_digit() => Some(Cell::Portal(d as u8 - b'0')),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Cell::Open => 'O',
            Cell::Hazard => 'A',
            Cell::Goal => 'S',
            Cell::Start => 'T',
            Cell::Portal(n) => char::from(b'0' + n),
        }
    }

    pub fn is_passable(self) -> bool {
        self != Cell::Hazard
    }
}

/// Grid coordinate: `x` is the column, `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Node id used in the rendered graph: `"row-col"`
    pub fn node_id(self) -> String {
        format!("{}-{}", self.y, self.x)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// Enumeration order; also the tie-break order
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Up => "up",
        }
    }
}

/// Immutable cell layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    spawn: Pos,
}

impl Grid {
    /// Parse rows of cell characters. Rows must be equally long and
    /// exactly one `T` start cell must exist.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        if rows.is_empty() {
            return Err(DsvizError::invalid_layout(0, 0, "layout has no rows"));
        }

        let mut cells = Vec::with_capacity(rows.len());
        let mut spawn = None;
        let width = rows[0].as_ref().chars().count();
        if width == 0 {
            return Err(DsvizError::invalid_layout(0, 0, "layout has no columns"));
        }

        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != width {
                return Err(DsvizError::invalid_layout(
                    y,
                    0,
                    format!("expected {width} cells, found {}", row.chars().count()),
                ));
            }
            let mut parsed = Vec::with_capacity(width);
            for (x, ch) in row.chars().enumerate() {
                let cell = Cell::from_char(ch)
                    .ok_or_else(|| DsvizError::invalid_layout(y, x, format!("unknown cell '{ch}'")))?;
                if cell == Cell::Start {
                    if spawn.is_some() {
                        return Err(DsvizError::invalid_layout(y, x, "more than one start cell"));
                    }
                    spawn = Some(Pos::new(x, y));
                }
                parsed.push(cell);
            }
            cells.push(parsed);
        }

        let spawn = spawn.ok_or_else(|| DsvizError::invalid_layout(0, 0, "no start cell 'T'"))?;
        Ok(Self { cells, spawn })
    }

    pub fn width(&self) -> usize {
        self.cells[0].len()
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn spawn(&self) -> Pos {
        self.spawn
    }

    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        self.cells.get(pos.y)?.get(pos.x).copied()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Every coordinate, row-major
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height()).flat_map(move |y| (0..self.width()).map(move |x| Pos::new(x, y)))
    }

    /// Neighbour in `dir`, if it is inside the grid
    pub fn neighbor(&self, pos: Pos, dir: Direction) -> Option<Pos> {
        let next = match dir {
            Direction::Right => Pos::new(pos.x + 1, pos.y),
            Direction::Down => Pos::new(pos.x, pos.y + 1),
            Direction::Left => Pos::new(pos.x.checked_sub(1)?, pos.y),
            Direction::Up => Pos::new(pos.x, pos.y.checked_sub(1)?),
        };
        self.cell(next).map(|_| next)
    }

    /// In-bounds, non-hazard neighbours in enumeration order
    pub fn open_neighbors(&self, pos: Pos) -> Vec<(Direction, Pos)> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| {
                let next = self.neighbor(pos, dir)?;
                self.cell(next)
                    .filter(|cell| cell.is_passable())
                    .map(|_| (dir, next))
            })
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        // DEFAULT_LAYOUT is a known-good layout
        match Grid::parse(&crate::config::DEFAULT_LAYOUT) {
            Ok(grid) => grid,
            Err(err) => unreachable!("default layout is invalid: {err}"),
        }
    }
}

/// A neighbour considered by a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub direction: Direction,
    pub pos: Pos,
    pub weight: f64,
}

/// One greedy decision: where the walker was, where it goes, and the worst option it skipped
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub from: Pos,
    pub best: Candidate,
    /// Lowest-weighted candidate; `None` when it would be the best one
    pub worst: Option<Candidate>,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// No passable neighbours
    Stuck,
    /// A move is already in flight
    Busy,
    Scheduled(Step),
    Moved(Step),
}

#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    weights: BTreeMap<Pos, f64>,
    agent: Pos,
    last_step: Option<Step>,
    pending: Delayed<Step>,
}

impl Maze {
    /// Create a maze with all weights at zero; call [`Maze::reset`] to randomize
    pub fn new(grid: Grid, step_delay: Duration) -> Self {
        Self {
            agent: grid.spawn(),
            grid,
            weights: BTreeMap::new(),
            last_step: None,
            pending: Delayed::new(step_delay),
        }
    }

    /// Fresh weights for every passable cell; walker back to spawn
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.weights = self
            .grid
            .positions()
            .filter(|&pos| self.grid.cell(pos).is_some_and(Cell::is_passable))
            .map(|pos| (pos, rng.gen_range(0.0..MAX_WEIGHT)))
            .collect();
        self.agent = self.grid.spawn();
        self.last_step = None;
        self.pending.cancel();
        info!(spawn = %self.agent, cells = self.weights.len(), "maze reset");
    }

    /// Override one weight (scenario setup and tests)
    pub fn set_weight(&mut self, pos: Pos, weight: f64) {
        self.weights.insert(pos, weight);
    }

    pub fn weight(&self, pos: Pos) -> f64 {
        self.weights.get(&pos).copied().unwrap_or(0.0)
    }

    /// Decide the next move without taking it
    pub fn plan(&self) -> Option<Step> {
        let candidates: Vec<Candidate> = self
            .grid
            .open_neighbors(self.agent)
            .into_iter()
            .map(|(direction, pos)| Candidate {
                direction,
                pos,
                weight: self.weight(pos),
            })
            .collect();

        let mut best = *candidates.first()?;
        let mut worst = best;
        for candidate in &candidates[1..] {
            // strict comparison keeps the earliest direction on ties
            if candidate.weight > best.weight {
                best = *candidate;
            }
            // the last of equally-light candidates is the worst, matching a stable descending sort
            if candidate.weight <= worst.weight {
                worst = *candidate;
            }
        }

        Some(Step {
            from: self.agent,
            best,
            worst: (worst.pos != best.pos).then_some(worst),
            candidates,
        })
    }

    /// Take one step immediately
    pub fn step(&mut self) -> StepOutcome {
        if self.pending.is_pending() {
            return StepOutcome::Busy;
        }
        match self.plan() {
            Some(step) => {
                self.land(step.clone());
                StepOutcome::Moved(step)
            }
            None => StepOutcome::Stuck,
        }
    }

    /// Plan a step that lands after the animation delay
    pub fn begin_step(&mut self, now: Instant) -> StepOutcome {
        if self.pending.is_pending() {
            return StepOutcome::Busy;
        }
        let Some(step) = self.plan() else {
            debug!(at = %self.agent, "no passable neighbours");
            return StepOutcome::Stuck;
        };
        self.pending.schedule(step.clone(), now);
        StepOutcome::Scheduled(step)
    }

    /// Land a scheduled step if its delay has passed
    pub fn poll(&mut self, now: Instant) -> Option<Step> {
        let step = self.pending.take_due(now)?;
        self.land(step.clone());
        Some(step)
    }

    fn land(&mut self, step: Step) {
        debug!(
            from = %step.from,
            to = %step.best.pos,
            direction = step.best.direction.as_str(),
            weight = step.best.weight,
            "walker moved"
        );
        self.agent = step.best.pos;
        self.last_step = Some(step);
    }

    pub fn agent(&self) -> Pos {
        self.agent
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn last_step(&self) -> Option<&Step> {
        self.last_step.as_ref()
    }

    pub fn is_moving(&self) -> bool {
        self.pending.is_pending()
    }

    /// The step waiting to land, if any
    pub fn pending_step(&self) -> Option<&Step> {
        self.pending.peek()
    }

    pub fn at_goal(&self) -> bool {
        self.grid.cell(self.agent) == Some(Cell::Goal)
    }

    /// Style for the edge between two adjacent cells, from the last step
    pub fn edge_style(&self, a: Pos, b: Pos) -> EdgeStyle {
        let Some(step) = &self.last_step else {
            return EdgeStyle::Plain;
        };
        let touches = |target: Pos| {
            (a == step.from && b == target) || (b == step.from && a == target)
        };
        if touches(step.best.pos) {
            EdgeStyle::Best
        } else if step.worst.is_some_and(|worst| touches(worst.pos)) {
            EdgeStyle::Worst
        } else {
            EdgeStyle::Plain
        }
    }

    /// Node and edge lists for a graph renderer
    pub fn graph(&self) -> Graph {
        let nodes = self
            .grid
            .positions()
            .filter_map(|pos| {
                let cell = self.grid.cell(pos)?;
                Some(Node {
                    id: pos.node_id(),
                    position: (pos.x as i32 * NODE_SPACING, pos.y as i32 * NODE_SPACING),
                    data: NodePayload {
                        cell,
                        weight: self.weights.get(&pos).copied(),
                        is_agent: pos == self.agent,
                    },
                })
            })
            .collect();

        let mut edges = Vec::new();
        for pos in self.grid.positions() {
            if !self.grid.cell(pos).is_some_and(Cell::is_passable) {
                continue;
            }
            for dir in [Direction::Right, Direction::Down] {
                let Some(next) = self.grid.neighbor(pos, dir) else {
                    continue;
                };
                if !self.grid.cell(next).is_some_and(Cell::is_passable) {
                    continue;
                }
                edges.push(Edge {
                    id: format!("e{}-{}", pos.node_id(), next.node_id()),
                    source: pos.node_id(),
                    target: next.node_id(),
                    style: self.edge_style(pos, next),
                });
            }
        }

        Graph { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn maze(rows: &[&str]) -> Maze {
        Maze::new(Grid::parse(rows).unwrap(), Duration::from_millis(500))
    }

    #[test]
    fn test_default_grid() {
        let grid = Grid::default();
        assert_eq!((grid.width(), grid.height()), (4, 4));
        assert_eq!(grid.spawn(), Pos::new(0, 1));
        assert_eq!(grid.cell(Pos::new(1, 1)), Some(Cell::Portal(1)));
        assert_eq!(grid.cell(Pos::new(3, 0)), Some(Cell::Goal));
        assert_eq!(grid.cell(Pos::new(4, 0)), None);
    }

    #[test]
    fn test_layout_errors() {
        assert!(Grid::parse::<&str>(&[]).is_err());
        assert!(Grid::parse(&["OO", "O"]).is_err());
        assert!(Grid::parse(&["OZ", "TO"]).is_err());
        assert!(Grid::parse(&["OO", "OO"]).is_err());
        assert!(Grid::parse(&["TT"]).is_err());
    }

    #[test]
    fn test_reset_weights_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut maze = Maze::new(Grid::default(), Duration::from_millis(500));
        maze.reset(&mut rng);
        for pos in maze.grid().positions() {
            let weight = maze.weight(pos);
            if maze.grid().cell(pos) == Some(Cell::Hazard) {
                assert_eq!(weight, 0.0);
            } else {
                assert!((0.0..MAX_WEIGHT).contains(&weight));
            }
        }
    }

    #[test]
    fn test_step_picks_heaviest() {
        // walker at (0,0): right (1,0) and down (0,1) are open
        let mut maze = maze(&["TO", "OA"]);
        maze.set_weight(Pos::new(1, 0), 0.4);
        maze.set_weight(Pos::new(0, 1), 0.1);

        match maze.step() {
            StepOutcome::Moved(step) => {
                assert_eq!(step.best.direction, Direction::Right);
                assert_eq!(step.worst.map(|w| w.pos), Some(Pos::new(0, 1)));
            }
            other => panic!("expected move, got {other:?}"),
        }
        assert_eq!(maze.agent(), Pos::new(1, 0));
    }

    #[test]
    fn test_step_surrounded_by_hazards_is_noop() {
        let mut maze = maze(&["TA", "AO"]);
        assert_eq!(maze.step(), StepOutcome::Stuck);
        assert_eq!(maze.agent(), Pos::new(0, 0));
        assert!(maze.last_step().is_none());
    }

    #[test]
    fn test_ties_follow_enumeration_order() {
        // walker in the middle, all four neighbours open and equally weighted
        let mut maze = maze(&["AOA", "OTO", "AOA"]);
        for pos in [Pos::new(2, 1), Pos::new(1, 2), Pos::new(0, 1), Pos::new(1, 0)] {
            maze.set_weight(pos, 0.2);
        }
        let step = maze.plan().unwrap();
        assert_eq!(step.best.direction, Direction::Right);
        assert_eq!(step.worst.map(|w| w.direction), Some(Direction::Up));
    }

    #[test]
    fn test_single_candidate_has_no_worst() {
        let mut maze = maze(&["TO"]);
        let step = maze.plan().unwrap();
        assert!(step.worst.is_none());
        maze.step();
        assert_eq!(maze.edge_style(Pos::new(0, 0), Pos::new(1, 0)), EdgeStyle::Best);
    }

    #[test]
    fn test_edge_styles_after_step() {
        let mut maze = maze(&["TO", "OA"]);
        maze.set_weight(Pos::new(1, 0), 0.4);
        maze.set_weight(Pos::new(0, 1), 0.1);
        maze.step();

        let graph = maze.graph();
        let style = |id: &str| graph.edges.iter().find(|e| e.id == id).unwrap().style;
        assert_eq!(style("e0-0-0-1"), EdgeStyle::Best);
        assert_eq!(style("e0-0-1-0"), EdgeStyle::Worst);
        // (1,0) -> (1,1) is a hazard, so no edge
        assert_eq!(graph.edges.len(), 2);
        assert!(graph.nodes.iter().any(|n| n.id == "0-1" && n.data.is_agent));
    }

    #[test]
    fn test_animated_step_lands_after_delay() {
        let t0 = Instant::now();
        let mut maze = maze(&["TO"]);
        assert!(matches!(maze.begin_step(t0), StepOutcome::Scheduled(_)));
        assert_eq!(maze.begin_step(t0), StepOutcome::Busy);
        assert!(maze.poll(t0 + Duration::from_millis(100)).is_none());
        assert_eq!(maze.agent(), Pos::new(0, 0));

        assert!(maze.poll(t0 + Duration::from_millis(500)).is_some());
        assert_eq!(maze.agent(), Pos::new(1, 0));
        assert!(!maze.is_moving());
    }

    #[test]
    fn test_reset_cancels_pending_move() {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(9);
        let mut maze = maze(&["TO"]);
        maze.begin_step(t0);
        assert_eq!(maze.pending_step().map(|step| step.best.pos), Some(Pos::new(1, 0)));
        maze.reset(&mut rng);
        assert!(maze.pending_step().is_none());
        assert!(maze.poll(t0 + Duration::from_secs(1)).is_none());
        assert_eq!(maze.agent(), Pos::new(0, 0));
    }
}

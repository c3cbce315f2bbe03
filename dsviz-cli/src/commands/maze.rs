//! `dsviz maze` - walk the maze without the TUI

use anyhow::{Context, Result};
use clap::Parser;
use dsviz_core::maze::{Cell, Maze, StepOutcome};
use dsviz_core::DsvizConfig;

use super::make_rng;

#[derive(Parser, Debug)]
pub struct MazeArgs {
    /// Number of greedy steps to take after the reset
    #[arg(long, short, default_value_t = 1)]
    pub steps: usize,

    /// Print the node/edge list as JSON instead of the grid
    #[arg(long)]
    pub json: bool,
}

pub fn run_maze(args: MazeArgs, config: &DsvizConfig, seed: Option<u64>) -> Result<()> {
    let grid = config.maze.grid().context("Invalid maze layout in config")?;
    let mut maze = Maze::new(grid, config.maze.step_delay());
    let mut rng = make_rng(seed);
    maze.reset(&mut rng);

    let mut log = Vec::new();
    for n in 1..=args.steps {
        match maze.step() {
            StepOutcome::Moved(step) => log.push(format!(
                "step {n}: {} -> {} {} (weight {:.3})",
                step.from,
                step.best.pos,
                step.best.direction.as_str(),
                step.best.weight
            )),
            StepOutcome::Stuck => {
                log.push(format!("step {n}: stuck at {}", maze.agent()));
                break;
            }
            StepOutcome::Busy | StepOutcome::Scheduled(_) => {}
        }
    }

    if args.json {
        println!("{}", maze.graph().to_json_pretty()?);
        return Ok(());
    }

    for line in &log {
        println!("{line}");
    }
    println!();
    for (y, row) in maze.grid().rows().iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(x, cell)| {
                let pos = dsviz_core::Pos::new(x, y);
                if pos == maze.agent() {
                    "  @  ".to_string()
                } else if *cell == Cell::Hazard {
                    "  #  ".to_string()
                } else {
                    format!("{}{:.2}", cell.as_char(), maze.weight(pos))
                }
            })
            .collect();
        println!("{}", cells.join(" "));
    }
    if maze.at_goal() {
        println!("\nReached a star gate!");
    }

    Ok(())
}

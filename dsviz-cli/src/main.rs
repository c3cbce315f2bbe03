//! dsviz - Data structures visualizer for the terminal
//!
//! Three small games, each behind a tab:
//! - Array indexing game (place dishes at the target index against the clock)
//! - Hash table collision demo (character-sum hashing with chaining)
//! - Maze navigator (greedy walk over random cell weights)
//!
//! `dsviz` with no command starts the TUI. `hash` and `maze` run the same
//! logic non-interactively for scripts and quick checks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dsviz_core::DsvizConfig;
use tracing::debug;

mod commands;
mod config;
mod tracing_setup;
mod tui;

#[derive(Parser, Debug)]
#[command(
    name = "dsviz",
    author,
    version,
    about = "Interactive data structure games: array indexing, hash collisions, maze walking",
    long_about = "Learn how arrays, hash tables and graphs behave by playing with them. \
                  Run without a command to open the terminal UI."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.dsviz/config.toml)
    #[arg(long, global = true, env = "DSVIZ_CONFIG")]
    config: Option<PathBuf>,

    /// Fixed RNG seed (overrides `seed` in config)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the terminal UI (default)
    Play(PlayArgs),
    /// Insert key=value pairs into a fresh hash table and show collisions
    Hash(commands::hash::HashArgs),
    /// Reset the maze and take greedy steps
    Maze(commands::maze::MazeArgs),
    /// Manage dsviz configuration (init, show, validate, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug, Default)]
struct PlayArgs {
    /// Tab to open first
    #[arg(long, value_enum, default_value_t = TabArg::Array)]
    tab: TabArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TabArg {
    #[default]
    Array,
    Hash,
    Maze,
}

impl From<TabArg> for tui::MainTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Array => tui::MainTab::Array,
            TabArg::Hash => tui::MainTab::Hash,
            TabArg::Maze => tui::MainTab::Maze,
        }
    }
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(DsvizConfig::config_path);
    let command = cli.command.unwrap_or(Commands::Play(PlayArgs::default()));

    let log_file = match command {
        Commands::Play(_) => Some(DsvizConfig::home_dir().join("dsviz.log")),
        _ => None,
    };
    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        log_file,
    })
    .ok();

    match command {
        // config commands must work even when the file on disk is broken
        Commands::Config(args) => config::run_config(args, &config_path)?,
        Commands::Play(args) => {
            let config = load_config(&config_path)?;
            let seed = cli.seed.or(config.seed);
            tui::run(&config, seed, args.tab.into())?
        }
        Commands::Hash(args) => commands::run_hash(args, &load_config(&config_path)?)?,
        Commands::Maze(args) => {
            let config = load_config(&config_path)?;
            let seed = cli.seed.or(config.seed);
            commands::run_maze(args, &config, seed)?
        }
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<DsvizConfig> {
    let config = DsvizConfig::load_from(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    debug!(path = %path.display(), seed = ?config.seed, "config loaded");
    Ok(config)
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dsviz_core::DsvizConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with every default spelled out
    Init(InitArgs),
    /// Print the effective config as TOML
    Show,
    /// Load and validate the config file
    Validate,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, path),
        ConfigCommands::Show => run_show(path),
        ConfigCommands::Validate => run_validate(path),
        ConfigCommands::Path => run_path(path),
    }
}

fn run_init(args: InitArgs, path: &Path) -> Result<()> {
    if path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            path
        ));
    }

    DsvizConfig::default()
        .save_to(path)
        .context(format!("Failed to write config file: {:?}", path))?;

    println!("✅ Created config at: {:?}", path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", path);
    println!("  2. Run: dsviz config validate");

    Ok(())
}

fn run_show(path: &Path) -> Result<()> {
    let config = DsvizConfig::load_from(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let toml_str = config.to_toml().context("Failed to serialize config to TOML")?;
    println!("{}", toml_str);

    Ok(())
}

fn run_validate(path: &Path) -> Result<()> {
    println!("🔍 Validating configuration...");

    if !path.exists() {
        println!("   ⚠ No config at {}, defaults apply", path.display());
    }

    let config = DsvizConfig::load_from(path)
        .with_context(|| format!("Invalid config at {}", path.display()))?;

    println!(
        "   ✓ Array: {} slots, {} lives, {}s rounds",
        config.array.slots, config.array.lives, config.array.round_seconds
    );
    println!("   ✓ Hash: {} buckets", config.hash.buckets);
    let grid = config.maze.grid()?;
    println!("   ✓ Maze: {}x{} grid, spawn {}", grid.width(), grid.height(), grid.spawn());
    println!("\n✅ Configuration valid!");

    Ok(())
}

fn run_path(path: &Path) -> Result<()> {
    println!("{}", path.display());
    Ok(())
}

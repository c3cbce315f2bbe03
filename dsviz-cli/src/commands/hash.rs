//! `dsviz hash` - run inserts against a fresh table and show the working

use anyhow::{anyhow, Result};
use clap::Parser;
use dsviz_core::hash_table::{ChainedTable, InsertOutcome};
use dsviz_core::DsvizConfig;

#[derive(Parser, Debug)]
pub struct HashArgs {
    /// Entries to insert, in order, as key=value
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub entries: Vec<String>,

    /// Bucket count (defaults to hash.buckets from config)
    #[arg(long, short)]
    pub buckets: Option<usize>,
}

fn parse_entry(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .ok_or_else(|| anyhow!("Expected key=value, got '{}'", raw))
}

pub fn run_hash(args: HashArgs, config: &DsvizConfig) -> Result<()> {
    let buckets = args.buckets.unwrap_or(config.hash.buckets);
    let mut table = ChainedTable::new(buckets)?;

    for raw in &args.entries {
        let (key, value) = parse_entry(raw)?;
        match table.insert(key, value) {
            InsertOutcome::Ignored => {
                println!("skip {raw:?}: key and value must both be non-empty");
            }
            InsertOutcome::Inserted { trace } => {
                println!("insert {key}={value}: {trace}");
            }
            InsertOutcome::Updated { trace } => {
                println!("update {key}={value}: {trace}");
            }
            InsertOutcome::Collided(collision) => {
                println!("insert {key}={value}: {}", collision.trace);
                println!("  ⚡ Collision Detected! ⚡");
                println!(
                    "  Pod {} already contains: {}",
                    collision.index,
                    collision.existing_keys.join(", ")
                );
                println!(
                    "  New key \"{}\" hashed to the same location, chained",
                    collision.new_key
                );
            }
        }
    }

    println!();
    for index in 0..table.bucket_count() {
        match table.bucket(index) {
            Some(chain) => {
                let entries: Vec<String> = chain
                    .iter()
                    .map(|entry| format!("{}: {}", entry.key, entry.value))
                    .collect();
                println!("[{index}] {}", entries.join(" -> "));
            }
            None => println!("[{index}] (empty pod)"),
        }
    }

    Ok(())
}

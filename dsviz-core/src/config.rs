use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DsvizError, Result};
use crate::maze::Grid;

/// Default maze, row-major: `O` open, `A` hazard, `S` goal, `T` start, digit portal
pub const DEFAULT_LAYOUT: [&str; 4] = ["OOAS", "T1OA", "AO1O", "SAOO"];

/// Settings for all three games plus the terminal front-end.
///
/// Every field has a default, so an empty or partial file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DsvizConfig {
    /// Fixed RNG seed for reproducible sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub array: ArrayConfig,
    pub hash: HashConfig,
    pub maze: MazeConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayConfig {
    pub slots: usize,
    pub lives: u32,
    pub round_seconds: u32,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            slots: 6,
            lives: 3,
            round_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    pub buckets: usize,
    pub collision_notice_ms: u64,
    pub highlight_ms: u64,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            buckets: 8,
            collision_notice_ms: 5000,
            highlight_ms: 2000,
        }
    }
}

impl HashConfig {
    pub fn collision_notice(&self) -> Duration {
        Duration::from_millis(self.collision_notice_ms)
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub layout: Vec<String>,
    pub step_delay_ms: u64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            layout: DEFAULT_LAYOUT.iter().map(|row| row.to_string()).collect(),
            step_delay_ms: 500,
        }
    }
}

impl MazeConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// Parse the configured layout
    pub fn grid(&self) -> Result<Grid> {
        Grid::parse(&self.layout)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Input poll timeout, which is also the timer resolution
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 100 }
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl DsvizConfig {
    /// Load config from `DSVIZ_CONFIG` or ~/.dsviz/config.toml.
    ///
    /// A missing file is not an error: defaults apply.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path, falling back to defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| DsvizError::toml_parse(path, e))?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Get config file path: `$DSVIZ_CONFIG` or ~/.dsviz/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var("DSVIZ_CONFIG") {
            return PathBuf::from(path);
        }
        Self::home_dir().join("config.toml")
    }

    /// Directory for config and log files: ~/.dsviz
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dsviz")
    }

    /// Reject values no game can run with
    pub fn validate(&self) -> Result<()> {
        if self.array.slots == 0 {
            return Err(DsvizError::config("array.slots must be at least 1"));
        }
        if self.array.lives == 0 {
            return Err(DsvizError::config("array.lives must be at least 1"));
        }
        if self.array.round_seconds == 0 {
            return Err(DsvizError::config("array.round_seconds must be at least 1"));
        }
        if self.hash.buckets == 0 {
            return Err(DsvizError::config("hash.buckets must be at least 1"));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(DsvizError::config("ui.tick_rate_ms must be at least 1"));
        }
        self.maze.grid()?;
        Ok(())
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write this config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DsvizConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, DsvizConfig::default());
        assert_eq!(config.hash.buckets, 8);
        assert_eq!(config.array.slots, 6);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "seed = 7\n[hash]\nbuckets = 4\n").unwrap();

        let config = DsvizConfig::load_from(&path).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.hash.buckets, 4);
        assert_eq!(config.hash.collision_notice_ms, 5000);
        assert_eq!(config.maze.layout.len(), 4);
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[hash]\nbuckets = 0\n").unwrap();

        let err = DsvizConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, DsvizError::Config { .. }));
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[hash\n").unwrap();

        let err = DsvizConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, DsvizError::TomlParse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = DsvizConfig::default();
        config.array.lives = 5;
        config.save_to(&path).unwrap();

        assert_eq!(DsvizConfig::load_from(&path).unwrap(), config);
    }
}

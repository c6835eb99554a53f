//! Application configuration
//!
//! Bundles the game and agent settings with the model directory. Loaded from a
//! JSON file; fields left out of the file keep their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::game::GameConfig;
use crate::rl::DqnConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub dqn: DqnConfig,
    /// Directory holding the saved model
    pub model_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            dqn: DqnConfig::default(),
            model_dir: PathBuf::from("model"),
        }
    }
}

impl AppConfig {
    /// Read a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: AppConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        self.dqn.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model_dir, PathBuf::from("model"));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "dqn": { "memory_capacity": 10, "batch_size": 4, "learning_rate": 0.01,
                 "gamma": 0.5, "hidden_size": 8, "exploration_games": 10,
                 "exploration_range": 20 },
                 "model_dir": "elsewhere" }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.dqn.batch_size, 4);
        assert_eq!(config.model_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.game.width, 640);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_fields_keep_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "dqn": { "batch_size": 4 }, "game": { "width": 400 } }"#)
            .unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.dqn.batch_size, 4);
        assert_eq!(config.dqn.memory_capacity, 100_000);
        assert_eq!(config.dqn.gamma, 0.9);
        assert_eq!(config.game.width, 400);
        assert_eq!(config.game.height, 480);
        assert_eq!(config.game.block_size, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(AppConfig::load(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_validate_reports_game_errors_first() {
        let mut config = AppConfig::default();
        config.game.initial_snake_length = 1;
        config.dqn.memory_capacity = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnakeTooShort { .. })
        ));
    }
}

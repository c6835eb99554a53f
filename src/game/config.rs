use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shortest snake the environment will start with
pub const MIN_SNAKE_LENGTH: usize = 3;

/// Configuration for the game
///
/// Coordinates are in pixels; the grid is made of square blocks of
/// `block_size` pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playing field in pixels
    pub width: i32,
    /// Height of the playing field in pixels
    pub height: i32,
    /// Side of one grid cell in pixels
    pub block_size: i32,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Rewards (for RL)
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for dying
    pub death_penalty: f32,

    /// An episode ends once the frame counter exceeds this many frames per
    /// body segment
    pub idle_budget_factor: u32,
    /// Random draws tried before food placement falls back to scanning
    pub max_food_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            block_size: 20,
            initial_snake_length: MIN_SNAKE_LENGTH,
            food_reward: 10.0,
            death_penalty: -10.0,
            idle_budget_factor: 100,
            max_food_attempts: 1024,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a grid of `columns` x `rows` blocks
    pub fn with_blocks(columns: i32, rows: i32) -> Self {
        let block_size = Self::default().block_size;
        Self {
            width: columns * block_size,
            height: rows * block_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::with_blocks(10, 10)
    }

    /// Number of block columns
    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    /// Number of block rows
    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Check the geometry and limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size <= 0 {
            return Err(ConfigError::InvalidBlockSize(self.block_size));
        }

        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }

        if self.width % self.block_size != 0 {
            return Err(ConfigError::MisalignedGrid {
                dimension: "width",
                value: self.width,
                block_size: self.block_size,
            });
        }

        if self.height % self.block_size != 0 {
            return Err(ConfigError::MisalignedGrid {
                dimension: "height",
                value: self.height,
                block_size: self.block_size,
            });
        }

        if self.initial_snake_length < MIN_SNAKE_LENGTH {
            return Err(ConfigError::SnakeTooShort {
                min: MIN_SNAKE_LENGTH,
                got: self.initial_snake_length,
            });
        }

        if (self.columns() as usize) < self.initial_snake_length {
            return Err(ConfigError::GridTooSmall {
                columns: self.columns(),
                needed: self.initial_snake_length,
            });
        }

        if self.idle_budget_factor == 0 {
            return Err(ConfigError::OutOfRange {
                name: "idle_budget_factor",
                reason: "must be at least 1",
                value: 0.0,
            });
        }

        if self.max_food_attempts == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max_food_attempts",
                reason: "must be at least 1",
                value: 0.0,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.block_size, 20);
        assert_eq!(config.columns(), 32);
        assert_eq!(config.rows(), 24);
        assert_eq!(config.initial_snake_length, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_block_grid() {
        let config = GameConfig::with_blocks(3, 3);
        assert_eq!(config.width, 60);
        assert_eq!(config.height, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_misaligned_grid() {
        let config = GameConfig {
            width: 65,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MisalignedGrid { dimension: "width", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = GameConfig {
            height: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyGrid { .. })));

        let config = GameConfig {
            block_size: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidBlockSize(0)));
    }

    #[test]
    fn test_rejects_grid_narrower_than_snake() {
        let config = GameConfig::with_blocks(2, 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooSmall { columns: 2, needed: 3 })
        ));
    }

    #[test]
    fn test_rejects_short_snake() {
        let config = GameConfig {
            initial_snake_length: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnakeTooShort { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip_keeps_values() {
        let config = GameConfig::with_blocks(12, 8);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.width, 240);
        assert_eq!(back.height, 160);
    }
}

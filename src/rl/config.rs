//! DQN hyperparameter configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the Deep Q-Learning agent
///
/// # Example
///
/// ```rust
/// use dqn_snake::rl::DqnConfig;
///
/// let config = DqnConfig {
///     batch_size: 64,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DqnConfig {
    /// Replay memory capacity; the oldest transitions are evicted first
    ///
    /// Default: 100_000
    pub memory_capacity: usize,

    /// Transitions sampled for each end-of-episode update
    ///
    /// Default: 1000
    pub batch_size: usize,

    /// Learning rate for the Adam optimizer
    ///
    /// Default: 0.001
    pub learning_rate: f64,

    /// Discount factor for future rewards
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Width of the hidden layer of the Q-network
    ///
    /// Default: 256
    pub hidden_size: usize,

    /// Games over which exploration decays to zero
    ///
    /// Epsilon is `exploration_games - games_played`, floored at zero.
    ///
    /// Default: 80
    pub exploration_games: u32,

    /// Exclusive upper bound of the exploration draw
    ///
    /// A random action is taken when a draw from `[0, exploration_range)` is
    /// below epsilon.
    ///
    /// Default: 200
    pub exploration_range: u32,
}

impl DqnConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        if self.batch_size == 0 {
            return Err(ConfigError::OutOfRange {
                name: "batch_size",
                reason: "must be at least 1",
                value: 0.0,
            });
        }

        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "learning_rate",
                reason: "must be positive",
                value: self.learning_rate,
            });
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(ConfigError::OutOfRange {
                name: "gamma",
                reason: "must be in [0, 1]",
                value: self.gamma as f64,
            });
        }

        if self.hidden_size == 0 {
            return Err(ConfigError::OutOfRange {
                name: "hidden_size",
                reason: "must be at least 1",
                value: 0.0,
            });
        }

        if self.exploration_range == 0 {
            return Err(ConfigError::OutOfRange {
                name: "exploration_range",
                reason: "must be at least 1",
                value: 0.0,
            });
        }

        Ok(())
    }
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 100_000,
            batch_size: 1000,
            learning_rate: 0.001,
            gamma: 0.9,
            hidden_size: 256,
            exploration_games: 80,
            exploration_range: 200,
        }
    }
}

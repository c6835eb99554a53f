//! DQN Snake - A Snake game with a Deep Q-Learning agent
//!
//! This library provides:
//! - Core game logic on a pixel grid (game module)
//! - DQN agent, replay memory and model persistence (rl module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Execution modes: human play, training, watching a trained agent (modes module)

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;

pub use config::AppConfig;
pub use error::{ConfigError, GameError};

//! Deep Q-Learning for the Snake game
//!
//! Provides:
//! - 11-feature observations (danger, heading, food direction)
//! - Replay memory with uniform sampling
//! - Two-layer Q-network and its trainer
//! - The epsilon-greedy agent and model persistence

pub mod backend;
pub mod buffer;
pub mod config;
pub mod dqn;
pub mod environment;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod trainer;

pub use backend::{default_device, InferenceBackend, TrainingBackend};
pub use buffer::{ReplayMemory, Transition};
pub use config::DqnConfig;
pub use dqn::{DqnAgent, EpisodeReport, TickOutcome};
pub use environment::SnakeEnvironment;
pub use network::{QNetwork, QNetworkConfig};
pub use observation::{create_observation, Observation, OBSERVATION_SIZE};
pub use persistence::{FileModelStore, ModelMetadata, ModelStore};
pub use trainer::{bellman_targets, QTrainer};

//! Training mode for the DQN agent
//!
//! Runs games back to back, training the agent every frame and after every
//! game. The network is saved whenever a game beats the record. Without an
//! episode limit the loop runs until the process is stopped.
//!
//! # Example
//!
//! ```rust,ignore
//! use dqn_snake::modes::{TrainConfig, TrainMode};
//! use dqn_snake::rl::{default_device, TrainingBackend};
//!
//! let mut config = TrainConfig::new("model".into());
//! config.num_episodes = Some(500);
//!
//! let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device())?;
//! train_mode.run()?;
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::game::{GameConfig, GameEngine};
use crate::metrics::TrainingStats;
use crate::rl::{DqnAgent, DqnConfig, EpisodeReport, FileModelStore, SnakeEnvironment, TickOutcome};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Stop after this many games; `None` trains until interrupted
    pub num_episodes: Option<usize>,

    /// Directory the model and score history are written to
    pub model_dir: PathBuf,

    /// Log a summary line and write the score history every N games
    pub log_frequency: usize,

    /// Seed for the game and the agent
    pub seed: Option<u64>,

    pub game_config: GameConfig,

    pub dqn_config: DqnConfig,
}

impl TrainConfig {
    pub fn new(model_dir: PathBuf) -> Self {
        Self {
            num_episodes: None,
            model_dir,
            log_frequency: 100,
            seed: None,
            game_config: GameConfig::default(),
            dqn_config: DqnConfig::default(),
        }
    }
}

/// Per-game score history, written for external plotting
#[derive(Debug, Serialize)]
struct ScoreHistory<'a> {
    scores: &'a [u32],
    mean_scores: &'a [f32],
}

/// Training mode for the DQN agent
pub struct TrainMode<B: AutodiffBackend> {
    agent: DqnAgent<B>,
    env: SnakeEnvironment,
    store: FileModelStore,
    config: TrainConfig,
}

impl<B: AutodiffBackend> TrainMode<B> {
    pub fn new(config: TrainConfig, device: B::Device) -> Result<Self> {
        let engine = match config.seed {
            Some(seed) => GameEngine::with_seed(config.game_config.clone(), seed),
            None => GameEngine::new(config.game_config.clone()),
        }
        .context("Invalid game configuration")?;
        let env = SnakeEnvironment::new(engine).context("Failed to start the game")?;

        let agent = match config.seed {
            Some(seed) => DqnAgent::with_seed(config.dqn_config.clone(), device, seed),
            None => DqnAgent::new(config.dqn_config.clone(), device),
        }
        .context("Invalid agent configuration")?;

        let store = FileModelStore::in_dir(&config.model_dir);

        Ok(Self {
            agent,
            env,
            store,
            config,
        })
    }

    /// Run the training loop
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        let mut games = 0;
        while self.config.num_episodes.map_or(true, |limit| games < limit) {
            self.play_game()?;
            games += 1;
        }

        self.save_history()?;

        println!("\nTraining complete!");
        println!("Best model saved to: {:?}", self.store.weights_path());
        println!("\nFinal Statistics:");
        println!("{}", self.agent.stats().format_summary());

        Ok(())
    }

    /// Play one game. Every `log_frequency` games, log a summary and rewrite
    /// the score history
    fn play_game(&mut self) -> Result<EpisodeReport> {
        let report = self.run_episode()?;

        if report.game as usize % self.config.log_frequency.max(1) == 0 {
            self.print_progress();
            self.save_history()?;
        }

        Ok(report)
    }

    /// Play one game to the end, training along the way
    fn run_episode(&mut self) -> Result<EpisodeReport> {
        loop {
            if let TickOutcome::Finished(report) =
                self.agent.play_step(&mut self.env, &mut self.store)?
            {
                return Ok(report);
            }
        }
    }

    /// Write scores and running means to `<model_dir>/scores.json`
    fn save_history(&self) -> Result<()> {
        let stats = self.agent.stats();
        let history = ScoreHistory {
            scores: stats.scores(),
            mean_scores: stats.mean_scores(),
        };

        std::fs::create_dir_all(&self.config.model_dir).with_context(|| {
            format!("Failed to create directory: {:?}", self.config.model_dir)
        })?;
        let path = self.config.model_dir.join("scores.json");
        let json = serde_json::to_string(&history).context("Failed to serialize scores")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write scores to {:?}", path))?;

        Ok(())
    }

    pub fn stats(&self) -> &TrainingStats {
        self.agent.stats()
    }

    fn print_header(&self) {
        let game = &self.config.game_config;
        let dqn = &self.config.dqn_config;

        println!("{}", "=".repeat(70));
        println!("DQN Training - Snake");
        println!("{}", "=".repeat(70));
        match self.config.num_episodes {
            Some(n) => println!("Episodes: {}", n),
            None => println!("Episodes: until interrupted"),
        }
        println!(
            "Game Config: {}x{} blocks of {}px",
            game.columns(),
            game.rows(),
            game.block_size
        );
        println!("DQN Config:");
        println!("  Learning rate: {}", dqn.learning_rate);
        println!("  Gamma: {}", dqn.gamma);
        println!("  Memory: {} transitions", dqn.memory_capacity);
        println!("  Batch size: {}", dqn.batch_size);
        println!("  Hidden size: {}", dqn.hidden_size);
        println!("  Exploration: {} games", dqn.exploration_games);
        println!("Model dir: {:?}", self.config.model_dir);
        println!("{}", "=".repeat(70));
        println!();
    }

    fn print_progress(&self) {
        info!("{}", self.agent.stats().format_summary());
    }
}

//! Deep Q-Learning agent
//!
//! Each tick the agent observes the environment, picks an epsilon-greedy
//! action, trains on that single transition and stores it. When an episode
//! ends it trains on a batch sampled from memory and saves the network if the
//! score beats the record.

use anyhow::Result;
use burn::{module::AutodiffModule, tensor::backend::AutodiffBackend};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;

use super::buffer::{ReplayMemory, Transition};
use super::config::DqnConfig;
use super::environment::SnakeEnvironment;
use super::network::{QNetwork, QNetworkConfig};
use super::observation::Observation;
use super::persistence::{ModelMetadata, ModelStore};
use super::trainer::QTrainer;
use crate::error::ConfigError;
use crate::game::{RelativeAction, StepResult, NUM_ACTIONS};
use crate::metrics::TrainingStats;

/// Window used for the rolling statistics
const STATS_WINDOW: usize = 100;

/// Summary of a finished episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    /// Number of the game that just ended, starting at 1
    pub game: u32,
    pub score: u32,
    /// Best score so far, this one included
    pub record: u32,
    /// Mean score over all games so far
    pub mean_score: f32,
    /// Whether this game set a new record (and the model was saved)
    pub new_record: bool,
    /// Loss of the end-of-episode training pass
    pub loss: f32,
}

/// What happened during one tick of [`DqnAgent::play_step`]
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The episode goes on
    Playing(StepResult),
    /// The episode ended and the environment was reset
    Finished(EpisodeReport),
}

/// DQN agent driving a [`SnakeEnvironment`]
pub struct DqnAgent<B: AutodiffBackend> {
    trainer: QTrainer<B>,
    memory: ReplayMemory,
    config: DqnConfig,
    network_config: QNetworkConfig,
    n_games: u32,
    episode_frames: u32,
    stats: TrainingStats,
    rng: StdRng,
}

impl<B: AutodiffBackend> DqnAgent<B> {
    /// Create an agent with a freshly initialized network
    pub fn new(config: DqnConfig, device: B::Device) -> Result<Self, ConfigError> {
        Self::build(config, device, StdRng::from_entropy())
    }

    /// Create an agent whose exploration and sampling are reproducible
    pub fn with_seed(config: DqnConfig, device: B::Device, seed: u64) -> Result<Self, ConfigError> {
        Self::build(config, device, StdRng::seed_from_u64(seed))
    }

    fn build(config: DqnConfig, device: B::Device, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;

        let network_config = QNetworkConfig::new(config.hidden_size);
        let network = network_config.init::<B>(&device);
        let trainer = QTrainer::new(network, config.learning_rate, config.gamma, device);
        let memory = ReplayMemory::new(config.memory_capacity)?;

        Ok(Self {
            trainer,
            memory,
            config,
            network_config,
            n_games: 0,
            episode_frames: 0,
            stats: TrainingStats::new(STATS_WINDOW),
            rng,
        })
    }

    /// Feature vector of the environment's current state
    pub fn get_state(&self, env: &SnakeEnvironment) -> Observation {
        env.observation()
    }

    /// Exploration threshold, shrinking by one per game until it reaches zero
    pub fn epsilon(&self) -> u32 {
        self.config.exploration_games.saturating_sub(self.n_games)
    }

    /// Epsilon-greedy action for an observation
    pub fn get_action(&mut self, state: &Observation) -> RelativeAction {
        let draw = self.rng.gen_range(0..self.config.exploration_range);

        if draw < self.epsilon() {
            RelativeAction::ALL[self.rng.gen_range(0..NUM_ACTIONS)]
        } else {
            self.greedy_action(state)
        }
    }

    /// Highest-valued action according to the current network
    pub fn greedy_action(&self, state: &Observation) -> RelativeAction {
        self.trainer
            .network()
            .valid()
            .best_action(state, self.trainer.device())
    }

    pub fn remember(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    /// Train on the latest transition only
    pub fn train_short_memory(&mut self, transition: &Transition) -> f32 {
        self.trainer.train_step(&[transition])
    }

    /// Train on a batch sampled from memory, or on all of it when it is small
    pub fn train_long_memory(&mut self) -> f32 {
        let batch = if self.memory.len() > self.config.batch_size {
            self.memory.sample(self.config.batch_size, &mut self.rng)
        } else {
            self.memory.all()
        };

        self.trainer.train_step(&batch)
    }

    /// Run one full tick against the environment
    ///
    /// On a terminal step the environment is reset and the episode is closed
    /// through [`finish_episode`](Self::finish_episode).
    pub fn play_step(
        &mut self,
        env: &mut SnakeEnvironment,
        store: &mut dyn ModelStore<B>,
    ) -> Result<TickOutcome> {
        let state_old = self.get_state(env);
        let action = self.get_action(&state_old);

        let result = env.step(action)?;
        self.episode_frames += 1;
        let state_new = self.get_state(env);

        let transition = Transition {
            state: state_old,
            action,
            reward: result.reward,
            next_state: state_new,
            done: result.terminated,
        };
        self.train_short_memory(&transition);
        self.remember(transition);

        if !result.terminated {
            return Ok(TickOutcome::Playing(result));
        }

        env.reset()?;
        let report = self.finish_episode(result.score, store)?;
        Ok(TickOutcome::Finished(report))
    }

    /// Close an episode: count it, train on memory, save on a new record
    pub fn finish_episode(
        &mut self,
        score: u32,
        store: &mut dyn ModelStore<B>,
    ) -> Result<EpisodeReport> {
        self.n_games += 1;
        let loss = self.train_long_memory();

        let new_record = score > self.stats.record();
        if new_record {
            let metadata = ModelMetadata::new(self.network_config.clone(), score, self.n_games);
            store.save(self.trainer.network(), &metadata)?;
        }

        self.stats.record_episode(score, self.episode_frames);
        self.stats.record_loss(loss);
        self.episode_frames = 0;

        let report = EpisodeReport {
            game: self.n_games,
            score,
            record: self.stats.record(),
            mean_score: self.stats.mean_score(),
            new_record,
            loss,
        };

        info!(
            game = report.game,
            score = report.score,
            record = report.record,
            mean_score = report.mean_score,
            "Game {} Score {} Record {}",
            report.game,
            report.score,
            report.record
        );

        Ok(report)
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn n_games(&self) -> u32 {
        self.n_games
    }

    pub fn record(&self) -> u32 {
        self.stats.record()
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn network(&self) -> &QNetwork<B> {
        self.trainer.network()
    }

    pub fn network_config(&self) -> &QNetworkConfig {
        &self.network_config
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }
}

use super::observation::{create_observation, Observation};
use crate::error::GameError;
use crate::game::{Direction, GameEngine, GameState, RelativeAction, StepResult};

/// Snake environment for reinforcement learning
///
/// Owns the game engine and the current state, and exposes the standard
/// reset/step interface:
/// - Observations are 11 binary features (see [`create_observation`])
/// - Actions are relative to the heading (straight, right turn, left turn)
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create an environment and start the first episode
    pub fn new(mut engine: GameEngine) -> Result<Self, GameError> {
        let state = engine.reset()?;
        Ok(Self { engine, state })
    }

    /// Start a new episode and return its first observation
    pub fn reset(&mut self) -> Result<Observation, GameError> {
        self.state = self.engine.reset()?;
        Ok(self.observation())
    }

    /// Apply a relative action for one frame
    pub fn step(&mut self, action: RelativeAction) -> Result<StepResult, GameError> {
        self.engine.step(&mut self.state, action)
    }

    /// Apply an absolute direction for one frame, as a human player would
    pub fn steer(&mut self, direction: Option<Direction>) -> Result<StepResult, GameError> {
        self.engine.steer(&mut self.state, direction)
    }

    /// Observation of the current state
    pub fn observation(&self) -> Observation {
        create_observation(&self.state)
    }

    /// Current game state, for rendering and tests
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        !self.state.is_alive
    }
}

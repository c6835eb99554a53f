use super::{
    action::{Direction, RelativeAction},
    config::GameConfig,
    state::{CollisionType, GameState, Point, Snake},
};
use crate::error::{ConfigError, GameError};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::debug;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Score after the step
    pub score: u32,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn finished(score: u32) -> Self {
        Self {
            reward: 0.0,
            terminated: true,
            score,
            info: StepInfo {
                ate_food: false,
                collision_type: None,
            },
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine seeded from the OS
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::build(config, StdRng::from_entropy())
    }

    /// Create a game engine with a fixed seed, for reproducible runs
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    ///
    /// The head sits on the centre block, moved right when the grid is too
    /// narrow for the body to trail behind it.
    pub fn reset(&mut self) -> Result<GameState, GameError> {
        let block = self.config.block_size;
        let length = self.config.initial_snake_length;
        let column = (self.config.columns() / 2).max(length as i32 - 1);
        let row = self.config.rows() / 2;

        let head = Point::new(column * block, row * block);
        let snake = Snake::new(head, Direction::Right, length, block);

        let mut state = GameState::new(
            snake,
            head,
            self.config.width,
            self.config.height,
            block,
        );
        state.food = self.spawn_food(&state)?;

        Ok(state)
    }

    /// Advance the game one frame with a relative action
    pub fn step(
        &mut self,
        state: &mut GameState,
        action: RelativeAction,
    ) -> Result<StepResult, GameError> {
        let direction = state.snake.direction.apply(action);
        self.advance(state, direction, true)
    }

    /// Advance the game one frame with an absolute direction
    ///
    /// Used by human play. A direction reversing straight into the current
    /// heading is ignored, and there is no frame budget.
    pub fn steer(
        &mut self,
        state: &mut GameState,
        direction: Option<Direction>,
    ) -> Result<StepResult, GameError> {
        let current = state.snake.direction;
        let direction = match direction {
            Some(d) if !current.is_opposite(d) => d,
            _ => current,
        };
        self.advance(state, direction, false)
    }

    fn advance(
        &mut self,
        state: &mut GameState,
        direction: Direction,
        idle_budget: bool,
    ) -> Result<StepResult, GameError> {
        if !state.is_alive {
            return Ok(StepResult::finished(state.score));
        }

        state.frame_iteration += 1;
        state.snake.direction = direction;

        let new_head = state
            .snake
            .head()
            .moved_in_direction(direction, state.block_size);
        state.snake.push_head(new_head);

        if let Some(collision_type) = self.check_collision(state, idle_budget) {
            state.is_alive = false;

            return Ok(StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                score: state.score,
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            });
        }

        let ate_food = new_head == state.food;
        let mut reward = 0.0;

        if ate_food {
            state.score += 1;
            reward = self.config.food_reward;
            state.food = self.spawn_food(state)?;
        } else {
            state.snake.pop_tail();
        }

        Ok(StepResult {
            reward,
            terminated: false,
            score: state.score,
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        })
    }

    /// Check the freshly placed head for a terminal condition
    fn check_collision(&self, state: &GameState, idle_budget: bool) -> Option<CollisionType> {
        let head = state.snake.head();

        if !state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        let budget = self.config.idle_budget_factor as usize * state.snake.len();
        if idle_budget && state.frame_iteration as usize > budget {
            return Some(CollisionType::Starvation);
        }

        None
    }

    /// Place food on a random cell not covered by the snake
    ///
    /// Random draws first, then a uniform pick among the remaining free cells.
    fn spawn_food(&mut self, state: &GameState) -> Result<Point, GameError> {
        let block = state.block_size;
        let (columns, rows) = (state.columns(), state.rows());

        for _ in 0..self.config.max_food_attempts {
            let x = self.rng.gen_range(0..columns) * block;
            let y = self.rng.gen_range(0..rows) * block;
            let point = Point::new(x, y);

            if !state.is_occupied_by_snake(point) {
                return Ok(point);
            }
        }

        let free: Vec<Point> = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| Point::new(col * block, row * block)))
            .filter(|p| !state.is_occupied_by_snake(*p))
            .collect();

        debug!(
            free_cells = free.len(),
            "food placement fell back to scanning free cells"
        );

        free.choose(&mut self.rng)
            .copied()
            .ok_or(GameError::BoardFull { columns, rows })
    }
}

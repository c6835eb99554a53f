use burn::tensor::{backend::Backend, Tensor, TensorData};

use crate::game::{Direction, GameState, RelativeAction};

/// Number of features in an observation
pub const OBSERVATION_SIZE: usize = 11;

/// Binary feature vector describing the state around the head
///
/// Layout:
/// - 0..3: danger straight, right, left (one block away, relative to heading)
/// - 3..7: heading left, right, up, down (exactly one set)
/// - 7..11: food left, right, up, down of the head
pub type Observation = [f32; OBSERVATION_SIZE];

/// Build the feature vector for the current state
pub fn create_observation(state: &GameState) -> Observation {
    let head = state.snake.head();
    let heading = state.snake.direction;
    let block = state.block_size;

    let danger = |action: RelativeAction| {
        let point = head.moved_in_direction(heading.apply(action), block);
        state.is_collision(point)
    };

    let flags = [
        danger(RelativeAction::Straight),
        danger(RelativeAction::TurnRight),
        danger(RelativeAction::TurnLeft),
        heading == Direction::Left,
        heading == Direction::Right,
        heading == Direction::Up,
        heading == Direction::Down,
        state.food.x < head.x,
        state.food.x > head.x,
        state.food.y < head.y,
        state.food.y > head.y,
    ];

    flags.map(|flag| if flag { 1.0 } else { 0.0 })
}

/// Stack observations into a `[batch, 11]` tensor
pub fn to_tensor<B: Backend>(observations: &[&Observation], device: &B::Device) -> Tensor<B, 2> {
    let data: Vec<f32> = observations
        .iter()
        .flat_map(|obs| obs.iter().copied())
        .collect();

    Tensor::from_data(
        TensorData::new(data, [observations.len(), OBSERVATION_SIZE]),
        device,
    )
}

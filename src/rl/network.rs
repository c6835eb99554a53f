//! Q-value network for the Snake DQN agent
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 11]
//!   ↓ Linear(11 → hidden) + ReLU
//!   ↓ Linear(hidden → 3)
//! Output: [batch, 3] Q-values for straight, right turn, left turn
//! ```
//!
//! # Example
//!
//! ```rust
//! use dqn_snake::rl::QNetworkConfig;
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! let device = NdArrayDevice::default();
//! let network = QNetworkConfig::default().init::<Backend>(&device);
//!
//! let observation = Tensor::zeros([4, 11], &device);
//! let q_values = network.forward(observation);
//!
//! assert_eq!(q_values.dims(), [4, 3]);
//! ```

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{activation::relu, backend::Backend, Tensor},
};
use serde::{Deserialize, Serialize};

use super::observation::{to_tensor, Observation, OBSERVATION_SIZE};
use crate::game::{RelativeAction, NUM_ACTIONS};

/// Configuration for the Q-network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QNetworkConfig {
    /// Number of input features (default: 11)
    pub input_size: usize,

    /// Width of the hidden layer (default: 256)
    pub hidden_size: usize,

    /// Number of actions (default: 3)
    pub output_size: usize,
}

impl QNetworkConfig {
    /// Create a configuration with the given hidden width
    pub fn new(hidden_size: usize) -> Self {
        Self {
            input_size: OBSERVATION_SIZE,
            hidden_size,
            output_size: NUM_ACTIONS,
        }
    }

    /// Initialize the Q-network from this configuration
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            linear1: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            linear2: LinearConfig::new(self.hidden_size, self.output_size).init(device),
        }
    }
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Two-layer feed-forward Q-network
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    linear1: Linear<B>,
    linear2: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Map a batch of observations `[batch, 11]` to Q-values `[batch, 3]`
    pub fn forward(&self, observation: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.linear1.forward(observation);
        let x = relu(x);
        self.linear2.forward(x)
    }

    /// Q-values for a single observation
    pub fn evaluate(&self, observation: &Observation, device: &B::Device) -> [f32; NUM_ACTIONS] {
        let input = to_tensor::<B>(&[observation], device);
        let data = self.forward(input).into_data();

        let mut values = [0.0; NUM_ACTIONS];
        for (slot, value) in values.iter_mut().zip(data.iter::<f32>()) {
            *slot = value;
        }
        values
    }

    /// Highest-valued action for a single observation
    pub fn best_action(&self, observation: &Observation, device: &B::Device) -> RelativeAction {
        let values = self.evaluate(observation, device);
        RelativeAction::from_index(argmax(&values)).unwrap_or(RelativeAction::Straight)
    }
}

/// Index of the largest value, the first one on ties
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, max), (i, &v)| {
            if v > max {
                (i, v)
            } else {
                (best, max)
            }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};
    use burn::backend::Autodiff;
    use burn::tensor::TensorData;

    type TestBackend = NdArray<f32>;
    type TestAutodiffBackend = Autodiff<NdArray<f32>>;

    #[test]
    fn test_forward_pass_shapes() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestBackend>(&device);

        for batch_size in [1, 4, 32] {
            let observation = Tensor::zeros([batch_size, 11], &device);
            let q_values = network.forward(observation);
            assert_eq!(q_values.dims(), [batch_size, 3]);
        }
    }

    #[test]
    fn test_custom_hidden_size() {
        let device = NdArrayDevice::default();
        let config = QNetworkConfig::new(16);
        assert_eq!(config.input_size, 11);
        assert_eq!(config.output_size, 3);

        let network = config.init::<TestBackend>(&device);
        let q_values = network.forward(Tensor::ones([2, 11], &device));
        assert_eq!(q_values.dims(), [2, 3]);
    }

    #[test]
    fn test_evaluate_matches_forward() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestBackend>(&device);
        let obs: Observation = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0];

        let values = network.evaluate(&obs, &device);

        let batch = Tensor::<TestBackend, 2>::from_data(TensorData::new(obs.to_vec(), [1, 11]), &device);
        let expected = network.forward(batch).into_data();
        let expected = expected.as_slice::<f32>().unwrap();

        for i in 0..3 {
            assert!((values[i] - expected[i]).abs() < 1e-6);
        }
        assert_eq!(
            network.best_action(&obs, &device).index(),
            argmax(&values)
        );
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.5, 0.3]), 1);
        assert_eq!(argmax(&[2.0, -1.0, 0.0]), 0);
        assert_eq!(argmax(&[-3.0, -2.0, -1.0]), 2);
        assert_eq!(argmax(&[1.0, 1.0, 0.0]), 0);
    }

    #[test]
    fn test_gradient_flow() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestAutodiffBackend>(&device);

        let observation = Tensor::ones([1, 11], &device).require_grad();
        let loss = network.forward(observation.clone()).sum();
        let gradients = loss.backward();

        assert!(
            observation.grad(&gradients).is_some(),
            "Gradients should flow back to the input observation"
        );
    }

    #[test]
    fn test_batch_consistency() {
        let device = NdArrayDevice::default();
        let network = QNetworkConfig::default().init::<TestBackend>(&device);

        let single = network.forward(Tensor::ones([1, 11], &device)).into_data();
        let batch = network.forward(Tensor::ones([3, 11], &device)).into_data();

        let single = single.as_slice::<f32>().unwrap();
        let batch = batch.as_slice::<f32>().unwrap();
        for row in 0..3 {
            for col in 0..3 {
                assert!((batch[row * 3 + col] - single[col]).abs() < 1e-5);
            }
        }
    }
}

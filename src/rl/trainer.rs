//! Q-learning update step
//!
//! Targets are built from the current network: the predicted row is copied and
//! the entry of the taken action is replaced by the Bellman target. Targets
//! are treated as constants, so gradients only flow through the prediction.

use burn::{
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig, GradientsParams, Optimizer},
    tensor::{backend::AutodiffBackend, backend::Backend, ElementConversion, Tensor, TensorData},
};
use tracing::debug;

use super::buffer::Transition;
use super::network::QNetwork;
use super::observation::{to_tensor, Observation};
use crate::game::NUM_ACTIONS;

/// Owns the Q-network and its optimizer
pub struct QTrainer<B: AutodiffBackend> {
    network: QNetwork<B>,
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,
    learning_rate: f64,
    gamma: f32,
    device: B::Device,
}

impl<B: AutodiffBackend> QTrainer<B> {
    pub fn new(network: QNetwork<B>, learning_rate: f64, gamma: f32, device: B::Device) -> Self {
        Self {
            network,
            optim: AdamConfig::new().init(),
            learning_rate,
            gamma,
            device,
        }
    }

    /// One gradient step on a batch, returning the mean squared error
    ///
    /// An empty batch leaves the network untouched and returns 0.
    pub fn train_step(&mut self, batch: &[&Transition]) -> f32 {
        if batch.is_empty() {
            return 0.0;
        }

        let states: Vec<&Observation> = batch.iter().map(|t| &t.state).collect();
        let predicted = self.network.forward(to_tensor::<B>(&states, &self.device));

        let targets = bellman_targets(
            &rows(predicted.clone().into_data()),
            &self.next_max(batch),
            batch,
            self.gamma,
        );
        let flat: Vec<f32> = targets.iter().flatten().copied().collect();
        let target = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch.len(), NUM_ACTIONS]),
            &self.device,
        );

        let loss = MseLoss::new().forward(predicted, target, Reduction::Mean);
        let loss_value = loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(loss.backward(), &self.network);
        self.network = self
            .optim
            .step(self.learning_rate, self.network.clone(), grads);

        debug!(batch = batch.len(), loss = loss_value, "q-learning step");
        loss_value
    }

    /// Target rows for a batch, without updating the network
    pub fn compute_targets(&self, batch: &[&Transition]) -> Vec<[f32; NUM_ACTIONS]> {
        if batch.is_empty() {
            return Vec::new();
        }

        let network = self.network.valid();
        let states: Vec<&Observation> = batch.iter().map(|t| &t.state).collect();
        let predicted = network.forward(to_tensor::<B::InnerBackend>(&states, &self.device));

        bellman_targets(
            &rows(predicted.into_data()),
            &self.next_max(batch),
            batch,
            self.gamma,
        )
    }

    /// Best next-state value per transition, from the network without autodiff
    fn next_max(&self, batch: &[&Transition]) -> Vec<f32> {
        let network = self.network.valid();
        let next_states: Vec<&Observation> = batch.iter().map(|t| &t.next_state).collect();
        let q_next = network.forward(to_tensor::<B::InnerBackend>(&next_states, &self.device));

        max_per_row(q_next)
    }

    pub fn network(&self) -> &QNetwork<B> {
        &self.network
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }
}

/// Bellman targets for a batch
///
/// Each row starts as the prediction; the taken action's entry becomes the
/// reward, plus `gamma * next_max` when the transition did not end the episode.
pub fn bellman_targets(
    predicted: &[[f32; NUM_ACTIONS]],
    next_max: &[f32],
    batch: &[&Transition],
    gamma: f32,
) -> Vec<[f32; NUM_ACTIONS]> {
    predicted
        .iter()
        .zip(next_max)
        .zip(batch)
        .map(|((row, &best_next), transition)| {
            let mut target = *row;
            let q_new = if transition.done {
                transition.reward
            } else {
                transition.reward + gamma * best_next
            };
            target[transition.action.index()] = q_new;
            target
        })
        .collect()
}

fn max_per_row<B: Backend>(q_values: Tensor<B, 2>) -> Vec<f32> {
    q_values.max_dim(1).into_data().iter::<f32>().collect()
}

fn rows(data: TensorData) -> Vec<[f32; NUM_ACTIONS]> {
    let flat: Vec<f32> = data.iter::<f32>().collect();
    flat.chunks_exact(NUM_ACTIONS)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}

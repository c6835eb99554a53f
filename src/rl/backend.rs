//! Backend type aliases and device management
//!
//! - **TrainingBackend**: Autodiff-enabled NdArray backend for the learning agent (CPU)
//! - **InferenceBackend**: Plain NdArray backend for playing a saved policy (CPU)
//!
//! The Q-network is two small linear layers over an 11-value feature vector, so
//! the CPU backend is all the agent needs.
//!
//! # Example
//!
//! ```rust
//! use dqn_snake::rl::{default_device, QNetworkConfig, TrainingBackend};
//!
//! let device = default_device();
//! let network = QNetworkConfig::default().init::<TrainingBackend>(&device);
//! ```

use burn::backend::{
    ndarray::{NdArray, NdArrayDevice},
    Autodiff,
};

/// Backend type for training (with autodiff)
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Backend type for inference (without autodiff)
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

//! Model persistence for saving and loading Q-networks
//!
//! The agent only sees the [`ModelStore`] capability. [`FileModelStore`] keeps
//! the weights in Burn's named MessagePack format next to a JSON metadata file:
//! - `<dir>/<name>.mpk` - Network weights
//! - `<dir>/<name>.meta.json` - Metadata

use super::network::{QNetwork, QNetworkConfig};
use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::Backend,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Metadata saved with the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Shape of the saved network
    pub network: QNetworkConfig,

    /// Score that triggered the save
    pub record: u32,

    /// Games played when the model was saved
    pub games_played: u32,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    pub fn new(network: QNetworkConfig, record: u32, games_played: u32) -> Self {
        Self {
            network,
            record,
            games_played,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Somewhere Q-network parameters can be written to and read back from
pub trait ModelStore<B: Backend> {
    /// Persist the network and its metadata
    fn save(&mut self, network: &QNetwork<B>, metadata: &ModelMetadata) -> Result<()>;

    /// Rebuild a network from the stored parameters
    fn load(&self, device: &B::Device) -> Result<(QNetwork<B>, ModelMetadata)>;
}

/// Stores the model as files inside a directory
#[derive(Debug, Clone)]
pub struct FileModelStore {
    dir: PathBuf,
    file_name: String,
}

impl FileModelStore {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Store named `model` inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, "model")
    }

    /// Path of the weights file without its extension
    ///
    /// The recorder appends `.mpk` itself.
    pub fn base_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    pub fn weights_path(&self) -> PathBuf {
        self.base_path().with_extension("mpk")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.base_path().with_extension("meta.json")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether both files of a saved model are present
    pub fn exists(&self) -> bool {
        self.weights_path().is_file() && self.metadata_path().is_file()
    }
}

impl Default for FileModelStore {
    fn default() -> Self {
        Self::in_dir("model")
    }
}

impl<B: Backend> ModelStore<B> for FileModelStore {
    fn save(&mut self, network: &QNetwork<B>, metadata: &ModelMetadata) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {:?}", self.dir))?;

        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(network.clone().into_record(), self.base_path())
            .context("Failed to save network weights")?;

        let meta_path = self.metadata_path();
        let meta_json =
            serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
        std::fs::write(&meta_path, meta_json)
            .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

        info!(
            path = %self.weights_path().display(),
            record = metadata.record,
            "saved model"
        );
        Ok(())
    }

    fn load(&self, device: &B::Device) -> Result<(QNetwork<B>, ModelMetadata)> {
        let meta_path = self.metadata_path();
        let meta_json = std::fs::read_to_string(&meta_path)
            .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
        let metadata: ModelMetadata =
            serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

        if metadata.version != env!("CARGO_PKG_VERSION") {
            warn!(
                saved = %metadata.version,
                current = env!("CARGO_PKG_VERSION"),
                "model was saved by a different version"
            );
        }

        let network = metadata.network.init::<B>(device);

        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(self.base_path(), device)
            .with_context(|| format!("Failed to load network weights from {:?}", self.weights_path()))?;

        Ok((network.load_record(record), metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{default_device, InferenceBackend, TrainingBackend};
    use tempfile::TempDir;

    #[test]
    fn test_metadata_creation() {
        let metadata = ModelMetadata::new(QNetworkConfig::default(), 42, 120);

        assert_eq!(metadata.network.hidden_size, 256);
        assert_eq!(metadata.record, 42);
        assert_eq!(metadata.games_played, 120);
        assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_metadata_serialization() {
        let metadata = ModelMetadata::new(QNetworkConfig::new(64), 7, 30);

        let json = serde_json::to_string(&metadata).unwrap();
        let deserialized: ModelMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, metadata);
    }

    #[test]
    fn test_default_paths() {
        let store = FileModelStore::default();
        assert_eq!(store.weights_path(), PathBuf::from("model/model.mpk"));
        assert_eq!(store.metadata_path(), PathBuf::from("model/model.meta.json"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let device = default_device();
        let mut store = FileModelStore::in_dir(dir.path().join("nested"));

        let config = QNetworkConfig::new(16);
        let network = config.init::<TrainingBackend>(&device);
        let metadata = ModelMetadata::new(config, 5, 12);
        assert!(!store.exists());

        store.save(&network, &metadata).unwrap();
        assert!(store.exists());

        let (loaded, loaded_meta) =
            ModelStore::<InferenceBackend>::load(&store, &device).unwrap();
        assert_eq!(loaded_meta, metadata);

        let obs = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let original = burn::module::AutodiffModule::valid(&network).evaluate(&obs, &device);
        let restored = loaded.evaluate(&obs, &device);
        for i in 0..3 {
            assert!((original[i] - restored[i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_load_missing_model_fails() {
        let dir = TempDir::new().unwrap();
        let store = FileModelStore::in_dir(dir.path());

        let result = ModelStore::<InferenceBackend>::load(&store, &default_device());
        assert!(result.is_err());
    }
}

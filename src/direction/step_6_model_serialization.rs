// External imports
use anyhow::{Context, Result};
use burn::module::Module;
use burn::record::{BinFileRecorder, FullPrecisionSettings};
use burn::tensor::backend::Backend;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Internal imports
use super::step_3_model_arch::DirectionNet;
use crate::constants::SEQUENCE_LENGTH;

const MODEL_FILE_STEM: &str = "model";
const METADATA_FILE: &str = "metadata.json";

/// Metadata written next to an exported model, enough to rebuild the
/// architecture before loading the record
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ModelMetadata {
    pub model_version: u32,
    pub crate_version: String,
    pub timestamp: i64,
    pub input_size: usize,
    pub hidden_size: usize,
    pub dense_size: usize,
    pub output_size: usize,
    pub num_lstm_layers: usize,
    pub sequence_length: usize,
    pub description: String,
}

impl ModelMetadata {
    pub fn new(
        model_version: u32,
        input_size: usize,
        hidden_size: usize,
        dense_size: usize,
        output_size: usize,
        num_lstm_layers: usize,
    ) -> Self {
        Self {
            model_version,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            input_size,
            hidden_size,
            dense_size,
            output_size,
            num_lstm_layers,
            sequence_length: SEQUENCE_LENGTH,
            description: "LSTM ticker direction classifier".to_string(),
        }
    }
}

/// Export a trained model into `base_dir/<version>/`
///
/// The version directory receives the weight record (`model.bin`) and a
/// JSON metadata sidecar; serving processes pick the highest version
/// under `base_dir`.
pub fn export_model<B: Backend>(
    model: &DirectionNet<B>,
    metadata: &ModelMetadata,
    base_dir: impl AsRef<Path>,
    version: u32,
) -> Result<PathBuf> {
    let version_dir = base_dir.as_ref().join(version.to_string());
    std::fs::create_dir_all(&version_dir).context("Failed to create model version directory")?;

    let model_path = version_dir.join(MODEL_FILE_STEM);
    model
        .clone()
        .save_file::<BinFileRecorder<FullPrecisionSettings>, _>(&model_path, &Default::default())
        .context("Failed to save model record")?;

    let metadata_json =
        serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
    std::fs::write(version_dir.join(METADATA_FILE), metadata_json)
        .context("Failed to write metadata file")?;

    info!("exported model version {} to {}", version, version_dir.display());
    Ok(version_dir)
}

/// Load a model and its metadata from a version directory
pub fn load_model<B: Backend>(
    version_dir: impl AsRef<Path>,
    device: &B::Device,
) -> Result<(DirectionNet<B>, ModelMetadata)> {
    let metadata_path = version_dir.as_ref().join(METADATA_FILE);
    let metadata_json =
        std::fs::read_to_string(&metadata_path).context("Failed to read metadata file")?;
    let metadata: ModelMetadata =
        serde_json::from_str(&metadata_json).context("Failed to parse metadata")?;

    // Rebuild the architecture from metadata, then load the record into it
    let model_path = version_dir.as_ref().join(MODEL_FILE_STEM);
    let dummy_model = DirectionNet::new(
        metadata.input_size,
        metadata.hidden_size,
        metadata.dense_size,
        metadata.output_size,
        metadata.num_lstm_layers,
        device,
    );
    let model = dummy_model
        .load_file::<BinFileRecorder<FullPrecisionSettings>, _>(
            &model_path,
            &Default::default(),
            device,
        )
        .context("Failed to load model record")?;

    Ok((model, metadata))
}

/// Highest integer-named version directory under `base_dir`
pub fn latest_version(base_dir: impl AsRef<Path>) -> Result<u32> {
    let entries = std::fs::read_dir(base_dir.as_ref())
        .with_context(|| format!("Failed to read model base dir {}", base_dir.as_ref().display()))?;

    let mut latest = None;
    for entry in entries {
        let entry = entry.context("Failed to read model base dir entry")?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(version) = entry
            .file_name()
            .to_str()
            .and_then(|name| name.parse::<u32>().ok())
        {
            latest = Some(latest.map_or(version, |v: u32| v.max(version)));
        }
    }

    latest.ok_or_else(|| {
        anyhow::anyhow!(
            "no versioned model directories under {}",
            base_dir.as_ref().display()
        )
    })
}

/// Load the highest exported version under `base_dir`
pub fn load_latest<B: Backend>(
    base_dir: impl AsRef<Path>,
    device: &B::Device,
) -> Result<(DirectionNet<B>, ModelMetadata, u32)> {
    let version = latest_version(base_dir.as_ref())?;
    let version_dir = base_dir.as_ref().join(version.to_string());
    let (model, metadata) = load_model(version_dir, device)?;
    Ok((model, metadata, version))
}

/// Check that a version directory holds a loadable export
pub fn verify_export(version_dir: impl AsRef<Path>) -> Result<bool> {
    let model_path = version_dir
        .as_ref()
        .join(format!("{}.bin", MODEL_FILE_STEM));
    let metadata_path = version_dir.as_ref().join(METADATA_FILE);

    if !model_path.exists() || !metadata_path.exists() {
        return Ok(false);
    }

    let metadata_json =
        std::fs::read_to_string(&metadata_path).context("Failed to read metadata file")?;
    let _: ModelMetadata =
        serde_json::from_str(&metadata_json).context("Failed to parse metadata")?;

    Ok(true)
}

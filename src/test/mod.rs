/// Test modules for the direction classification package
///
/// * `direction_model` - Model architecture, synthetic data and training tests
/// * `serialization` - Versioned export and reload tests
/// * `serving_api` - REST endpoint tests against an in-process router
/// * `client_payload` - Wire format serialization tests
pub mod client_payload;
pub mod direction_model;

use burn::tensor::backend::Backend;
use burn_ndarray::NdArray;

use crate::direction::step_3_model_arch::DirectionNet;
use crate::direction::step_6_model_serialization::ModelMetadata;

pub type TestBackend = NdArray<f32>;

/// A small classifier so tests stay fast
pub fn small_model(device: &<TestBackend as Backend>::Device) -> DirectionNet<TestBackend> {
    DirectionNet::new(9, 8, 8, 1, 2, device)
}

pub fn small_metadata(version: u32) -> ModelMetadata {
    ModelMetadata::new(version, 9, 8, 8, 1, 2)
}

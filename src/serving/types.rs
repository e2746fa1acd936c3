//! Wire types for the predict protocol

use serde::{Deserialize, Serialize};

use crate::constants::SERVING_SIGNATURE;

/// Body of `POST /v1/models/{name}:predict`
///
/// `instances` is a batch of windows, each a `[seq][features]` nested list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default = "default_signature")]
    pub signature_name: String,
    pub instances: Vec<Vec<Vec<f64>>>,
}

fn default_signature() -> String {
    SERVING_SIGNATURE.to_string()
}

impl PredictRequest {
    pub fn new(instances: Vec<Vec<Vec<f64>>>) -> Self {
        Self {
            signature_name: default_signature(),
            instances,
        }
    }
}

/// Response body: one row of scores per instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<Vec<f64>>,
}

/// `GET /v1/models/{name}` response
#[derive(Debug, Serialize)]
pub struct ModelStatusResponse {
    pub model_name: String,
    pub model_version_status: Vec<ModelVersionStatus>,
}

#[derive(Debug, Serialize)]
pub struct ModelVersionStatus {
    pub version: String,
    pub state: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: i64,
}

//! Request handlers

use axum::extract::{Path, State};
use axum::Json;
use burn::tensor::backend::Backend;
use tracing::debug;

use super::error::{ApiError, ApiResult};
use super::types::{
    HealthResponse, ModelStatusResponse, ModelVersionStatus, PredictRequest, PredictResponse,
};
use super::{AppState, ServingBackend};
use crate::constants::SERVING_SIGNATURE;
use crate::direction::step_1_tensor_preparation::windows_to_tensor;
use crate::direction::step_5_prediction::predict_batch;

/// `POST /v1/models/{name}:predict`
///
/// The path parameter carries both the model name and the verb, split on
/// the colon the way the TF-Serving REST surface spells it.
pub async fn predict(
    State(state): State<AppState>,
    Path(target): Path<String>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Json<PredictResponse>> {
    let (name, verb) = target
        .split_once(':')
        .ok_or_else(|| ApiError::InvalidRequest("expected /v1/models/{name}:predict".into()))?;
    if verb != "predict" {
        return Err(ApiError::InvalidRequest(format!(
            "unsupported verb \"{}\"",
            verb
        )));
    }
    if name != state.config.model_name {
        return Err(ApiError::ModelNotFound(name.to_string()));
    }
    if request.signature_name != SERVING_SIGNATURE {
        return Err(ApiError::InvalidRequest(format!(
            "unknown signature \"{}\"",
            request.signature_name
        )));
    }
    if request.instances.is_empty() {
        return Err(ApiError::InvalidRequest("instances must not be empty".into()));
    }
    for (idx, window) in request.instances.iter().enumerate() {
        for step in window {
            if step.len() != state.metadata.input_size {
                return Err(ApiError::InvalidRequest(format!(
                    "instance {} has {} features per time step, model expects {}",
                    idx,
                    step.len(),
                    state.metadata.input_size
                )));
            }
        }
    }

    let device = <ServingBackend as Backend>::Device::default();
    let features = windows_to_tensor::<ServingBackend>(&request.instances, &device)
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let predictions = predict_batch(state.model.as_ref(), features)
        .map_err(|e| ApiError::Inference(e.to_string()))?;
    debug!("scored {} instance(s)", predictions.len());

    Ok(Json(PredictResponse { predictions }))
}

/// `GET /v1/models/{name}`
pub async fn model_status(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ModelStatusResponse>> {
    if name != state.config.model_name {
        return Err(ApiError::ModelNotFound(name));
    }

    Ok(Json(ModelStatusResponse {
        model_name: state.config.model_name.clone(),
        model_version_status: vec![ModelVersionStatus {
            version: state.version.to_string(),
            state: "AVAILABLE",
        }],
    }))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

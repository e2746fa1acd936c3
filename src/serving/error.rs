//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("model \"{0}\" is not being served")]
    ModelNotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::ModelNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Inference(msg) => {
                tracing::error!("inference error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "inference failed".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

//! REST model serving
//!
//! Serves the latest exported model version over the TensorFlow-Serving
//! wire protocol: `POST /v1/models/{name}:predict` with a JSON body of
//! instances, plus a model status route and a health check.

pub mod config;
pub mod error;
pub mod handlers;
pub mod types;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use burn::tensor::backend::Backend;
use burn_ndarray::NdArray;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::direction::step_3_model_arch::DirectionNet;
use crate::direction::step_6_model_serialization::{load_latest, ModelMetadata};
use config::ServingConfig;

pub type ServingBackend = NdArray<f32>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<DirectionNet<ServingBackend>>,
    pub metadata: ModelMetadata,
    pub version: u32,
    pub config: ServingConfig,
}

/// Create the router with all serving routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/v1/models/:model",
            get(handlers::model_status).post(handlers::predict),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the latest export and serve it until the process is stopped
pub async fn serve(config: ServingConfig) -> Result<()> {
    let device = <ServingBackend as Backend>::Device::default();
    let (model, metadata, version) = load_latest::<ServingBackend>(&config.model_base_path, &device)
        .with_context(|| {
            format!(
                "no servable model under {}",
                config.model_base_path.display()
            )
        })?;

    tracing::info!(
        "serving model \"{}\" version {} (input size {}, sequence length {})",
        config.model_name,
        version,
        metadata.input_size,
        metadata.sequence_length
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState {
        model: Arc::new(model),
        metadata,
        version,
        config,
    };
    let app = create_router(state);

    tracing::info!("model server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind serving port")?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

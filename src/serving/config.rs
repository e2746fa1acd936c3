//! Serving configuration

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MODEL_BASE_PATH, DEFAULT_MODEL_NAME, DEFAULT_SERVING_PORT};

/// Model server configuration
#[derive(Debug, Clone)]
pub struct ServingConfig {
    /// REST port
    pub port: u16,

    /// Name the model is served under
    pub model_name: String,

    /// Directory holding integer-named version subdirectories
    pub model_base_path: PathBuf,
}

impl ServingConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SERVING_PORT),

            model_name: env::var("MODEL_NAME")
                .unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string()),

            model_base_path: env::var("MODEL_BASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_BASE_PATH)),
        }
    }
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVING_PORT,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_base_path: PathBuf::from(DEFAULT_MODEL_BASE_PATH),
        }
    }
}

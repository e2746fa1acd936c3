//! Inference client
//!
//! Posts predict requests to a running model server and parses the
//! response. `probe` is the smoke test: one random window in, one score
//! out, both printed.

use anyhow::{Context, Result};

use crate::constants::SEQUENCE_LENGTH;
use crate::direction::step_1_tensor_preparation::random_window;
use crate::serving::types::{PredictRequest, PredictResponse};

pub struct ModelClient {
    base_url: String,
    model_name: String,
    http: reqwest::Client,
}

impl ModelClient {
    pub fn new(base_url: impl Into<String>, model_name: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model_name: model_name.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn predict_url(&self) -> String {
        format!("{}/v1/models/{}:predict", self.base_url, self.model_name)
    }

    /// Score a batch of windows against the server
    pub async fn predict(&self, instances: &[Vec<Vec<f64>>]) -> Result<Vec<Vec<f64>>> {
        let request = PredictRequest::new(instances.to_vec());
        let response = self
            .http
            .post(self.predict_url())
            .json(&request)
            .send()
            .await
            .context("predict request failed")?
            .error_for_status()
            .context("predict request rejected")?
            .json::<PredictResponse>()
            .await
            .context("invalid predict response body")?;
        Ok(response.predictions)
    }

    /// Score a single window, returning `predictions[0][0]`
    pub async fn predict_window(&self, window: &[Vec<f64>]) -> Result<f64> {
        let predictions = self.predict(&[window.to_vec()]).await?;
        predictions
            .first()
            .and_then(|row| row.first())
            .copied()
            .context("empty predictions in response")
    }
}

/// One random-payload request against a running server, printing the
/// request JSON and the parsed score
pub async fn probe(client: &ModelClient) -> Result<f64> {
    let window = random_window(SEQUENCE_LENGTH);
    let request = PredictRequest::new(vec![window.clone()]);
    println!("{}", serde_json::to_string(&request)?);

    let score = client.predict_window(&window).await?;
    println!("prediction: {}", score);
    Ok(score)
}

// External imports
use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

// Internal imports
use super::step_1_tensor_preparation::windows_to_tensor;
use super::step_3_model_arch::DirectionNet;

/// Score a batch of windows, one row of scores per window
pub fn predict_batch<B: Backend>(
    model: &DirectionNet<B>,
    features: Tensor<B, 3>,
) -> Result<Vec<Vec<f64>>> {
    let outputs = model.forward(features);
    let rows = outputs.dims()[0];
    let cols = outputs.dims()[1];

    let data = outputs.to_data().convert::<f32>();
    let slice = data
        .as_slice::<f32>()
        .map_err(|e| anyhow::anyhow!("output tensor read failed: {:?}", e))?;

    let mut predictions = Vec::with_capacity(rows);
    for row in 0..rows {
        let start = row * cols;
        let scores = slice[start..start + cols]
            .iter()
            .map(|&v| v as f64)
            .collect();
        predictions.push(scores);
    }
    Ok(predictions)
}

/// Score a single window, returning the direction probability
pub fn predict_window<B: Backend>(
    model: &DirectionNet<B>,
    window: &[Vec<f64>],
    device: &B::Device,
) -> Result<f64> {
    let features = windows_to_tensor::<B>(&[window.to_vec()], device)
        .context("Tensor creation failed for prediction")?;

    let predictions = predict_batch(model, features)?;
    let score = predictions
        .first()
        .and_then(|row| row.first())
        .copied()
        .context("model returned no prediction")?;
    Ok(score)
}

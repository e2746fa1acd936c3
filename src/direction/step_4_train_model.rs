// External imports
use anyhow::Result;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Shape, Tensor, TensorData};
use burn_autodiff::Autodiff;
use burn_ndarray::NdArray;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

// Internal imports
use super::step_3_model_arch::DirectionNet;
use crate::constants::{DENSE_SIZE, HIDDEN_SIZE, NUM_LSTM_LAYERS, OUTPUT_SIZE};

pub type TrainBackend = Autodiff<NdArray<f32>>;

/// Configuration for training the direction classifier
///
/// Defaults mirror the production fit: Adam at 1e-2, binary cross-entropy,
/// one pass over the data in batches of 64.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub batch_size: usize,
    pub epochs: usize,
    pub hidden_size: usize,
    pub dense_size: usize,
    pub num_lstm_layers: usize,
    /// Fixed RNG seed for reproducible batch shuffling
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-2,
            batch_size: 64,
            epochs: 1,
            hidden_size: HIDDEN_SIZE,
            dense_size: DENSE_SIZE,
            num_lstm_layers: NUM_LSTM_LAYERS,
            seed: None,
        }
    }
}

/// Summary of a completed training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub epoch_losses: Vec<f64>,
    pub final_loss: f64,
    pub samples: usize,
    pub batches_per_epoch: usize,
}

/// Evaluation metrics on a held-out set
#[derive(Debug, Clone)]
pub struct EvalReport {
    pub loss: f64,
    pub accuracy: f64,
    pub samples: usize,
}

/// Train a DirectionNet on the provided windows and labels
///
/// # Arguments
///
/// * `features` - Input windows of shape `[samples, seq_len, features]`
/// * `targets` - Binary labels of shape `[samples, 1]`
/// * `config` - Training hyperparameters
///
/// # Returns
///
/// Returns the trained model together with a loss report.
pub fn train_direction_model(
    features: Tensor<TrainBackend, 3>,
    targets: Tensor<TrainBackend, 2>,
    config: &TrainingConfig,
    device: &<TrainBackend as Backend>::Device,
) -> Result<(DirectionNet<TrainBackend>, TrainingReport)> {
    let num_samples = features.dims()[0];
    if num_samples == 0 {
        return Err(anyhow::anyhow!("cannot train on an empty dataset"));
    }
    if targets.dims()[0] != num_samples {
        return Err(anyhow::anyhow!(
            "feature/target sample mismatch: {} vs {}",
            num_samples,
            targets.dims()[0]
        ));
    }

    let input_size = features.dims()[2];
    let output_size = OUTPUT_SIZE;

    let mut model = DirectionNet::<TrainBackend>::new(
        input_size,
        config.hidden_size,
        config.dense_size,
        output_size,
        config.num_lstm_layers,
        device,
    );

    let mut optimizer = AdamConfig::new().init();

    let mut rng: StdRng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let batch_size = config.batch_size.max(1);
    let mut indices: Vec<usize> = (0..num_samples).collect();
    let batches_per_epoch = num_samples.div_ceil(batch_size);

    info!(
        "training on {} samples ({} batches of {}) for {} epoch(s)",
        num_samples, batches_per_epoch, batch_size, config.epochs
    );

    let mut epoch_losses = Vec::with_capacity(config.epochs);
    for epoch in 1..=config.epochs {
        indices.shuffle(&mut rng);

        let mut epoch_loss = 0.0;
        let mut batch_count = 0;
        for start in (0..num_samples).step_by(batch_size) {
            let end = usize::min(start + batch_size, num_samples);
            let batch_indices: Vec<i32> = indices[start..end].iter().map(|&i| i as i32).collect();

            let indices_data =
                TensorData::new(batch_indices.clone(), Shape::new([batch_indices.len()]));
            let batch_indices_tensor =
                Tensor::<TrainBackend, 1, Int>::from_data(indices_data, device);

            let batch_features = features.clone().select(0, batch_indices_tensor.clone());
            let batch_targets = targets.clone().select(0, batch_indices_tensor);

            // Forward pass and loss
            let predictions = model.forward(batch_features);
            let loss_tensor = model.bce_loss(predictions, batch_targets);
            let loss = loss_tensor.clone().into_scalar() as f64;
            epoch_loss += loss;
            batch_count += 1;

            // Backward pass and optimizer step
            let grads = loss_tensor.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optimizer.step(config.learning_rate, model, grads);

            if batch_count % 100 == 0 {
                debug!(
                    "epoch {} batch {}/{} loss {:.6}",
                    epoch, batch_count, batches_per_epoch, loss
                );
            }
        }

        let avg_loss = epoch_loss / batch_count as f64;
        info!("epoch {} - loss: {:.6}", epoch, avg_loss);
        epoch_losses.push(avg_loss);
    }

    let final_loss = epoch_losses.last().copied().unwrap_or(f64::NAN);
    let report = TrainingReport {
        epoch_losses,
        final_loss,
        samples: num_samples,
        batches_per_epoch,
    };

    Ok((model, report))
}

/// Evaluate a model: mean binary cross-entropy and accuracy at a 0.5 threshold
pub fn evaluate_model<B: Backend>(
    model: &DirectionNet<B>,
    features: Tensor<B, 3>,
    targets: Tensor<B, 2>,
) -> Result<EvalReport> {
    let samples = features.dims()[0];
    if samples == 0 {
        return Err(anyhow::anyhow!("cannot evaluate on an empty dataset"));
    }

    let predictions = model.forward(features);
    let loss_data = model
        .bce_loss(predictions.clone(), targets.clone())
        .to_data()
        .convert::<f32>();
    let loss = loss_data
        .as_slice::<f32>()
        .map_err(|e| anyhow::anyhow!("loss tensor read failed: {:?}", e))?[0]
        as f64;

    let pred_data = predictions.to_data().convert::<f32>();
    let pred_slice = pred_data
        .as_slice::<f32>()
        .map_err(|e| anyhow::anyhow!("prediction tensor read failed: {:?}", e))?;
    let target_data = targets.to_data().convert::<f32>();
    let target_slice = target_data
        .as_slice::<f32>()
        .map_err(|e| anyhow::anyhow!("target tensor read failed: {:?}", e))?;

    let mut correct = 0;
    for (pred, target) in pred_slice.iter().zip(target_slice.iter()) {
        let predicted_label = if *pred > 0.5 { 1.0 } else { 0.0 };
        if (predicted_label - target).abs() < f32::EPSILON {
            correct += 1;
        }
    }
    let accuracy = correct as f64 / samples as f64;

    Ok(EvalReport {
        loss,
        accuracy,
        samples,
    })
}

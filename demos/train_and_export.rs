use updown::constants::{FEATURE_COUNT, OUTPUT_SIZE};
use updown::direction::step_1_tensor_preparation::{
    generate_synthetic_windows, SyntheticDataConfig,
};
use updown::direction::step_4_train_model::{
    evaluate_model, train_direction_model, TrainBackend, TrainingConfig,
};
use updown::direction::step_6_model_serialization::{export_model, ModelMetadata};

use burn::module::AutodiffModule;
use burn_ndarray::NdArrayDevice;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Train-and-export example - small synthetic run");

    // Setup backend
    let device = NdArrayDevice::default();
    println!("Using device: CPU NdArray");

    // Generate a small synthetic dataset (keep the example fast)
    let data_config = SyntheticDataConfig {
        samples: 512,
        seed: Some(1),
        ..Default::default()
    };
    let (features, targets) = generate_synthetic_windows::<TrainBackend>(&data_config, &device)?;
    println!(
        "Generated {} windows of shape ({}, {})",
        data_config.samples, data_config.sequence_length, FEATURE_COUNT
    );

    // Configure training with a small network
    let training_config = TrainingConfig {
        batch_size: 64,
        epochs: 2,
        hidden_size: 32,
        dense_size: 32,
        seed: Some(2),
        ..Default::default()
    };

    println!("Starting training...");
    let start_time = Instant::now();
    let (model, report) = train_direction_model(features, targets, &training_config, &device)?;
    println!("Training completed in {:?}", start_time.elapsed());
    for (epoch, loss) in report.epoch_losses.iter().enumerate() {
        println!("Epoch {}: loss {:.6}", epoch + 1, loss);
    }

    // Evaluate on windows the model never saw
    let inference_model = model.valid();
    let eval_config = SyntheticDataConfig {
        samples: 128,
        seed: Some(3),
        ..Default::default()
    };
    let (eval_features, eval_targets) =
        generate_synthetic_windows(&eval_config, &device)?;
    let eval = evaluate_model(&inference_model, eval_features, eval_targets)?;
    println!(
        "Eval loss: {:.6}, accuracy: {:.2}%",
        eval.loss,
        eval.accuracy * 100.0
    );

    // Export as version 1 under a scratch directory
    let base_dir = std::env::temp_dir().join("updown-demo-model");
    let metadata = ModelMetadata::new(
        1,
        FEATURE_COUNT,
        training_config.hidden_size,
        training_config.dense_size,
        OUTPUT_SIZE,
        training_config.num_lstm_layers,
    );
    let export_dir = export_model(&inference_model, &metadata, &base_dir, 1)?;
    println!("Model exported to {}", export_dir.display());

    println!("Train-and-export example completed successfully");
    Ok(())
}

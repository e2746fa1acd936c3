// External crates
use anyhow::Result;
use burn::module::AutodiffModule;
use burn::tensor::backend::Backend as BurnBackendTrait;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Local modules
use updown::client::{probe, ModelClient};
use updown::constants::{FEATURE_COUNT, OUTPUT_SIZE};
use updown::direction::step_1_tensor_preparation::{
    generate_synthetic_windows, SyntheticDataConfig,
};
use updown::direction::step_4_train_model::{
    evaluate_model, train_direction_model, TrainBackend, TrainingConfig,
};
use updown::direction::step_6_model_serialization::{
    export_model, latest_version, ModelMetadata,
};
use updown::serving::config::ServingConfig;
use updown::serving::{serve, ServingBackend};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "updown=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Accept mode and optional overrides as command-line arguments
    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("train");

    match mode {
        "train" => run_training(&args),
        "serve" => serve(ServingConfig::from_env()).await,
        "probe" => run_probe().await,
        other => Err(anyhow::anyhow!(
            "unknown mode \"{}\" (expected train, serve or probe)",
            other
        )),
    }
}

/// Generate synthetic windows, fit the classifier, evaluate it on fresh
/// windows and export the result as the next model version
fn run_training(args: &[String]) -> Result<()> {
    let samples: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(50_000);
    let epochs: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(1);

    let device = <TrainBackend as BurnBackendTrait>::Device::default();

    let data_config = SyntheticDataConfig {
        samples,
        ..Default::default()
    };
    let (features, targets) = generate_synthetic_windows::<TrainBackend>(&data_config, &device)?;
    tracing::info!(
        "generated {} synthetic windows of shape ({}, {})",
        samples,
        data_config.sequence_length,
        FEATURE_COUNT
    );

    let training_config = TrainingConfig {
        epochs,
        ..Default::default()
    };
    let (model, report) = train_direction_model(features, targets, &training_config, &device)?;
    tracing::info!("training finished, final loss {:.6}", report.final_loss);

    // Evaluate on windows the model never saw
    let inference_model = model.valid();
    let eval_config = SyntheticDataConfig {
        samples: (samples / 10).max(1),
        ..Default::default()
    };
    let (eval_features, eval_targets) =
        generate_synthetic_windows::<ServingBackend>(&eval_config, &device)?;
    let eval = evaluate_model(&inference_model, eval_features, eval_targets)?;
    tracing::info!(
        "eval: loss {:.6}, accuracy {:.2}% over {} windows",
        eval.loss,
        eval.accuracy * 100.0,
        eval.samples
    );

    let serving_config = ServingConfig::from_env();
    let version = latest_version(&serving_config.model_base_path)
        .map(|v| v + 1)
        .unwrap_or(1);
    let metadata = ModelMetadata::new(
        version,
        FEATURE_COUNT,
        training_config.hidden_size,
        training_config.dense_size,
        OUTPUT_SIZE,
        training_config.num_lstm_layers,
    );
    let export_dir = export_model(
        &inference_model,
        &metadata,
        &serving_config.model_base_path,
        version,
    )?;
    tracing::info!("model exported to {}", export_dir.display());

    Ok(())
}

/// Random-payload request against a running server
async fn run_probe() -> Result<()> {
    let config = ServingConfig::from_env();
    let base_url = format!("http://localhost:{}", config.port);
    let client = ModelClient::new(base_url, config.model_name);
    probe(&client).await?;
    Ok(())
}

use updown::constants::{FEATURE_COUNT, OUTPUT_SIZE, SEQUENCE_LENGTH};
use updown::direction::step_3_model_arch::DirectionNet;
use updown::direction::step_5_prediction::predict_window;
use updown::direction::step_6_model_serialization::{
    export_model, load_latest, ModelMetadata,
};

use burn_ndarray::{NdArray, NdArrayDevice};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Export-reload example - exported artifacts are self-describing");

    type Backend = NdArray<f32>;
    let device = NdArrayDevice::default();

    // A freshly initialized small network stands in for a trained one
    let model = DirectionNet::<Backend>::new(FEATURE_COUNT, 16, 16, OUTPUT_SIZE, 2, &device);

    let base_dir = std::env::temp_dir().join("updown-demo-reload");
    let metadata = ModelMetadata::new(1, FEATURE_COUNT, 16, 16, OUTPUT_SIZE, 2);
    let export_dir = export_model(&model, &metadata, &base_dir, 1)?;
    println!("Exported to {}", export_dir.display());

    // Reload purely from the directory; the metadata rebuilds the arch
    let (reloaded, metadata, version) = load_latest::<Backend>(&base_dir, &device)?;
    println!(
        "Reloaded version {} ({}, trained with crate {})",
        version, metadata.description, metadata.crate_version
    );

    let window = vec![vec![0.0; FEATURE_COUNT]; SEQUENCE_LENGTH];
    let original = predict_window(&model, &window, &device)?;
    let restored = predict_window(&reloaded, &window, &device)?;
    println!("Original score: {:.6}", original);
    println!("Restored score: {:.6}", restored);
    assert!((original - restored).abs() < 1e-6);

    println!("Export-reload example completed successfully");
    Ok(())
}

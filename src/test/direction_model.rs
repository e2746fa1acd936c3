// External imports
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

// Internal imports
use super::{small_model, TestBackend};
use crate::constants::FEATURE_COUNT;
use crate::direction::step_1_tensor_preparation::{
    generate_synthetic_windows, windows_to_tensor, SyntheticDataConfig,
};
use crate::direction::step_2_lstm_cell::StackedLstm;
use crate::direction::step_4_train_model::{
    evaluate_model, train_direction_model, TrainBackend, TrainingConfig,
};
use burn::module::AutodiffModule;

#[test]
fn test_forward_shape_and_range() {
    let device = <TestBackend as Backend>::Device::default();
    let model = small_model(&device);

    let input = Tensor::<TestBackend, 3>::ones([2, 10, FEATURE_COUNT], &device);
    let output = model.forward(input);

    let dims = output.dims();
    assert_eq!(dims[0], 2, "Batch size should be 2");
    assert_eq!(dims[1], 1, "Output size should be 1");

    let data = output.to_data();
    for val in data.convert::<f32>().as_slice::<f32>().unwrap() {
        assert!(!val.is_nan(), "Output contains NaN values");
        assert!(
            *val >= 0.0 && *val <= 1.0,
            "Sigmoid output should lie in [0, 1]"
        );
    }
}

#[test]
fn test_forward_accepts_any_sequence_length() {
    let device = <TestBackend as Backend>::Device::default();
    let model = small_model(&device);

    // Sequence length is not baked into the weights
    let input = Tensor::<TestBackend, 3>::ones([3, 7, FEATURE_COUNT], &device);
    let output = model.forward(input);

    assert_eq!(output.dims()[0], 3);
    assert_eq!(output.dims()[1], 1);
}

#[test]
fn test_all_zeros_window_scores_in_unit_interval() {
    let device = <TestBackend as Backend>::Device::default();
    let model = small_model(&device);

    let input = Tensor::<TestBackend, 3>::zeros([1, 10, FEATURE_COUNT], &device);
    let output = model.forward(input);

    assert_eq!(output.dims(), [1, 1]);
    let data = output.to_data().convert::<f32>();
    let score = data.as_slice::<f32>().unwrap()[0];
    assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
}

#[test]
fn test_stacked_lstm_output_dims() {
    let device = <TestBackend as Backend>::Device::default();
    let lstm = StackedLstm::<TestBackend>::new(4, 5, 2, &device);

    let input = Tensor::<TestBackend, 3>::ones([2, 3, 4], &device);
    let output = lstm.forward(input);

    let dims = output.dims();
    assert_eq!(dims[0], 2, "Batch size should be 2");
    assert_eq!(dims[1], 3, "Sequence length should be 3");
    assert_eq!(dims[2], 5, "Hidden size should be 5");

    let data = output.to_data();
    for val in data.convert::<f32>().as_slice::<f32>().unwrap() {
        assert!(!val.is_nan(), "Output contains NaN values");
    }
}

#[test]
fn test_bce_loss_is_finite_and_nonnegative() {
    let device = <TestBackend as Backend>::Device::default();
    let model = small_model(&device);

    let input = Tensor::<TestBackend, 3>::ones([4, 10, FEATURE_COUNT], &device);
    let predictions = model.forward(input);
    let targets = Tensor::<TestBackend, 2>::ones([4, 1], &device);

    let loss = model.bce_loss(predictions, targets).into_scalar() as f64;
    assert!(loss.is_finite(), "Loss should be a valid finite number");
    assert!(loss >= 0.0, "Cross-entropy cannot be negative");
}

#[test]
fn test_synthetic_windows_shapes_and_price_level() {
    let device = <TestBackend as Backend>::Device::default();
    let config = SyntheticDataConfig {
        samples: 16,
        sequence_length: 10,
        seed: Some(7),
    };
    let (features, targets) = generate_synthetic_windows::<TestBackend>(&config, &device).unwrap();

    assert_eq!(features.dims(), [16, 10, FEATURE_COUNT]);
    assert_eq!(targets.dims(), [16, 1]);

    // The bid column is shifted to a price level far above the unit normals
    let data = features.to_data().convert::<f32>();
    let slice = data.as_slice::<f32>().unwrap();
    let mut bid_sum = 0.0;
    let mut bid_count = 0;
    for (idx, value) in slice.iter().enumerate() {
        if idx % FEATURE_COUNT == 0 {
            bid_sum += *value as f64;
            bid_count += 1;
        }
    }
    let bid_mean = bid_sum / bid_count as f64;
    assert!(bid_mean > 19_000.0, "bid mean {} not at price level", bid_mean);

    // Labels are strictly binary
    let target_data = targets.to_data().convert::<f32>();
    for label in target_data.as_slice::<f32>().unwrap() {
        assert!(*label == 0.0 || *label == 1.0, "label {} not binary", label);
    }
}

#[test]
fn test_windows_to_tensor_rejects_ragged_input() {
    let device = <TestBackend as Backend>::Device::default();

    let good = vec![vec![0.0; FEATURE_COUNT]; 10];
    let mut ragged = good.clone();
    ragged[3] = vec![0.0; FEATURE_COUNT - 1];

    assert!(windows_to_tensor::<TestBackend>(&[good.clone()], &device).is_ok());
    assert!(windows_to_tensor::<TestBackend>(&[good, ragged], &device).is_err());
    assert!(windows_to_tensor::<TestBackend>(&[], &device).is_err());
}

#[test]
fn test_training_runs_and_reports_losses() {
    let device = <TrainBackend as Backend>::Device::default();
    let data_config = SyntheticDataConfig {
        samples: 16,
        sequence_length: 10,
        seed: Some(11),
    };
    let (features, targets) =
        generate_synthetic_windows::<TrainBackend>(&data_config, &device).unwrap();

    let config = TrainingConfig {
        batch_size: 8,
        epochs: 2,
        hidden_size: 8,
        dense_size: 8,
        seed: Some(42),
        ..Default::default()
    };
    let (model, report) = train_direction_model(features, targets, &config, &device).unwrap();

    assert_eq!(report.epoch_losses.len(), 2);
    assert_eq!(report.samples, 16);
    assert_eq!(report.batches_per_epoch, 2);
    assert!(report.final_loss.is_finite());

    // The trained model still honors the output contract
    let inference_model = model.valid();
    let eval_config = SyntheticDataConfig {
        samples: 8,
        sequence_length: 10,
        seed: Some(13),
    };
    let (eval_features, eval_targets) =
        generate_synthetic_windows::<TestBackend>(&eval_config, &device).unwrap();
    let eval = evaluate_model(&inference_model, eval_features, eval_targets).unwrap();

    assert!(eval.loss.is_finite());
    assert!((0.0..=1.0).contains(&eval.accuracy));
    assert_eq!(eval.samples, 8);
}

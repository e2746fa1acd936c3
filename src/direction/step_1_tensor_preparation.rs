// External crates
use anyhow::Result;
use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Internal modules
use crate::constants::{FEATURE_COUNT, PRICE_LEVEL_OFFSET, SEQUENCE_LENGTH};

/// Configuration for synthetic training data generation
#[derive(Debug, Clone)]
pub struct SyntheticDataConfig {
    pub samples: usize,
    pub sequence_length: usize,
    /// Fixed RNG seed for reproducible datasets
    pub seed: Option<u64>,
}

impl Default for SyntheticDataConfig {
    fn default() -> Self {
        Self {
            samples: 50_000,
            sequence_length: SEQUENCE_LENGTH,
            seed: None,
        }
    }
}

/// Generates random ticker windows and binary direction labels
///
/// Features are drawn from a standard normal distribution; the bid column
/// is shifted up to a realistic price level so the normalization layer has
/// something to do. Labels are uniform over {0, 1}.
///
/// # Returns
///
/// Returns `(features, targets)` with shapes `[samples, seq_len, 9]` and
/// `[samples, 1]`.
pub fn generate_synthetic_windows<B: Backend>(
    config: &SyntheticDataConfig,
    device: &B::Device,
) -> Result<(Tensor<B, 3>, Tensor<B, 2>)> {
    if config.samples == 0 {
        return Err(anyhow::anyhow!("samples must be > 0"));
    }
    if config.sequence_length == 0 {
        return Err(anyhow::anyhow!("sequence_length must be > 0"));
    }

    let mut rng: StdRng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let samples = config.samples;
    let seq_len = config.sequence_length;

    let mut feature_buf = Vec::with_capacity(samples * seq_len * FEATURE_COUNT);
    for _ in 0..samples {
        for _ in 0..seq_len {
            for feature_idx in 0..FEATURE_COUNT {
                let mut value = sample_standard_normal(&mut rng);
                if feature_idx == 0 {
                    value += PRICE_LEVEL_OFFSET;
                }
                feature_buf.push(value as f32);
            }
        }
    }

    let mut target_buf = Vec::with_capacity(samples);
    for _ in 0..samples {
        target_buf.push(rng.random_range(0..2) as f32);
    }

    let features = Tensor::<B, 1>::from_floats(feature_buf.as_slice(), device)
        .reshape(Shape::new([samples, seq_len, FEATURE_COUNT]));
    let targets = Tensor::<B, 1>::from_floats(target_buf.as_slice(), device)
        .reshape(Shape::new([samples, 1]));

    Ok((features, targets))
}

/// Converts nested-list windows (the wire format) into a `[n, seq, features]` tensor
///
/// Every window must have the same number of time steps and every time step
/// the same number of features; ragged input is rejected.
pub fn windows_to_tensor<B: Backend>(
    windows: &[Vec<Vec<f64>>],
    device: &B::Device,
) -> Result<Tensor<B, 3>> {
    if windows.is_empty() {
        return Err(anyhow::anyhow!("no windows provided"));
    }

    let seq_len = windows[0].len();
    if seq_len == 0 {
        return Err(anyhow::anyhow!("windows must contain at least one time step"));
    }
    let n_features = windows[0][0].len();
    if n_features == 0 {
        return Err(anyhow::anyhow!("time steps must contain at least one feature"));
    }

    let mut buf = Vec::with_capacity(windows.len() * seq_len * n_features);
    for (window_idx, window) in windows.iter().enumerate() {
        if window.len() != seq_len {
            return Err(anyhow::anyhow!(
                "window {} has {} time steps, expected {}",
                window_idx,
                window.len(),
                seq_len
            ));
        }
        for (step_idx, step) in window.iter().enumerate() {
            if step.len() != n_features {
                return Err(anyhow::anyhow!(
                    "window {} step {} has {} features, expected {}",
                    window_idx,
                    step_idx,
                    step.len(),
                    n_features
                ));
            }
            for &value in step {
                buf.push(value as f32);
            }
        }
    }

    let tensor = Tensor::<B, 1>::from_floats(buf.as_slice(), device)
        .reshape(Shape::new([windows.len(), seq_len, n_features]));
    Ok(tensor)
}

/// Builds a single random window in the wire shape, for probing a server
pub fn random_window(sequence_length: usize) -> Vec<Vec<f64>> {
    let mut rng = rand::rng();
    (0..sequence_length)
        .map(|_| {
            (0..FEATURE_COUNT)
                .map(|_| sample_standard_normal(&mut rng))
                .collect()
        })
        .collect()
}

// Box-Muller transform over two uniforms
fn sample_standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

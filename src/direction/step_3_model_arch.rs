// External imports
use burn::module::Module;
use burn::nn::{BatchNorm, BatchNormConfig, Linear, LinearConfig};
use burn::prelude::Backend;
use burn::tensor::{activation, Tensor};

// Internal imports
use crate::direction::step_2_lstm_cell::StackedLstm;

/// Direction classifier over ticker windows
///
/// Feature batch normalization, two stacked LSTM layers, a ReLU dense
/// layer and a sigmoid output head. Input is `[batch, seq, features]`,
/// output `[batch, 1]` with scores in [0, 1].
#[derive(Module, Debug)]
pub struct DirectionNet<B: Backend> {
    input_size: usize,
    hidden_size: usize,
    dense_size: usize,
    output_size: usize,
    norm: BatchNorm<B, 1>,
    lstm: StackedLstm<B>,
    dense: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> DirectionNet<B> {
    /// Create a new DirectionNet with freshly initialized weights
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        dense_size: usize,
        output_size: usize,
        num_lstm_layers: usize,
        device: &B::Device,
    ) -> Self {
        let norm = BatchNormConfig::new(input_size).init(device);
        let lstm = StackedLstm::new(input_size, hidden_size, num_lstm_layers, device);
        let dense = LinearConfig::new(hidden_size, dense_size).init(device);
        let output = LinearConfig::new(dense_size, output_size).init(device);

        Self {
            input_size,
            hidden_size,
            dense_size,
            output_size,
            norm,
            lstm,
            dense,
            output,
        }
    }

    /// Getter for input_size
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Getter for output_size
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Forward pass, `[batch, seq, features]` to `[batch, output_size]`
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        // BatchNorm expects channels first; swap features into dim 1 and back
        let normalized = self.norm.forward(x.swap_dims(1, 2)).swap_dims(1, 2);

        let hidden = self.lstm.forward(normalized);

        // Pool the last time step
        let batch_size = hidden.dims()[0];
        let last_step_idx = hidden.dims()[1] - 1;
        let pooled = hidden
            .narrow(1, last_step_idx, 1)
            .reshape([batch_size, self.hidden_size]);

        let dense_out = activation::relu(self.dense.forward(pooled));

        activation::sigmoid(self.output.forward(dense_out))
    }

    /// Binary cross-entropy between sigmoid scores and {0, 1} targets
    ///
    /// Scores are clamped away from 0 and 1 before the log so the loss
    /// stays finite.
    pub fn bce_loss(&self, pred: Tensor<B, 2>, target: Tensor<B, 2>) -> Tensor<B, 0> {
        let eps = 1e-7;
        let pred = pred.clamp(eps, 1.0 - eps);

        let positive_term = target.clone() * pred.clone().log();
        let negative_term = (target * -1.0 + 1.0) * (pred * -1.0 + 1.0).log();

        ((positive_term + negative_term).mean() * -1.0).reshape([0_usize; 0])
    }
}

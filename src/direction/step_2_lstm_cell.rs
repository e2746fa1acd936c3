// External imports
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::{activation, backend::Backend, Tensor};

/// A single LSTM layer with combined gate projections
///
/// One linear layer projects the input and one the hidden state; both map
/// into the four gates (input, forget, cell, output) at once.
#[derive(Module, Debug)]
pub struct LstmLayer<B: Backend> {
    input_size: usize,
    hidden_size: usize,
    input_weights: Linear<B>,
    hidden_weights: Linear<B>,
}

impl<B: Backend> LstmLayer<B> {
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        let gate_size = 4 * hidden_size; // input, forget, cell, output gates combined

        let input_weights = LinearConfig::new(input_size, gate_size).init(device);
        let hidden_weights = LinearConfig::new(hidden_size, gate_size).init(device);

        Self {
            input_size,
            hidden_size,
            input_weights,
            hidden_weights,
        }
    }

    /// Runs the layer over a full sequence, returning every hidden state
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let device = x.device();
        let batch_size = x.dims()[0];
        let seq_len = x.dims()[1];

        // Initial hidden and cell states (zeros)
        let mut h = Tensor::zeros([batch_size, self.hidden_size], &device);
        let mut c = Tensor::zeros([batch_size, self.hidden_size], &device);

        let mut output_sequence = Tensor::zeros([batch_size, seq_len, self.hidden_size], &device);

        for t in 0..seq_len {
            let x_t = x
                .clone()
                .narrow(1, t, 1)
                .reshape([batch_size, self.input_size]);

            let input_projection = self.input_weights.forward(x_t);
            let hidden_projection = self.hidden_weights.forward(h);
            let gates = input_projection + hidden_projection;

            // Split into individual gates, each [batch_size, hidden_size]
            let gates = gates.reshape([batch_size, 4, self.hidden_size]);
            let i_gate = gates
                .clone()
                .narrow(1, 0, 1)
                .reshape([batch_size, self.hidden_size]);
            let f_gate = gates
                .clone()
                .narrow(1, 1, 1)
                .reshape([batch_size, self.hidden_size]);
            let g_gate = gates
                .clone()
                .narrow(1, 2, 1)
                .reshape([batch_size, self.hidden_size]);
            let o_gate = gates
                .narrow(1, 3, 1)
                .reshape([batch_size, self.hidden_size]);

            let i = activation::sigmoid(i_gate);
            let f = activation::sigmoid(f_gate);
            let g = activation::tanh(g_gate);
            let o = activation::sigmoid(o_gate);

            c = f * c + i * g;
            h = o * activation::tanh(c.clone());

            output_sequence = output_sequence.slice_assign(
                [0..batch_size, t..t + 1, 0..self.hidden_size],
                h.clone()
                    .unsqueeze::<3>()
                    .reshape([batch_size, 1, self.hidden_size]),
            );
        }

        output_sequence
    }
}

/// Stack of LSTM layers, each feeding its hidden sequence to the next
#[derive(Module, Debug)]
pub struct StackedLstm<B: Backend> {
    hidden_size: usize,
    layers: Vec<LstmLayer<B>>,
}

impl<B: Backend> StackedLstm<B> {
    /// Create `num_layers` stacked layers; the first maps `input_size` to
    /// `hidden_size`, the rest map `hidden_size` to `hidden_size`.
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        device: &B::Device,
    ) -> Self {
        let num_layers = num_layers.max(1);
        let mut layers = Vec::with_capacity(num_layers);
        for layer_idx in 0..num_layers {
            let layer_input = if layer_idx == 0 { input_size } else { hidden_size };
            layers.push(LstmLayer::new(layer_input, hidden_size, device));
        }

        Self { hidden_size, layers }
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Forward pass through the stack, returning the top layer's hidden sequence
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let mut sequence = x;
        for layer in &self.layers {
            sequence = layer.forward(sequence);
        }
        sequence
    }
}

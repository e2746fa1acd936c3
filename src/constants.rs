// Ticker feature columns, in wire order
pub const TICKER_FEATURES: [&str; 9] = [
    "bid",
    "ask",
    "bid_size",
    "ask_size",
    "volume",
    "dtm",
    "last",
    "change",
    "open_interest",
];

pub const FEATURE_COUNT: usize = TICKER_FEATURES.len();

// Model parameters
pub const SEQUENCE_LENGTH: usize = 10; // Number of time steps to look back
pub const HIDDEN_SIZE: usize = 128;
pub const DENSE_SIZE: usize = 128;
pub const OUTPUT_SIZE: usize = 1;
pub const NUM_LSTM_LAYERS: usize = 2;

// Synthetic data: the bid column sits at a realistic price level
pub const PRICE_LEVEL_OFFSET: f64 = 20_000.0;

// Serving defaults
pub const DEFAULT_MODEL_BASE_PATH: &str = "model";
pub const DEFAULT_MODEL_NAME: &str = "trade_model";
pub const DEFAULT_SERVING_PORT: u16 = 7070;
pub const SERVING_SIGNATURE: &str = "serving_default";

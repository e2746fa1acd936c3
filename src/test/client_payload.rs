// Internal imports
use crate::client::ModelClient;
use crate::constants::{FEATURE_COUNT, SEQUENCE_LENGTH, SERVING_SIGNATURE};
use crate::direction::step_1_tensor_preparation::random_window;
use crate::serving::types::{PredictRequest, PredictResponse};

#[test]
fn test_predict_request_json_round_trip() {
    let window = random_window(SEQUENCE_LENGTH);
    let request = PredictRequest::new(vec![window.clone()]);

    let json = serde_json::to_string(&request).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["signature_name"], SERVING_SIGNATURE);

    let parsed: PredictRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.instances.len(), 1);
    assert_eq!(parsed.instances[0], window);
}

#[test]
fn test_signature_defaults_when_missing() {
    let json = r#"{"instances": [[[1.0, 2.0]]]}"#;
    let parsed: PredictRequest = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.signature_name, SERVING_SIGNATURE);
    assert_eq!(parsed.instances[0][0], vec![1.0, 2.0]);
}

#[test]
fn test_predict_response_parses_predictions_key() {
    let json = r#"{"predictions": [[0.73]]}"#;
    let parsed: PredictResponse = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.predictions.len(), 1);
    assert!((parsed.predictions[0][0] - 0.73).abs() < f64::EPSILON);
}

#[test]
fn test_random_window_matches_wire_shape() {
    let window = random_window(SEQUENCE_LENGTH);
    assert_eq!(window.len(), SEQUENCE_LENGTH);
    for step in &window {
        assert_eq!(step.len(), FEATURE_COUNT);
    }
}

#[test]
fn test_predict_url_shape() {
    let client = ModelClient::new("http://localhost:7070/", "trade_model");
    assert_eq!(
        client.predict_url(),
        "http://localhost:7070/v1/models/trade_model:predict"
    );
}

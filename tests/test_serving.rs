//! Integration test: End-to-end model serving flow
//! Tests: write artifact → start state from disk → predict over HTTP

use solarcast::server::{create_router, AppState, ServerConfig, MODEL_UNAVAILABLE_MESSAGE};
use std::path::Path;
use std::sync::Arc;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

const FEATURES: [&str; 7] = [
    "temperature", "pressure", "humidity", "wind_direction", "wind_speed", "month", "hour",
];

fn serve_from_disk(model_path: &Path) -> (axum::Router, Arc<AppState>) {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        model_path: model_path.to_path_buf(),
        static_dir: None,
        cors_origin: None,
    };
    let state = Arc::new(AppState::new(config.clone()));
    let app = create_router(state.clone(), &config);
    (app, state)
}

fn write_artifact(dir: &Path, artifact: Value) -> std::path::PathBuf {
    let path = dir.join("model.json");
    std::fs::write(&path, serde_json::to_string_pretty(&artifact).unwrap()).unwrap();
    path
}

fn payload(hour: u32) -> Value {
    json!({
        "temperature": 20.5,
        "pressure": 1012.3,
        "humidity": 55,
        "wind_direction": 180,
        "wind_speed": 5.2,
        "month": 6,
        "hour": hour
    })
}

async fn predict(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// Model Family Tests
// ============================================================================

#[tokio::test]
async fn test_linear_model_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), json!({
        "feature_names": FEATURES,
        "model": {
            "kind": "linear_regression",
            "coefficients": [1.0, 0.01, -0.1, 0.0, -0.5, 0.2, 0.3],
            "intercept": 2.0
        }
    }));
    let (app, state) = serve_from_disk(&path);
    assert!(state.model.is_ready());

    // 20.5 + 10.123 - 5.5 - 2.6 + 1.2 + 4.2 + 2.0
    let (status, json) = predict(app, payload(14)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"prediction": 29.92}));
}

#[tokio::test]
async fn test_random_forest_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), json!({
        "model": {
            "kind": "random_forest_regressor",
            "n_features": 7,
            "trees": [
                {
                    "children_left": [1, -1, 3, -1, -1],
                    "children_right": [2, -1, 4, -1, -1],
                    "feature": [6, -2, 0, -2, -2],
                    "threshold": [6.0, -2.0, 15.0, -2.0, -2.0],
                    "value": [0.0, 0.0, 0.0, 10.0, 30.0]
                },
                {
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature": [5, -2, -2],
                    "threshold": [3.0, -2.0, -2.0],
                    "value": [0.0, 5.0, 20.0]
                }
            ]
        }
    }));
    let (app, _) = serve_from_disk(&path);

    let (status, json) = predict(app.clone(), payload(14)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prediction"], json!(25.0));

    let (_, json) = predict(app, payload(3)).await;
    assert_eq!(json["prediction"], json!(10.0));
}

#[tokio::test]
async fn test_mlp_nested_output_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), json!({
        "feature_names": FEATURES,
        "model": {
            "kind": "mlp_regressor",
            "layers": [
                {
                    "weights": [[1.0, 0.0], [0.0, 0.0], [0.0, -1.0], [0.0, 0.0],
                                [0.0, 0.0], [0.0, 0.0], [0.0, 0.0]],
                    "biases": [0.0, 0.0],
                    "activation": "relu"
                },
                {"weights": [[0.5], [10.0]], "biases": [1.25], "activation": "linear"}
            ]
        }
    }));
    let (app, _) = serve_from_disk(&path);

    let (status, json) = predict(app, payload(14)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prediction"], json!(11.5));
}

#[tokio::test]
async fn test_deep_decision_tree_from_disk() {
    // Right-leaning chain on temperature: node 2k splits at k, its left child is leaf k
    let depth = 120;
    let n_nodes = 2 * depth + 1;
    let mut children_left = vec![-1i64; n_nodes];
    let mut children_right = vec![-1i64; n_nodes];
    let mut feature = vec![-2i64; n_nodes];
    let mut threshold = vec![-2.0; n_nodes];
    let mut value = vec![0.0; n_nodes];
    for level in 0..depth {
        let node = 2 * level;
        children_left[node] = node as i64 + 1;
        children_right[node] = node as i64 + 2;
        feature[node] = 0;
        threshold[node] = level as f64;
        value[node + 1] = level as f64;
    }
    value[n_nodes - 1] = depth as f64;

    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), json!({
        "feature_names": FEATURES,
        "model": {
            "kind": "decision_tree_regressor",
            "n_features": 7,
            "tree": {
                "children_left": children_left,
                "children_right": children_right,
                "feature": feature,
                "threshold": threshold,
                "value": value
            }
        }
    }));
    let (app, state) = serve_from_disk(&path);
    assert!(state.model.is_ready());

    // temperature 20.5 stops at the split with threshold 21
    let (status, json) = predict(app, payload(14)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["prediction"], json!(21.0));
}

// ============================================================================
// Startup Failure Tests
// ============================================================================

#[tokio::test]
async fn test_absent_artifact_degrades_to_500() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = serve_from_disk(&dir.path().join("model.json"));
    assert!(!state.model.is_ready());

    for _ in 0..3 {
        let (status, json) = predict(app.clone(), payload(12)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], json!(MODEL_UNAVAILABLE_MESSAGE));
    }

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_corrupt_artifact_degrades_to_500() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, b"\x80\x04\x95\x00binary").unwrap();
    let (app, state) = serve_from_disk(&path);
    assert!(!state.model.is_ready());

    let (status, json) = predict(app, payload(12)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], json!(MODEL_UNAVAILABLE_MESSAGE));
}

#[tokio::test]
async fn test_misordered_artifact_degrades_to_500() {
    let dir = tempfile::tempdir().unwrap();
    let mut names = FEATURES;
    names.swap(0, 1);
    let path = write_artifact(dir.path(), json!({
        "feature_names": names,
        "model": {"kind": "linear_regression", "coefficients": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]}
    }));
    let (app, state) = serve_from_disk(&path);
    assert!(!state.model.is_ready());

    let (status, _) = predict(app, payload(12)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_artifact(dir.path(), json!({
        "model": {
            "kind": "linear_regression",
            "coefficients": [0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            "intercept": 0.0
        }
    }));
    let (app, _) = serve_from_disk(&path);

    let handles: Vec<_> = (0..24u32)
        .map(|hour| {
            let app = app.clone();
            tokio::spawn(async move { (hour, predict(app, payload(hour % 24)).await) })
        })
        .collect();

    for handle in handles {
        let (hour, (status, json)) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        let expected = ((10.25 + hour as f64) * 100.0).round() / 100.0;
        assert_eq!(json["prediction"].as_f64().unwrap(), expected);
    }
}

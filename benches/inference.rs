use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use solarcast::features::{FeatureVector, N_FEATURES};
use solarcast::inference::InferenceEngine;
use solarcast::models::{
    Activation, DenseLayer, LinearRegression, MlpRegressor, RandomForestRegressor, TrainedModel,
    Tree,
};
use std::sync::Arc;

fn payload() -> Vec<u8> {
    json!({
        "temperature": 20.5, "pressure": 1012.3, "humidity": 55,
        "wind_direction": 180, "wind_speed": 5.2, "month": 6, "hour": 14
    })
    .to_string()
    .into_bytes()
}

/// Balanced tree of the given depth, splitting round-robin over the columns
fn balanced_tree(depth: usize, feature: usize) -> Tree {
    if depth == 0 {
        return Tree::leaf(feature as f64);
    }
    let next = (feature + 1) % N_FEATURES;
    Tree::split(
        feature,
        10.0 * feature as f64,
        balanced_tree(depth - 1, next),
        balanced_tree(depth - 1, next),
    )
}

fn engines() -> Vec<(&'static str, InferenceEngine)> {
    let linear = TrainedModel::LinearRegression(LinearRegression::new(vec![0.1; N_FEATURES], 1.0));

    let forest = TrainedModel::RandomForestRegressor(RandomForestRegressor::new(
        N_FEATURES,
        (0..100).map(|i| balanced_tree(8, i % N_FEATURES)).collect(),
    ));

    let hidden = DenseLayer::new(
        ndarray::Array2::from_elem((N_FEATURES, 64), 0.01),
        ndarray::Array1::zeros(64),
        Activation::Relu,
    )
    .unwrap();
    let output = DenseLayer::new(
        ndarray::Array2::from_elem((64, 1), 0.5),
        ndarray::Array1::zeros(1),
        Activation::Linear,
    )
    .unwrap();
    let mlp = TrainedModel::MlpRegressor(MlpRegressor::new(vec![hidden, output]));

    vec![("linear", linear), ("forest_100x8", forest), ("mlp_64", mlp)]
        .into_iter()
        .map(|(name, model)| (name, InferenceEngine::new(Arc::new(model)).unwrap()))
        .collect()
}

fn bench_features(c: &mut Criterion) {
    let body = payload();
    c.bench_function("feature_vector_from_json", |b| {
        b.iter(|| FeatureVector::from_json_bytes(black_box(&body)).unwrap())
    });
}

fn bench_predict_one(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict_one");
    let features = FeatureVector::from_json_bytes(&payload()).unwrap();

    for (name, engine) in engines() {
        group.bench_with_input(BenchmarkId::new("family", name), &features, |b, features| {
            b.iter(|| engine.predict_one(black_box(features)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_features, bench_predict_one);
criterion_main!(benches);

//! Solarcast CLI Module
//!
//! Command-line interface for serving predictions and for one-off
//! predictions against a model artifact.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

use crate::features::FeatureVector;
use crate::inference::load_model;
use crate::server::{run_server, ServerConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "solarcast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Solar output prediction service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    Serve {
        /// Server port [env: API_PORT, default: 8080]
        #[arg(short, long)]
        port: Option<u16>,

        /// Server host [env: API_HOST, default: 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Model artifact [env: MODEL_PATH, default: model.json]
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Directory served under /static [env: STATIC_DIR]
        #[arg(long)]
        static_dir: Option<String>,
    },

    /// Run one prediction from a JSON payload
    Predict {
        /// Model artifact
        #[arg(short, long, default_value = "model.json")]
        model: PathBuf,

        /// File containing the JSON payload
        #[arg(short, long, conflicts_with = "json", required_unless_present = "json")]
        input: Option<PathBuf>,

        /// Inline JSON payload
        #[arg(long)]
        json: Option<String>,
    },

    /// Show model artifact information
    Info {
        /// Model artifact
        #[arg(short, long, default_value = "model.json")]
        model: PathBuf,
    },
}

impl Commands {
    /// Fold command-line overrides into the environment-derived config.
    pub fn server_config(
        host: Option<String>,
        port: Option<u16>,
        model: Option<PathBuf>,
        static_dir: Option<String>,
    ) -> ServerConfig {
        let mut config = ServerConfig::default();
        if let Some(host) = host {
            config.host = host;
        }
        if let Some(port) = port {
            config.port = port;
        }
        if let Some(model) = model {
            config.model_path = model;
        }
        if static_dir.is_some() {
            config.static_dir = static_dir;
        }
        config
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_serve(config: ServerConfig) -> anyhow::Result<()> {
    section(&format!("Solarcast v{}", env!("CARGO_PKG_VERSION")));
    println!("  {}", kv("Web UI  ", &format!("http://{}:{}", config.host, config.port)));
    println!("  {}", kv("Predict ", &format!("POST http://{}:{}/predict", config.host, config.port)));
    println!("  {}", kv("Health  ", &format!("http://{}:{}/health", config.host, config.port)));
    println!("  {}", kv("Model   ", &config.model_path.display().to_string()));
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    run_server(config).await
}

/// Run the endpoint's prediction path once and return the response body.
pub fn predict_payload(model: &Path, payload: &[u8]) -> anyhow::Result<serde_json::Value> {
    let engine = load_model(model)
        .with_context(|| format!("could not load model from {}", model.display()))?;
    let features = FeatureVector::from_json_bytes(payload)?;
    let prediction = engine.predict_one(&features)?;
    Ok(serde_json::json!({ "prediction": prediction }))
}

pub fn cmd_predict(model: &Path, input: Option<&Path>, json: Option<&str>) -> anyhow::Result<()> {
    let payload = match (input, json) {
        (Some(path), _) => std::fs::read(path)
            .with_context(|| format!("could not read payload from {}", path.display()))?,
        (None, Some(inline)) => inline.as_bytes().to_vec(),
        (None, None) => anyhow::bail!("either --input or --json is required"),
    };

    let response = predict_payload(model, &payload)?;
    println!("{}", response);
    Ok(())
}

pub fn cmd_info(model: &Path) -> anyhow::Result<()> {
    let engine = load_model(model)
        .with_context(|| format!("could not load model from {}", model.display()))?;
    let summary = engine.summary();

    section("Model");
    println!("  {}", kv("Path      ", &model.display().to_string()));
    println!("  {}", kv("Family    ", summary.family));
    println!("  {}", kv("Features  ", &summary.n_features.to_string()));
    println!("  {}", kv("Loaded at ", &summary.loaded_at));

    section("Feature order");
    for (i, name) in summary.feature_names.iter().enumerate() {
        println!("  {} {}", muted(&format!("{:>2}", i)), name);
    }
    println!();
    println!("  {} {}", ok("✓"), "artifact is usable by the prediction endpoint");
    Ok(())
}

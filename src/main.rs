//! Solarcast - Main Entry Point
//!
//! Serves solar output predictions over HTTP, or runs a single prediction
//! from the command line.

use clap::Parser;
use solarcast::cli::{cmd_info, cmd_predict, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solarcast=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, host, model, static_dir }) => {
            cmd_serve(Commands::server_config(host, port, model, static_dir)).await?;
        }
        Some(Commands::Predict { model, input, json }) => {
            cmd_predict(&model, input.as_deref(), json.as_deref())?;
        }
        Some(Commands::Info { model }) => {
            cmd_info(&model)?;
        }
        None => {
            cmd_serve(Commands::server_config(None, None, None, None)).await?;
        }
    }

    Ok(())
}

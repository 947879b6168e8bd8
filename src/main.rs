// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};
use yolo_local_node::{
    api::{start_server, AppState},
    storage::PredictionStore,
    vision::{provision_detector, DetectorConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("🚀 Starting {}", yolo_local_node::version::get_version_string());

    // Parse environment variables for configuration
    let api_port = env::var("API_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .unwrap_or(8000);
    let models_dir = env::var("MODELS_DIR").unwrap_or_else(|_| "./models".to_string());
    let model_path = env::var("MODEL_PATH").ok().map(PathBuf::from);
    let predictions_dir =
        env::var("PREDICTIONS_DIR").unwrap_or_else(|_| "./predictions".to_string());

    // Provision the detector once; no usable model is fatal at startup
    let config = DetectorConfig {
        model_path,
        models_dir: PathBuf::from(models_dir),
    };
    let detector = provision_detector(&config)?;
    tracing::info!("✅ Detection model ready");

    let store = Arc::new(PredictionStore::new(predictions_dir));
    let state = AppState::new(detector, store);

    let addr = SocketAddr::from(([0, 0, 0, 0], api_port));
    start_server(addr, state)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    Ok(())
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::detect::{detect_batch_handler, detect_handler};
use super::predictions::{
    get_prediction_image_handler, get_prediction_label_handler, list_predictions_handler,
};
use crate::storage::PredictionStore;
use crate::vision::Detector;

/// Shared per-request state: one detector instance and one store for the
/// life of the process. The detector is never mutated by requests.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<dyn Detector>,
    pub store: Arc<PredictionStore>,
}

impl AppState {
    pub fn new(detector: Arc<dyn Detector>, store: Arc<PredictionStore>) -> Self {
        Self { detector, store }
    }
}

/// Build the application router with permissive CORS for local development
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Detection endpoints
        .route("/detect", post(detect_handler))
        .route("/detect-batch", post(detect_batch_handler))
        // Prediction listing and retrieval
        .route("/predictions", get(list_predictions_handler))
        .route("/predictions/images/:name", get(get_prediction_image_handler))
        .route("/predictions/labels/:name", get(get_prediction_label_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(
    addr: SocketAddr,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    axum::response::Json(json!({
        "status": "ok",
        "version": crate::version::VERSION_NUMBER,
    }))
}

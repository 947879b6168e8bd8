// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction listing and retrieval handlers
//!
//! Pure delegation to the prediction store; no transformation beyond
//! mapping records onto the wire shape.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use super::response::{LabelResponse, PredictionEntry, PredictionsResponse};
use crate::api::errors::ApiErrorResponse;
use crate::api::http_server::AppState;

/// GET /predictions - List persisted detection runs, newest first
pub async fn list_predictions_handler(
    State(state): State<AppState>,
) -> Result<Json<PredictionsResponse>, ApiErrorResponse> {
    let records = state.store.list()?;
    debug!("listing {} predictions", records.len());

    Ok(Json(PredictionsResponse {
        success: true,
        predictions: records.into_iter().map(PredictionEntry::from).collect(),
    }))
}

/// GET /predictions/images/{name} - Raw bytes of a stored prediction image
///
/// # Errors
/// - 400 Bad Request: name is not a plain leaf filename
/// - 404 Not Found: no such artifact
pub async fn get_prediction_image_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse + std::fmt::Debug, ApiErrorResponse> {
    let bytes = state.store.read_image(&name)?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}

/// GET /predictions/labels/{name} - Text content of a stored label file
pub async fn get_prediction_label_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<LabelResponse>, ApiErrorResponse> {
    let label = state.store.read_label(&name)?;
    Ok(Json(LabelResponse {
        success: true,
        label,
    }))
}

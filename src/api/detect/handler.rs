// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoint handlers

use axum::{extract::State, Json};
use image::DynamicImage;
use tracing::{debug, info, warn};

use super::request::{BatchDetectRequest, DetectRequest};
use super::response::{BatchDetectResponse, BatchItemResult, DetectResponse};
use crate::api::errors::{ApiError, ApiErrorResponse};
use crate::api::http_server::AppState;
use crate::vision::{
    decode_image_payload, draw_detections, jpeg_data_url, normalize_detection, Detection, RawBox,
    CONFIDENCE_THRESHOLD,
};

/// POST /detect - Detect objects in one image and persist the result
///
/// Decodes the payload, runs the detector at a fixed 0.25 confidence
/// threshold, normalizes every raw box into the canonical corner-form
/// schema, and saves the annotated image plus a label file. Only the
/// decode stage can fail the request; a detector that finds nothing
/// yields an empty detection list with nothing persisted.
///
/// # Errors
/// - 400 Bad Request: payload is not a decodable image
/// - 500 Internal Server Error: persistence or re-encoding failed
pub async fn detect_handler(
    State(state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, ApiErrorResponse> {
    request.validate().map_err(ApiErrorResponse)?;

    let image = decode_image_payload(&request.image_data).map_err(|e| {
        warn!("failed to decode image payload: {}", e);
        ApiErrorResponse(ApiError::InvalidImage(e.to_string()))
    })?;
    // 3-channel invariant for the detector and the annotator
    let image = DynamicImage::ImageRgb8(image.to_rgb8());

    debug!("decoded image: {}x{}", image.width(), image.height());

    let raw_boxes = run_detector(&state, &image);
    if raw_boxes.is_empty() {
        debug!("detector returned nothing; skipping persistence");
        return Ok(Json(DetectResponse::empty()));
    }

    let detections = normalize_all(&state, &raw_boxes);

    let annotated = draw_detections(&image, &raw_boxes);
    let record = state.store.save(&annotated, &raw_boxes)?;
    let data_url = jpeg_data_url(&annotated).map_err(|e| {
        ApiErrorResponse(ApiError::InternalError(format!(
            "failed to encode annotated image: {e}"
        )))
    })?;

    info!(
        "detect complete: {} detections, saved {}",
        detections.len(),
        record.name
    );

    Ok(Json(DetectResponse {
        success: true,
        detections,
        annotated: Some(data_url),
        saved: Some(record.name),
    }))
}

/// POST /detect-batch - Detect objects in several images
///
/// Each image is processed independently and in order; a payload that fails
/// to decode yields a `success: false` entry without aborting the batch.
/// Batch runs never persist.
pub async fn detect_batch_handler(
    State(state): State<AppState>,
    Json(request): Json<BatchDetectRequest>,
) -> Result<Json<BatchDetectResponse>, ApiErrorResponse> {
    request.validate().map_err(ApiErrorResponse)?;

    let mut results = Vec::with_capacity(request.images.len());
    for (index, payload) in request.images.iter().enumerate() {
        let image = match decode_image_payload(payload) {
            Ok(img) => DynamicImage::ImageRgb8(img.to_rgb8()),
            Err(e) => {
                warn!("batch image {} failed to decode: {}", index, e);
                results.push(BatchItemResult::failed());
                continue;
            }
        };

        let raw_boxes = run_detector(&state, &image);
        results.push(BatchItemResult {
            success: true,
            detections: normalize_all(&state, &raw_boxes),
        });
    }

    info!("batch detect complete: {} images", results.len());

    Ok(Json(BatchDetectResponse {
        success: true,
        results,
    }))
}

/// Invoke the shared detector; runtime failures degrade to an empty result
/// so that only the decode stage can fail a request.
fn run_detector(state: &AppState, image: &DynamicImage) -> Vec<RawBox> {
    state
        .detector
        .predict(image, CONFIDENCE_THRESHOLD)
        .unwrap_or_else(|e| {
            warn!("detector invocation failed: {}", e);
            Vec::new()
        })
}

fn normalize_all(state: &AppState, raw_boxes: &[RawBox]) -> Vec<Detection> {
    raw_boxes
        .iter()
        .map(|raw| {
            normalize_detection(raw, |id| state.detector.class_name(id).map(String::from))
        })
        .collect()
}

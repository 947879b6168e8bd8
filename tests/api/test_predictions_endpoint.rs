// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Endpoint tests for GET /predictions and the image/label retrieval routes

use axum::extract::{Path, State};
use image::{DynamicImage, RgbImage};
use std::sync::Arc;
use tempfile::TempDir;
use yolo_local_node::{
    api::{
        get_prediction_image_handler, get_prediction_label_handler, list_predictions_handler,
        AppState,
    },
    storage::PredictionStore,
    vision::{Detector, RawBox},
};

/// Detector stand-in; these tests never invoke it
struct IdleDetector;

impl Detector for IdleDetector {
    fn predict(&self, _image: &DynamicImage, _confidence: f32) -> anyhow::Result<Vec<RawBox>> {
        Ok(Vec::new())
    }

    fn class_name(&self, _class_id: u32) -> Option<&str> {
        None
    }
}

fn setup_state() -> (AppState, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let state = AppState::new(
        Arc::new(IdleDetector),
        Arc::new(PredictionStore::new(dir.path())),
    );
    (state, dir)
}

fn seed_record(state: &AppState, boxes: &[RawBox]) -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::new(64, 48));
    state
        .store
        .save(&image, boxes)
        .expect("seeding save should succeed")
        .name
}

#[tokio::test]
async fn test_list_empty_store() {
    let (state, _dir) = setup_state();
    let response = list_predictions_handler(State(state))
        .await
        .expect("listing an empty store succeeds")
        .0;

    assert!(response.success);
    assert!(response.predictions.is_empty());
}

#[tokio::test]
async fn test_list_returns_saved_record() {
    let (state, _dir) = setup_state();
    let name = seed_record(
        &state,
        &[
            RawBox::center_norm(0, 0.9, 0.5, 0.5, 0.2, 0.4),
            RawBox::center_norm(1, 0.8, 0.25, 0.25, 0.1, 0.1),
        ],
    );

    let response = list_predictions_handler(State(state))
        .await
        .expect("listing succeeds")
        .0;

    assert_eq!(response.predictions.len(), 1);
    let entry = &response.predictions[0];
    assert_eq!(entry.name, name);
    assert_eq!(entry.image, format!("/predictions/images/{name}"));
    assert_eq!(entry.detections.len(), 2);
    assert!(entry.timestamp > 0);

    // Label convention reversed: confidence fixed at 1.0, class is the id
    assert_eq!(entry.detections[0].class, "0");
    assert_eq!(entry.detections[0].confidence, 1.0);
}

#[tokio::test]
async fn test_get_image_round_trip() {
    let (state, _dir) = setup_state();
    let name = seed_record(&state, &[RawBox::center_norm(0, 0.9, 0.5, 0.5, 0.2, 0.2)]);

    let result = get_prediction_image_handler(State(state), Path(name)).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_get_image_unknown_is_404() {
    let (state, _dir) = setup_state();

    let err = get_prediction_image_handler(State(state), Path("pred_999.jpg".to_string()))
        .await
        .expect_err("unknown artifact must 404");
    assert_eq!(err.0.status_code(), 404);
}

#[tokio::test]
async fn test_get_label_round_trip() {
    let (state, _dir) = setup_state();
    let name = seed_record(&state, &[RawBox::center_norm(3, 0.9, 0.5, 0.5, 0.2, 0.2)]);
    let label_name = name.replace(".jpg", ".txt");

    let response = get_prediction_label_handler(State(state), Path(label_name))
        .await
        .expect("label retrieval succeeds")
        .0;

    assert!(response.success);
    assert!(response.label.starts_with("3 "));
}

#[tokio::test]
async fn test_get_label_unknown_is_404() {
    let (state, _dir) = setup_state();

    let err = get_prediction_label_handler(State(state), Path("pred_999.txt".to_string()))
        .await
        .expect_err("unknown label must 404");
    assert_eq!(err.0.status_code(), 404);
}

#[tokio::test]
async fn test_traversal_name_is_rejected() {
    let (state, _dir) = setup_state();

    let err = get_prediction_image_handler(State(state), Path("..%2Fsecret".to_string()))
        .await
        .expect_err("traversal attempt must be rejected");
    assert_eq!(err.0.status_code(), 400);
}

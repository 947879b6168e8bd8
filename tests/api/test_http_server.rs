// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Router-level tests driving the full HTTP surface through tower

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use image::DynamicImage;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use yolo_local_node::{
    api::{build_router, AppState},
    storage::PredictionStore,
    vision::{Detector, RawBox},
};

struct NoopDetector;

impl Detector for NoopDetector {
    fn predict(&self, _image: &DynamicImage, _confidence: f32) -> anyhow::Result<Vec<RawBox>> {
        Ok(Vec::new())
    }

    fn class_name(&self, _class_id: u32) -> Option<&str> {
        None
    }
}

fn test_router() -> (axum::Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let state = AppState::new(
        Arc::new(NoopDetector),
        Arc::new(PredictionStore::new(dir.path())),
    );
    (build_router(state), dir)
}

#[tokio::test]
async fn test_health_route() {
    let (app, _dir) = test_router();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _dir) = test_router();
    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detect_route_rejects_bad_payload() {
    let (app, _dir) = test_router();
    let request = Request::builder()
        .method("POST")
        .uri("/detect")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"imageData": "not base64!!!"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predictions_route_empty_store() {
    let (app, _dir) = test_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/predictions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_prediction_image_route_unknown_is_404() {
    let (app, _dir) = test_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/predictions/images/pred_0.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

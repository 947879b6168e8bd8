// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod storage;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{ApiError, AppState, ErrorResponse};
pub use storage::{PredictionRecord, PredictionStore, StoreError};
pub use vision::{
    BoundingBox, BoxCoords, Detection, Detector, DetectorConfig, ModelError, RawBox, YoloDetector,
};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod detect;
pub mod errors;
pub mod http_server;
pub mod predictions;

pub use detect::{
    detect_batch_handler, detect_handler, BatchDetectRequest, BatchDetectResponse,
    BatchItemResult, DetectRequest, DetectResponse,
};
pub use errors::{ApiError, ApiErrorResponse, ErrorResponse};
pub use http_server::{build_router, start_server, AppState};
pub use predictions::{
    get_prediction_image_handler, get_prediction_label_handler, list_predictions_handler,
    LabelResponse, PredictionEntry, PredictionsResponse,
};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction listing and retrieval endpoints

pub mod handler;
pub mod response;

pub use handler::{
    get_prediction_image_handler, get_prediction_label_handler, list_predictions_handler,
};
pub use response::{LabelResponse, PredictionEntry, PredictionsResponse};

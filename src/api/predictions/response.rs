// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction listing/retrieval response types

use serde::{Deserialize, Serialize};

use crate::storage::PredictionRecord;
use crate::vision::Detection;

/// One persisted prediction run as listed by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionEntry {
    /// Retrieval path for the stored image
    pub image: String,
    /// Leaf filename, usable with the image/label retrieval endpoints
    pub name: String,
    pub detections: Vec<Detection>,
    /// Epoch seconds
    pub timestamp: i64,
}

impl From<PredictionRecord> for PredictionEntry {
    fn from(record: PredictionRecord) -> Self {
        Self {
            image: format!("/predictions/images/{}", record.name),
            name: record.name,
            detections: record.detections,
            timestamp: record.timestamp,
        }
    }
}

/// Response for GET /predictions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionsResponse {
    pub success: bool,
    pub predictions: Vec<PredictionEntry>,
}

/// Response for GET /predictions/labels/{name}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelResponse {
    pub success: bool,
    /// Raw text content of the label file
    pub label: String,
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection response types

use serde::{Deserialize, Serialize};

use crate::vision::Detection;

/// Response for single-image detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub success: bool,
    pub detections: Vec<Detection>,
    /// Annotated image as a `data:image/jpeg;base64,...` URL; absent when
    /// the detector found nothing and persistence was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotated: Option<String>,
    /// Filename of the persisted prediction image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<String>,
}

impl DetectResponse {
    /// Response for a detector run that produced nothing; nothing persisted
    pub fn empty() -> Self {
        Self {
            success: true,
            detections: Vec::new(),
            annotated: None,
            saved: None,
        }
    }
}

/// Per-image entry of a batch response, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub success: bool,
    pub detections: Vec<Detection>,
}

impl BatchItemResult {
    /// Marker for an image that failed to decode
    pub fn failed() -> Self {
        Self {
            success: false,
            detections: Vec::new(),
        }
    }
}

/// Response for batch detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDetectResponse {
    pub success: bool,
    pub results: Vec<BatchItemResult>,
}

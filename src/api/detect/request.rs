// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Maximum payload length per image (base64 text, ~10MB decoded)
const MAX_PAYLOAD_LEN: usize = 14 * 1024 * 1024;

/// Request for single-image detection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    /// Base64-encoded image, optionally data-URI-prefixed
    pub image_data: String,
}

impl DetectRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.image_data.is_empty() {
            return Err(ApiError::ValidationError {
                field: "imageData".to_string(),
                message: "imageData is required".to_string(),
            });
        }
        if self.image_data.len() > MAX_PAYLOAD_LEN {
            return Err(ApiError::ValidationError {
                field: "imageData".to_string(),
                message: format!("imageData exceeds maximum length of {} bytes", MAX_PAYLOAD_LEN),
            });
        }
        Ok(())
    }
}

/// Request for batch detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDetectRequest {
    /// Base64 image payloads, processed independently in order
    pub images: Vec<String>,
}

impl BatchDetectRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(oversized) = self.images.iter().position(|i| i.len() > MAX_PAYLOAD_LEN) {
            return Err(ApiError::ValidationError {
                field: "images".to_string(),
                message: format!(
                    "images[{}] exceeds maximum length of {} bytes",
                    oversized, MAX_PAYLOAD_LEN
                ),
            });
        }
        Ok(())
    }
}

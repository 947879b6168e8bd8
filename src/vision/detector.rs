// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detector seam: the trait every detection backend implements and the raw
//! per-object output it emits.

use image::DynamicImage;

/// Confidence threshold applied to every detection request
pub const CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Coordinates a detector natively reports for one object.
///
/// Exactly one encoding is resolvable per box. Backends that report neither
/// (malformed output rows) use `Unknown`, which normalizes to a zeroed
/// placeholder instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoxCoords {
    /// Top-left / bottom-right corners in pixel units
    Corner { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Center plus extent, normalized to [0,1] of the image dimensions
    CenterNorm { xc: f32, yc: f32, w: f32, h: f32 },
    /// No resolvable coordinates
    Unknown,
}

/// One object as reported by a detector, before normalization.
///
/// `class_id` and `confidence` are optional: missing metadata defaults to
/// `0` / `0.0` during normalization rather than erroring.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBox {
    pub class_id: Option<u32>,
    pub confidence: Option<f32>,
    pub coords: BoxCoords,
}

impl RawBox {
    pub fn corner(class_id: u32, confidence: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            class_id: Some(class_id),
            confidence: Some(confidence),
            coords: BoxCoords::Corner { x1, y1, x2, y2 },
        }
    }

    pub fn center_norm(class_id: u32, confidence: f32, xc: f32, yc: f32, w: f32, h: f32) -> Self {
        Self {
            class_id: Some(class_id),
            confidence: Some(confidence),
            coords: BoxCoords::CenterNorm { xc, yc, w, h },
        }
    }
}

/// An object-detection backend.
///
/// The instance is provisioned once at startup and shared read-only across
/// requests; implementations must be internally thread-safe.
pub trait Detector: Send + Sync {
    /// Run detection on one image, keeping objects at or above `confidence`.
    ///
    /// Output order is the backend's native order and is preserved all the
    /// way to the API response.
    fn predict(&self, image: &DynamicImage, confidence: f32) -> anyhow::Result<Vec<RawBox>>;

    /// Human-readable class name for a class id, if the backend knows it
    fn class_name(&self, class_id: u32) -> Option<&str>;
}

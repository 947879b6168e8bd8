// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Normalization of raw detector output into the canonical bounding-box
//! schema returned by the API.

use serde::{Deserialize, Serialize};

use super::detector::{BoxCoords, RawBox};

/// Canonical bounding box: top-left corner plus extent.
///
/// The corner branch of normalization fills this in pixel units, the
/// center-normalized branch in [0,1] units. The schema carries no unit tag;
/// callers know which encoding their detector emits (the bundled YOLO
/// backend always emits pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One normalized detection as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Convert one raw box into the canonical schema.
///
/// Missing class id defaults to 0 and missing confidence to 0.0 so that a
/// detection is always producible even with malformed metadata. Corner
/// coordinates win over center-normalized ones; corner width/height are
/// passed through as computed, without clamping. A box with neither
/// encoding degrades to a zeroed placeholder.
pub fn normalize_detection<F>(raw: &RawBox, class_name: F) -> Detection
where
    F: Fn(u32) -> Option<String>,
{
    let class_id = raw.class_id.unwrap_or(0);
    let confidence = raw.confidence.unwrap_or(0.0);

    let bbox = match raw.coords {
        BoxCoords::Corner { x1, y1, x2, y2 } => BoundingBox {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        },
        BoxCoords::CenterNorm { xc, yc, w, h } => BoundingBox {
            x: xc - w / 2.0,
            y: yc - h / 2.0,
            width: w,
            height: h,
        },
        BoxCoords::Unknown => BoundingBox {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        },
    };

    Detection {
        class: class_name(class_id).unwrap_or_else(|| class_id.to_string()),
        confidence,
        bbox,
    }
}

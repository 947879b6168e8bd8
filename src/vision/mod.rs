// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision pipeline: payload decoding, detection, normalization, annotation
//!
//! The detector behind the [`Detector`] trait is provisioned once at startup
//! and shared read-only across requests.

pub mod annotate;
pub mod detector;
pub mod image_utils;
pub mod normalizer;
pub mod provider;
pub mod yolo;

pub use annotate::draw_detections;
pub use detector::{BoxCoords, Detector, RawBox, CONFIDENCE_THRESHOLD};
pub use image_utils::{decode_image_payload, encode_jpeg, jpeg_data_url, ImageError};
pub use normalizer::{normalize_detection, BoundingBox, Detection};
pub use provider::{candidate_paths, provision_detector, DetectorConfig, ModelError};
pub use yolo::{YoloDetector, COCO_CLASSES};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model provisioning: turn a models directory into a ready detector
//!
//! Candidate order mirrors the common local setup: an explicitly configured
//! weights file wins, then the newest training run's `best.onnx`, then the
//! stock exports. No usable candidate is fatal at startup.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tracing::info;

use super::detector::Detector;
use super::yolo::YoloDetector;

/// Stock export filenames probed inside the models directory
const STOCK_WEIGHTS: [&str; 2] = ["yolo11n.onnx", "yolov8m.onnx"];

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no usable detection model found under {0}")]
    Unavailable(PathBuf),

    #[error("failed to load detection model from {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Where to look for detection weights
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Explicit weights file; checked first when set
    pub model_path: Option<PathBuf>,
    /// Directory holding stock exports and training runs
    pub models_dir: PathBuf,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            models_dir: PathBuf::from("./models"),
        }
    }
}

/// Provision a ready-to-use detector, or fail.
///
/// The first existing candidate is loaded; a candidate that exists but fails
/// to load is an error rather than a fallthrough, so a corrupt model file
/// surfaces instead of being silently skipped.
pub fn provision_detector(config: &DetectorConfig) -> Result<Arc<dyn Detector>, ModelError> {
    for candidate in candidate_paths(config) {
        if !candidate.exists() {
            continue;
        }
        info!("loading detection model from {}", candidate.display());
        let detector = YoloDetector::load(&candidate).map_err(|source| ModelError::LoadFailed {
            path: candidate.clone(),
            source,
        })?;
        return Ok(Arc::new(detector));
    }
    Err(ModelError::Unavailable(config.models_dir.clone()))
}

/// Candidate weight paths, highest priority first
pub fn candidate_paths(config: &DetectorConfig) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = &config.model_path {
        candidates.push(path.clone());
    }
    if let Some(best) = latest_training_weights(&config.models_dir) {
        candidates.push(best);
    }
    for name in STOCK_WEIGHTS {
        candidates.push(config.models_dir.join(name));
    }
    candidates
}

/// `best.onnx` of the most recently modified `runs/detect/train*` folder
fn latest_training_weights(models_dir: &Path) -> Option<PathBuf> {
    let detect_dir = models_dir.join("runs").join("detect");
    let entries = fs::read_dir(&detect_dir).ok()?;

    let mut train_dirs: Vec<(PathBuf, SystemTime)> = entries
        .flatten()
        .filter(|e| {
            e.path().is_dir()
                && e.file_name()
                    .to_str()
                    .map(|n| n.starts_with("train"))
                    .unwrap_or(false)
        })
        .filter_map(|e| {
            let mtime = e.metadata().ok()?.modified().ok()?;
            Some((e.path(), mtime))
        })
        .collect();

    train_dirs.sort_by(|a, b| b.1.cmp(&a.1));

    let best = train_dirs.first()?.0.join("weights").join("best.onnx");
    best.exists().then_some(best)
}

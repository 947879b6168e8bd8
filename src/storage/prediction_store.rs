// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! On-disk store for accepted detection runs
//!
//! Each accepted single-image detection persists two sibling artifacts: a
//! JPEG under `<root>/images` and a label file under `<root>/labels`, both
//! named by the epoch second of the save (`pred_<secs>`). Label files use
//! the training-data convention of one center-normalized line per raw box
//! (`class_id xc yc w h`), which is deliberately a different encoding than
//! the API's corner-form response schema; this store owns both and converts
//! between them when re-reading.
//!
//! Two saves within the same second overwrite each other (last-writer-wins).
//! This matches the observable filenames of the original deployment and is
//! a documented limitation, not an accident.

use chrono::Utc;
use image::DynamicImage;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use thiserror::Error;

use crate::vision::detector::{BoxCoords, RawBox};
use crate::vision::image_utils::encode_jpeg;
use crate::vision::normalizer::{BoundingBox, Detection};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("artifact not found: {0}")]
    NotFound(String),

    #[error("invalid artifact name: {0}")]
    InvalidName(String),

    #[error("failed to encode prediction image: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One persisted detection run. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    /// Leaf filename of the image artifact, e.g. `pred_1725100000.jpg`
    pub name: String,
    pub image_path: PathBuf,
    pub label_path: PathBuf,
    /// Detections reconstructed from the label convention (corner form)
    pub detections: Vec<Detection>,
    /// Epoch seconds
    pub timestamp: i64,
}

/// Owns the images/labels areas on disk; the only component that touches them
#[derive(Debug)]
pub struct PredictionStore {
    root: PathBuf,
}

impl PredictionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    pub fn labels_dir(&self) -> PathBuf {
        self.root.join("labels")
    }

    /// Persist an annotated image plus its label file.
    ///
    /// Creates the storage areas if absent. The image is written as JPEG
    /// under a second-resolution timestamp name; the label file shares the
    /// base name with a `.txt` extension.
    pub fn save(
        &self,
        image: &DynamicImage,
        raw_boxes: &[RawBox],
    ) -> Result<PredictionRecord, StoreError> {
        fs::create_dir_all(self.images_dir())?;
        fs::create_dir_all(self.labels_dir())?;

        let timestamp = Utc::now().timestamp();
        let name = format!("pred_{timestamp}.jpg");

        let jpeg = encode_jpeg(image).map_err(|e| StoreError::Encode(e.to_string()))?;
        let image_path = self.images_dir().join(&name);
        fs::write(&image_path, &jpeg)?;

        let lines = label_lines(raw_boxes, image.width(), image.height());
        let mut text = String::new();
        for line in &lines {
            let _ = writeln!(
                text,
                "{} {} {} {} {}",
                line.class_id, line.xc, line.yc, line.w, line.h
            );
        }
        let label_path = self.labels_dir().join(format!("pred_{timestamp}.txt"));
        fs::write(&label_path, text)?;

        Ok(PredictionRecord {
            name,
            image_path,
            label_path,
            detections: lines.iter().map(LabelLine::to_detection).collect(),
            timestamp,
        })
    }

    /// All persisted runs, newest first by modification time.
    ///
    /// A record whose label file is missing yields an empty detection list;
    /// an interrupted save can leave such an orphan and listing tolerates it.
    pub fn list(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let images_dir = self.images_dir();
        if !images_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<(PathBuf, i64)> = Vec::new();
        for entry in fs::read_dir(&images_dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let mtime = entry
                .metadata()?
                .modified()?
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);
            entries.push((entry.path(), mtime));
        }
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        let mut records = Vec::with_capacity(entries.len());
        for (path, timestamp) in entries {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let label_path = self.labels_dir().join(label_name(name));
            records.push(PredictionRecord {
                name: name.to_string(),
                image_path: path.clone(),
                label_path: label_path.clone(),
                detections: read_label_detections(&label_path),
                timestamp,
            });
        }
        Ok(records)
    }

    /// Raw bytes of a stored image
    pub fn read_image(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        validate_artifact_name(name)?;
        let path = self.images_dir().join(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(fs::read(path)?)
    }

    /// Text content of a stored label file
    pub fn read_label(&self, name: &str) -> Result<String, StoreError> {
        validate_artifact_name(name)?;
        let path = self.labels_dir().join(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }
}

/// Names are leaf filenames only; anything else never reaches the filesystem
fn validate_artifact_name(name: &str) -> Result<(), StoreError> {
    let ok = !name.is_empty()
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Sibling label filename for an image artifact
fn label_name(image_name: &str) -> String {
    match image_name.rsplit_once('.') {
        Some((stem, _ext)) => format!("{stem}.txt"),
        None => format!("{image_name}.txt"),
    }
}

/// One center-normalized label line
#[derive(Debug, Clone, Copy, PartialEq)]
struct LabelLine {
    class_id: u32,
    xc: f32,
    yc: f32,
    w: f32,
    h: f32,
}

impl LabelLine {
    /// Reverse the center-form convention back into the canonical schema
    fn to_detection(&self) -> Detection {
        Detection {
            class: self.class_id.to_string(),
            confidence: 1.0,
            bbox: BoundingBox {
                x: self.xc - self.w / 2.0,
                y: self.yc - self.h / 2.0,
                width: self.w,
                height: self.h,
            },
        }
    }
}

/// Center-normalized lines for a detection run.
///
/// Center-normalized boxes pass through unchanged; corner boxes are
/// converted through the image dimensions (an independent conversion path
/// from the response schema); unresolvable boxes write zeros.
fn label_lines(raw_boxes: &[RawBox], img_w: u32, img_h: u32) -> Vec<LabelLine> {
    let (fw, fh) = (img_w.max(1) as f32, img_h.max(1) as f32);
    raw_boxes
        .iter()
        .map(|raw| {
            let (xc, yc, w, h) = match raw.coords {
                BoxCoords::CenterNorm { xc, yc, w, h } => (xc, yc, w, h),
                BoxCoords::Corner { x1, y1, x2, y2 } => (
                    (x1 + x2) / 2.0 / fw,
                    (y1 + y2) / 2.0 / fh,
                    (x2 - x1) / fw,
                    (y2 - y1) / fh,
                ),
                BoxCoords::Unknown => (0.0, 0.0, 0.0, 0.0),
            };
            LabelLine {
                class_id: raw.class_id.unwrap_or(0),
                xc,
                yc,
                w,
                h,
            }
        })
        .collect()
}

fn read_label_detections(path: &Path) -> Vec<Detection> {
    let Ok(text) = fs::read_to_string(path) else {
        return Vec::new();
    };
    text.lines()
        .filter_map(parse_label_line)
        .map(|line| line.to_detection())
        .collect()
}

fn parse_label_line(line: &str) -> Option<LabelLine> {
    let mut parts = line.split_whitespace();
    let class_id = parts.next()?.parse().ok()?;
    let xc = parts.next()?.parse().ok()?;
    let yc = parts.next()?.parse().ok()?;
    let w = parts.next()?.parse().ok()?;
    let h = parts.next()?.parse().ok()?;
    Some(LabelLine {
        class_id,
        xc,
        yc,
        w,
        h,
    })
}

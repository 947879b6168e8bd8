// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX-backed YOLO detection backend
//!
//! Runs a YOLOv8/YOLO11-family ONNX export through ONNX Runtime on CPU.
//! The raw output tensor is `[1, 4 + classes, anchors]` stored column-major:
//! rows 0..4 are (cx, cy, w, h) in 640-space, the remaining rows are
//! per-class scores.

use anyhow::{Context, Result};
use image::{imageops::FilterType, DynamicImage};
use ndarray::{Array4, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use super::detector::{Detector, RawBox};

/// Model input resolution
const INPUT_SIZE: u32 = 640;

/// IoU threshold for non-maximum suppression
const IOU_THRESHOLD: f32 = 0.45;

/// COCO class names, indexed by class id
pub const COCO_CLASSES: [&str; 80] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "airplane",
    "bus",
    "train",
    "truck",
    "boat",
    "traffic light",
    "fire hydrant",
    "stop sign",
    "parking meter",
    "bench",
    "bird",
    "cat",
    "dog",
    "horse",
    "sheep",
    "cow",
    "elephant",
    "bear",
    "zebra",
    "giraffe",
    "backpack",
    "umbrella",
    "handbag",
    "tie",
    "suitcase",
    "frisbee",
    "skis",
    "snowboard",
    "sports ball",
    "kite",
    "baseball bat",
    "baseball glove",
    "skateboard",
    "surfboard",
    "tennis racket",
    "bottle",
    "wine glass",
    "cup",
    "fork",
    "knife",
    "spoon",
    "bowl",
    "banana",
    "apple",
    "sandwich",
    "orange",
    "broccoli",
    "carrot",
    "hot dog",
    "pizza",
    "donut",
    "cake",
    "chair",
    "couch",
    "potted plant",
    "bed",
    "dining table",
    "toilet",
    "tv",
    "laptop",
    "mouse",
    "remote",
    "keyboard",
    "cell phone",
    "microwave",
    "oven",
    "toaster",
    "sink",
    "refrigerator",
    "book",
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "hair drier",
    "toothbrush",
];

/// Candidate box in source-image pixel coordinates, pre-NMS
#[derive(Debug, Clone, Copy)]
struct Candidate {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    score: f32,
    class_id: u32,
}

impl Candidate {
    fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    fn iou(&self, other: &Candidate) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// YOLO detector over an ONNX Runtime session.
///
/// The session is shared behind a mutex; requests serialize on it.
pub struct YoloDetector {
    session: Mutex<Session>,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector").finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load a YOLO ONNX export from disk
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        info!("YOLO model loaded from {}", model_path.display());

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Build the `[1, 3, 640, 640]` float input from an image
    fn preprocess(image: &DynamicImage) -> Array4<f32> {
        let resized = image
            .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
            .to_rgb8();

        let mut input = Array4::<f32>::zeros((1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            input[[0, 0, y, x]] = pixel.0[0] as f32 / 255.0;
            input[[0, 1, y, x]] = pixel.0[1] as f32 / 255.0;
            input[[0, 2, y, x]] = pixel.0[2] as f32 / 255.0;
        }
        input
    }
}

impl Detector for YoloDetector {
    fn predict(&self, image: &DynamicImage, confidence: f32) -> Result<Vec<RawBox>> {
        let input = Self::preprocess(image);

        let mut session = self.session.lock().unwrap();
        let outputs = session
            .run(ort::inputs!["images" => Value::from_array(input)?])
            .context("YOLO inference failed")?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract YOLO output tensor")?;

        let shape = output.shape();
        if shape.len() != 3 || shape[1] < 5 {
            anyhow::bail!("Unexpected YOLO output shape: {:?}", shape);
        }
        let num_classes = shape[1] - 4;
        let num_anchors = shape[2];

        // [rows, anchors] view of the single batch entry
        let out = output.index_axis(Axis(0), 0);

        let scale_x = image.width() as f32 / INPUT_SIZE as f32;
        let scale_y = image.height() as f32 / INPUT_SIZE as f32;

        let mut candidates = Vec::new();
        for i in 0..num_anchors {
            let mut best_class = 0usize;
            let mut best_score = 0f32;
            for c in 0..num_classes {
                let s = out[[4 + c, i]];
                if s > best_score {
                    best_score = s;
                    best_class = c;
                }
            }
            if best_score < confidence {
                continue;
            }

            let cx = out[[0, i]];
            let cy = out[[1, i]];
            let w = out[[2, i]];
            let h = out[[3, i]];

            candidates.push(Candidate {
                x1: ((cx - w / 2.0) * scale_x).max(0.0),
                y1: ((cy - h / 2.0) * scale_y).max(0.0),
                x2: ((cx + w / 2.0) * scale_x).min(image.width() as f32),
                y2: ((cy + h / 2.0) * scale_y).min(image.height() as f32),
                score: best_score,
                class_id: best_class as u32,
            });
        }

        let kept = nms(candidates, IOU_THRESHOLD);

        Ok(kept
            .into_iter()
            .map(|c| RawBox::corner(c.class_id, c.score, c.x1, c.y1, c.x2, c.y2))
            .collect())
    }

    fn class_name(&self, class_id: u32) -> Option<&str> {
        COCO_CLASSES.get(class_id as usize).copied()
    }
}

/// Greedy IoU-based non-maximum suppression
fn nms(mut boxes: Vec<Candidate>, iou_threshold: f32) -> Vec<Candidate> {
    boxes.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Candidate> = Vec::new();
    let mut suppressed = vec![false; boxes.len()];

    for i in 0..boxes.len() {
        if suppressed[i] {
            continue;
        }
        kept.push(boxes[i]);
        for j in (i + 1)..boxes.len() {
            if boxes[i].iou(&boxes[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    kept
}

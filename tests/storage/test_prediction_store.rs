// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Store-level tests for the persisted image+label pairs

use image::{DynamicImage, RgbImage};
use std::fs;
use tempfile::TempDir;
use yolo_local_node::{
    storage::{PredictionStore, StoreError},
    vision::RawBox,
};

fn test_image() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::new(120, 90))
}

fn setup() -> (PredictionStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    (PredictionStore::new(dir.path()), dir)
}

#[test]
fn test_save_then_list_most_recent_matches() {
    let (store, _dir) = setup();
    let boxes = vec![
        RawBox::center_norm(0, 0.9, 0.5, 0.5, 0.2, 0.4),
        RawBox::corner(2, 0.7, 12.0, 9.0, 60.0, 45.0),
        RawBox::center_norm(5, 0.6, 0.1, 0.1, 0.05, 0.05),
    ];
    let record = store.save(&test_image(), &boxes).unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed[0].name, record.name);
    // Reconstructed detection count equals the number of raw boxes saved
    assert_eq!(listed[0].detections.len(), boxes.len());
}

#[test]
fn test_storage_areas_created_idempotently() {
    let (store, dir) = setup();
    let boxes = vec![RawBox::center_norm(0, 0.9, 0.5, 0.5, 0.2, 0.2)];
    store.save(&test_image(), &boxes).unwrap();
    store.save(&test_image(), &boxes).unwrap();

    assert!(dir.path().join("images").is_dir());
    assert!(dir.path().join("labels").is_dir());
}

#[test]
fn test_label_file_one_line_per_raw_box() {
    let (store, _dir) = setup();
    let boxes = vec![
        RawBox::center_norm(0, 0.9, 0.5, 0.5, 0.2, 0.2),
        RawBox::center_norm(7, 0.8, 0.3, 0.3, 0.1, 0.1),
    ];
    let record = store.save(&test_image(), &boxes).unwrap();

    let text = fs::read_to_string(&record.label_path).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("0 "));
    assert!(lines[1].starts_with("7 "));
}

#[test]
fn test_same_second_collision_last_writer_wins() {
    let (store, _dir) = setup();
    let first = store
        .save(&test_image(), &[RawBox::center_norm(0, 0.9, 0.5, 0.5, 0.2, 0.2)])
        .unwrap();
    let second = store
        .save(&test_image(), &[RawBox::center_norm(1, 0.9, 0.5, 0.5, 0.2, 0.2)])
        .unwrap();

    let listed = store.list().unwrap();
    if first.name == second.name {
        // Known limitation: one surviving record carrying the second label
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].detections[0].class, "1");
    } else {
        // Saves straddled a second boundary
        assert_eq!(listed.len(), 2);
    }
}

#[test]
fn test_orphaned_image_tolerated() {
    let (store, _dir) = setup();
    let record = store
        .save(&test_image(), &[RawBox::center_norm(0, 0.9, 0.5, 0.5, 0.2, 0.2)])
        .unwrap();
    fs::remove_file(&record.label_path).unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].detections.is_empty());
}

#[test]
fn test_retrieval_by_listed_name_succeeds() {
    let (store, _dir) = setup();
    store
        .save(&test_image(), &[RawBox::center_norm(0, 0.9, 0.5, 0.5, 0.2, 0.2)])
        .unwrap();

    let listed = store.list().unwrap();
    let name = &listed[0].name;
    assert!(store.read_image(name).is_ok());
    assert!(store.read_label(&name.replace(".jpg", ".txt")).is_ok());
}

#[test]
fn test_retrieval_unknown_name_not_found() {
    let (store, _dir) = setup();
    assert!(matches!(
        store.read_image("pred_12345.jpg"),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.read_label("pred_12345.txt"),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_path_traversal_never_resolves() {
    let (store, dir) = setup();
    // Plant a file outside the storage areas; a traversal name must not reach it
    fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

    assert!(matches!(
        store.read_label("../secret.txt"),
        Err(StoreError::InvalidName(_))
    ));
}

#[test]
fn test_saved_image_is_jpeg() {
    let (store, _dir) = setup();
    let record = store
        .save(&test_image(), &[RawBox::center_norm(0, 0.9, 0.5, 0.5, 0.2, 0.2)])
        .unwrap();

    let bytes = store.read_image(&record.name).unwrap();
    // JPEG magic: FF D8 FF
    assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
}

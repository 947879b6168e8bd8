// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Box rendering for annotated response images

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use super::detector::{BoxCoords, RawBox};

/// Box outline thickness in pixels
const BOX_THICKNESS: u32 = 2;

/// Per-class colors, indexed by `class_id % len`
const PALETTE: [[u8; 3]; 8] = [
    [230, 57, 70],
    [46, 196, 182],
    [255, 159, 28],
    [69, 123, 157],
    [138, 201, 38],
    [155, 93, 229],
    [241, 91, 181],
    [0, 187, 249],
];

/// Draw every raw box onto a copy of the image.
///
/// Corner boxes are taken as pixel coordinates; center-normalized boxes are
/// scaled by the image dimensions; boxes with no resolvable coordinates are
/// skipped. Boxes are clamped to the image bounds and degenerate boxes are
/// dropped.
pub fn draw_detections(image: &DynamicImage, boxes: &[RawBox]) -> DynamicImage {
    let mut canvas: RgbImage = image.to_rgb8();
    let (img_w, img_h) = (canvas.width(), canvas.height());

    for raw in boxes {
        let (x1, y1, x2, y2) = match raw.coords {
            BoxCoords::Corner { x1, y1, x2, y2 } => (x1, y1, x2, y2),
            BoxCoords::CenterNorm { xc, yc, w, h } => {
                let (fw, fh) = (img_w as f32, img_h as f32);
                (
                    (xc - w / 2.0) * fw,
                    (yc - h / 2.0) * fh,
                    (xc + w / 2.0) * fw,
                    (yc + h / 2.0) * fh,
                )
            }
            BoxCoords::Unknown => continue,
        };

        let x1 = (x1.floor() as i32).clamp(0, img_w as i32 - 1);
        let y1 = (y1.floor() as i32).clamp(0, img_h as i32 - 1);
        let x2 = (x2.ceil() as i32).clamp(0, img_w as i32 - 1);
        let y2 = (y2.ceil() as i32).clamp(0, img_h as i32 - 1);

        if x1 >= x2 || y1 >= y2 {
            continue;
        }

        let color = PALETTE[raw.class_id.unwrap_or(0) as usize % PALETTE.len()];

        for inset in 0..BOX_THICKNESS as i32 {
            let w = x2 - x1 - 2 * inset;
            let h = y2 - y1 - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(x1 + inset, y1 + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut canvas, rect, Rgb(color));
        }
    }

    DynamicImage::ImageRgb8(canvas)
}

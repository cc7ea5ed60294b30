#![allow(dead_code)]

use std::path::Path;

use ndarray::Array3;

use greenkey_core::frame::{ColorSpace, Frame};
use greenkey_core::io::image_io::save_frame;
use greenkey_core::pipeline::PipelineConfig;

/// Pure backdrop color in capture order (B, G, R).
pub const GREEN: [u8; 3] = [0, 255, 0];

/// Saturated blue: hue 120, outside both the backdrop and the skin ranges.
pub const BLUE_SUBJECT: [u8; 3] = [200, 50, 50];

/// Background used by the end-to-end fixtures.
pub const BACKGROUND: [u8; 3] = [10, 20, 30];

/// An HSV-tagged frame with every pixel set to `px`.
pub fn hsv_frame(height: usize, width: usize, px: [u8; 3]) -> Frame {
    let data = Array3::from_shape_fn((height, width, 3), |(_, _, ch)| px[ch]);
    Frame::new(data, ColorSpace::Hsv).unwrap()
}

/// Whether `(row, col)` lies inside the disk of radius `r` around `(cy, cx)`.
pub fn in_disk(row: usize, col: usize, cy: f64, cx: f64, r: f64) -> bool {
    let dy = row as f64 - cy;
    let dx = col as f64 - cx;
    dy * dy + dx * dx <= r * r
}

/// Green field with a filled disk of `subject` color.
pub fn green_with_disk(
    height: usize,
    width: usize,
    center: (f64, f64),
    radius: f64,
    subject: [u8; 3],
) -> Frame {
    let (cy, cx) = center;
    Frame::from_fn(height, width, |row, col| {
        if in_disk(row, col, cy, cx, radius) {
            subject
        } else {
            GREEN
        }
    })
    .unwrap()
}

/// Two-color checkerboard of `cell`-sized squares.
pub fn checkerboard(height: usize, width: usize, cell: usize) -> Frame {
    Frame::from_fn(height, width, |row, col| {
        if (row / cell + col / cell) % 2 == 0 {
            [12, 200, 99]
        } else {
            [250, 3, 140]
        }
    })
    .unwrap()
}

pub fn write_png(path: &Path, frame: &Frame) {
    save_frame(frame, path, 95).unwrap();
}

/// Config with the framing step reduced to a no-op: full-extent crop at the
/// input width.
pub fn passthrough_config(width: u32) -> PipelineConfig {
    PipelineConfig {
        crop_margin_width: 0.5,
        crop_margin_height: 0.5,
        output_width: width,
        ..Default::default()
    }
}

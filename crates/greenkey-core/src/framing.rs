//! Re-framing: crop around a center point, then rescale to the output width.

use ndarray::{s, Array3, Axis};
use rayon::prelude::*;

use crate::error::{GreenkeyError, Result};
use crate::frame::{Frame, CHANNELS};

/// A rectangle in image coordinates for cropping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Size of a crop that extends `margin * extent` on each side of the center,
/// degenerating to the full extent when the image is too small.
fn crop_extent(extent: usize, margin: f32) -> usize {
    let size = (2.0 * margin as f64 * extent as f64).round() as usize;
    size.clamp(1, extent)
}

/// Start of a `size`-long window centered at `center`, shifted (not shrunk)
/// back inside `[0, extent)`.
fn window_start(center: f64, size: usize, extent: usize) -> usize {
    let start = (center - size as f64 / 2.0).round();
    let max_start = (extent - size) as f64;
    start.clamp(0.0, max_start) as usize
}

/// Compute the crop rectangle for a `width` x `height` image.
///
/// The rectangle is `2 * margin_w * width` by `2 * margin_h * height`,
/// centered on `center` (`(x, y)`, or the image center when `None`). When it
/// would overflow an edge it is shifted back inside the image, so its size
/// does not depend on where the center lies.
pub fn frame_rect(
    width: usize,
    height: usize,
    center: Option<(f64, f64)>,
    margin_w: f32,
    margin_h: f32,
) -> CropRect {
    let (cx, cy) = center.unwrap_or((width as f64 / 2.0, height as f64 / 2.0));
    let cw = crop_extent(width, margin_w);
    let ch = crop_extent(height, margin_h);
    CropRect {
        x: window_start(cx, cw, width),
        y: window_start(cy, ch, height),
        width: cw,
        height: ch,
    }
}

/// Copy the pixels inside `rect` into a new frame.
pub fn crop(frame: &Frame, rect: &CropRect) -> Result<Frame> {
    if rect.width == 0
        || rect.height == 0
        || rect.x + rect.width > frame.width()
        || rect.y + rect.height > frame.height()
    {
        return Err(GreenkeyError::DimensionMismatch {
            width: rect.x + rect.width,
            height: rect.y + rect.height,
            bg_width: frame.width(),
            bg_height: frame.height(),
        });
    }
    let view = frame.data();
    let region = view.slice(s![
        rect.y..rect.y + rect.height,
        rect.x..rect.x + rect.width,
        ..
    ]);
    Frame::new(region.to_owned(), frame.space())
}

/// Per destination index, the source indices it covers and their normalized
/// coverage weights.
fn area_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = start + scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = (end.min(s as f64 + 1.0) - start.max(s as f64)).max(0.0);
                    (overlap > 0.0).then_some((s, (overlap / scale) as f32))
                })
                .collect()
        })
        .collect()
}

/// Rescale to `target_width` with area-averaging interpolation, keeping the
/// aspect ratio (height is truncated, never below 1).
pub fn resize_area(frame: &Frame, target_width: u32) -> Result<Frame> {
    if target_width == 0 {
        return Err(GreenkeyError::InvalidConfig(
            "output width must be > 0".into(),
        ));
    }
    let (w, h) = (frame.width(), frame.height());
    let tw = target_width as usize;
    let th = ((h as f64 * tw as f64 / w as f64) as usize).max(1);
    if tw == w && th == h {
        return Ok(frame.clone());
    }

    let src = frame.data();
    let x_weights = area_weights(w, tw);
    let y_weights = area_weights(h, th);

    // Horizontal pass into f32 to keep precision for the vertical pass.
    let mut horizontal = Array3::<f32>::zeros((h, tw, CHANNELS));
    horizontal
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(row, mut out_row)| {
            for (dx, taps) in x_weights.iter().enumerate() {
                for &(sx, wgt) in taps {
                    for ch in 0..CHANNELS {
                        out_row[[dx, ch]] += wgt * src[[row, sx, ch]] as f32;
                    }
                }
            }
        });

    let mut out = Array3::<u8>::zeros((th, tw, CHANNELS));
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(dy, mut out_row)| {
            for dx in 0..tw {
                for ch in 0..CHANNELS {
                    let sum: f32 = y_weights[dy]
                        .iter()
                        .map(|&(sy, wgt)| wgt * horizontal[[sy, dx, ch]])
                        .sum();
                    out_row[[dx, ch]] = sum.round().clamp(0.0, 255.0) as u8;
                }
            }
        });

    Frame::new(out, frame.space())
}

/// Crop around `center` with the given margins, then rescale to `target_width`.
pub fn frame(
    image: &Frame,
    center: Option<(f64, f64)>,
    margin_w: f32,
    margin_h: f32,
    target_width: u32,
) -> Result<Frame> {
    let rect = frame_rect(image.width(), image.height(), center, margin_w, margin_h);
    let cropped = crop(image, &rect)?;
    resize_area(&cropped, target_width)
}

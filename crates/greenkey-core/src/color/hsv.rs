use ndarray::{Array3, ArrayView1, ArrayViewMut1, Axis, Zip};

use crate::consts::{HUE_SCALE, PARALLEL_PIXEL_THRESHOLD};
use crate::error::Result;
use crate::frame::{ColorSpace, Frame, BLUE, GREEN, RED};

/// Convert one capture-order pixel `[b, g, r]` to 8-bit `[h, s, v]`.
///
/// Hue is in degrees halved (0..180), saturation and value are 0..=255.
pub fn bgr_to_hsv(px: [u8; 3]) -> [u8; 3] {
    let b = px[BLUE] as f32;
    let g = px[GREEN] as f32;
    let r = px[RED] as f32;

    let v = b.max(g).max(r);
    let min = b.min(g).min(r);
    let delta = v - min;

    let s = if v > 0.0 { 255.0 * delta / v } else { 0.0 };

    let h = if delta == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / delta
    } else if v == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let h8 = (h / 2.0).round() as u16 % HUE_SCALE;
    [h8 as u8, s.round() as u8, v as u8]
}

/// Convert a capture-space frame to HSV.
///
/// The conversion is one-way: passing a frame that is already in HSV space
/// returns [`GreenkeyError::ColorSpaceMismatch`](crate::error::GreenkeyError).
pub fn to_hsv(frame: &Frame) -> Result<Frame> {
    frame.require_space(ColorSpace::Capture)?;

    let src = frame.data();
    let mut out = Array3::<u8>::zeros(src.raw_dim());
    let zip = Zip::from(out.lanes_mut(Axis(2))).and(src.lanes(Axis(2)));

    if frame.width() * frame.height() >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(convert_lane);
    } else {
        zip.for_each(convert_lane);
    }

    Frame::new(out, ColorSpace::Hsv)
}

fn convert_lane(mut dst: ArrayViewMut1<u8>, px: ArrayView1<u8>) {
    let hsv = bgr_to_hsv([px[0], px[1], px[2]]);
    dst[0] = hsv[0];
    dst[1] = hsv[1];
    dst[2] = hsv[2];
}

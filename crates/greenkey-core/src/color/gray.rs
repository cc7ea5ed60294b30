use ndarray::Array2;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::Result;
use crate::frame::{ColorSpace, Frame, BLUE, GREEN, RED};

/// BT.601 luminance of a capture-space frame, as an 8-bit grid.
pub fn to_gray(frame: &Frame) -> Result<Array2<u8>> {
    frame.require_space(ColorSpace::Capture)?;
    let data = frame.data();
    Ok(Array2::from_shape_fn(
        (frame.height(), frame.width()),
        |(row, col)| {
            let y = LUMINANCE_B * data[[row, col, BLUE]] as f32
                + LUMINANCE_G * data[[row, col, GREEN]] as f32
                + LUMINANCE_R * data[[row, col, RED]] as f32;
            y.round().clamp(0.0, 255.0) as u8
        },
    ))
}

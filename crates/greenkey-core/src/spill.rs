//! Spill correction: neutralizes the green cast reflected onto the subject.

use ndarray::{Axis, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{GreenkeyError, Result};
use crate::frame::{ColorSpace, Frame, BLUE, GREEN, RED};
use crate::mask::Mask;

/// Weights of the corrected green channel: `g' = blue*b + green*g + red*r`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpillWeights {
    pub blue: f32,
    pub green: f32,
    pub red: f32,
}

impl SpillWeights {
    /// Keeps part of the natural green.
    pub const PARTIAL: SpillWeights = SpillWeights {
        blue: 0.3,
        green: 0.4,
        red: 0.3,
    };

    /// Green becomes the blue/red average.
    pub const FULL: SpillWeights = SpillWeights {
        blue: 0.5,
        green: 0.0,
        red: 0.5,
    };

    pub fn sum(&self) -> f32 {
        self.blue + self.green + self.red
    }
}

impl Default for SpillWeights {
    fn default() -> Self {
        Self::PARTIAL
    }
}

/// Rewrite the green channel of every pixel selected by `candidates`.
///
/// Blue and red are left as they are; only green moves toward the
/// blue/red average, so the change in brightness stays small.
pub fn correct(frame: &Frame, candidates: &Mask, weights: &SpillWeights) -> Result<Frame> {
    frame.require_space(ColorSpace::Capture)?;
    if candidates.width() != frame.width() || candidates.height() != frame.height() {
        return Err(GreenkeyError::InvalidDimensions {
            width: candidates.width(),
            height: candidates.height(),
            channels: 1,
        });
    }

    let mut out = frame.clone();
    Zip::from(out.data_mut().lanes_mut(Axis(2)))
        .and(&candidates.data)
        .for_each(|mut px, &selected| {
            if !selected {
                return;
            }
            let g = weights.blue * px[BLUE] as f32
                + weights.green * px[GREEN] as f32
                + weights.red * px[RED] as f32;
            px[GREEN] = g.round().clamp(0.0, 255.0) as u8;
        });
    Ok(out)
}

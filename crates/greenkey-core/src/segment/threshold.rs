use ndarray::Array2;
use tracing::debug;

use crate::error::Result;
use crate::frame::{ColorSpace, Frame};
use crate::mask::Mask;

use super::config::{Criterion, HsvRange, SegmentationConfig};

/// Select every pixel of an HSV frame that falls inside `range`.
pub fn in_range(hsv: &Frame, range: &HsvRange) -> Result<Mask> {
    hsv.require_space(ColorSpace::Hsv)?;
    let data = hsv.data();
    let mask = Array2::from_shape_fn((hsv.height(), hsv.width()), |(row, col)| {
        range.contains([
            data[[row, col, 0]],
            data[[row, col, 1]],
            data[[row, col, 2]],
        ])
    });
    Ok(Mask::new(mask))
}

/// Classify an HSV frame against a single named criterion.
pub fn segment(hsv: &Frame, criterion: Criterion, config: &SegmentationConfig) -> Result<Mask> {
    in_range(hsv, &config.range(criterion))
}

/// Union of the lit, shadowed and overexposed backdrop masks.
pub fn backdrop_mask(hsv: &Frame, config: &SegmentationConfig) -> Result<Mask> {
    let lit = segment(hsv, Criterion::Backdrop, config)?;
    let shadow = segment(hsv, Criterion::ShadowedBackdrop, config)?;
    let overexposed = segment(hsv, Criterion::OverexposedBackdrop, config)?;

    let combined = lit.union(&shadow).union(&overexposed);
    debug!(
        lit = lit.count(),
        shadow = shadow.count(),
        overexposed = overexposed.count(),
        combined = combined.count(),
        "Backdrop segmented"
    );
    Ok(combined)
}

/// Spill-candidate pixels that are not part of `backdrop`.
///
/// The skin hue range overlaps the backdrop hues, so the raw candidate mask
/// is never used on its own.
pub fn spill_candidate_mask(
    hsv: &Frame,
    backdrop: &Mask,
    config: &SegmentationConfig,
) -> Result<Mask> {
    let candidates = segment(hsv, Criterion::SpillCandidate, config)?;
    Ok(candidates.difference(backdrop))
}

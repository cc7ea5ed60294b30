//! Subject location: find a face to center the output crop on.

#[cfg(feature = "face-detection")]
pub mod rustface_backend;

use image::imageops::FilterType;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::to_gray;
use crate::error::{GreenkeyError, Result};
use crate::frame::{BoundingBox, Frame};

#[cfg(feature = "face-detection")]
pub use rustface_backend::RustfaceDetector;

/// Pluggable frontal-face detector.
///
/// Receives a row-major grayscale buffer of `width` x `height` bytes and
/// returns candidate boxes in that buffer's coordinates, in detector order.
pub trait SubjectDetector: Send + Sync {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<BoundingBox>;
}

/// Which candidate wins when the detector returns several faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacePick {
    /// The detector's first candidate.
    #[default]
    First,
    /// The candidate with the largest area; earlier candidates win ties.
    Largest,
    /// The candidate whose center is closest to the image center.
    MostCentered,
}

impl std::fmt::Display for FacePick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "First"),
            Self::Largest => write!(f, "Largest"),
            Self::MostCentered => write!(f, "Most Centered"),
        }
    }
}

/// Apply the tie-break policy to a list of candidates found in a
/// `width` x `height` image.
pub fn pick_face(
    candidates: &[BoundingBox],
    policy: FacePick,
    width: usize,
    height: usize,
) -> Option<BoundingBox> {
    match policy {
        FacePick::First => candidates.first().copied(),
        FacePick::Largest => candidates
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.area().cmp(&b.area()).then(ib.cmp(ia)))
            .map(|(_, b)| *b),
        FacePick::MostCentered => {
            let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
            let dist = |b: &BoundingBox| {
                let (x, y) = b.center();
                (x - cx).powi(2) + (y - cy).powi(2)
            };
            candidates
                .iter()
                .min_by(|a, b| dist(a).total_cmp(&dist(b)))
                .copied()
        }
    }
}

/// Find the subject's face in a capture-space frame.
///
/// Detection runs on a grayscale copy downscaled to `detection_width`
/// (never upscaled); the chosen box is mapped back to full resolution and
/// clamped to the frame. Returns `None` when nothing is detected.
pub fn locate(
    frame: &Frame,
    detector: &dyn SubjectDetector,
    detection_width: u32,
    policy: FacePick,
) -> Result<Option<BoundingBox>> {
    if detection_width == 0 {
        return Err(GreenkeyError::InvalidConfig(
            "face detection width must be > 0".into(),
        ));
    }
    let (w, h) = (frame.width(), frame.height());
    let gray = to_gray(frame)?;
    let raw: Vec<u8> = gray.iter().copied().collect();
    let full = GrayImage::from_raw(w as u32, h as u32, raw).ok_or_else(|| {
        GreenkeyError::InvalidDimensions {
            width: w,
            height: h,
            channels: 1,
        }
    })?;

    let ratio = (detection_width as f64 / w as f64).min(1.0);
    let small = if ratio < 1.0 {
        let dh = ((h as f64 * ratio).round() as u32).max(1);
        image::imageops::resize(&full, detection_width, dh, FilterType::Triangle)
    } else {
        full
    };

    let candidates = detector.detect(small.as_raw(), small.width(), small.height());
    debug!(
        candidates = candidates.len(),
        width = small.width(),
        height = small.height(),
        "Face detection finished"
    );

    let Some(face) = pick_face(
        &candidates,
        policy,
        small.width() as usize,
        small.height() as usize,
    ) else {
        return Ok(None);
    };

    let scale = |v: usize| (v as f64 / ratio).round() as usize;
    let full_box = BoundingBox {
        left: scale(face.left),
        top: scale(face.top),
        width: scale(face.width),
        height: scale(face.height),
    };
    Ok(full_box.clamped(w, h))
}

/// Frame center for re-framing: the face center if one is found.
pub fn subject_center(face: Option<BoundingBox>) -> Option<(f64, f64)> {
    face.map(|b| b.center())
}

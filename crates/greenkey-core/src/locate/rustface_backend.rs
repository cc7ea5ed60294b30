use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::consts::{FACE_MIN_SIZE, FACE_SCORE_THRESHOLD};
use crate::error::{GreenkeyError, Result};
use crate::frame::BoundingBox;

use super::SubjectDetector;

/// Frontal-face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model file is read once; each call builds a fresh detector from a
/// clone of it, so one instance can be shared across worker threads.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load a SeetaFace frontal model (e.g. `seeta_fd_frontal_v1.0.bin`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let asset_error = |reason: String| GreenkeyError::Asset {
            path: path.to_path_buf(),
            reason,
        };
        let file = File::open(path).map_err(|e| asset_error(e.to_string()))?;
        let model =
            rustface::read_model(BufReader::new(file)).map_err(|e| asset_error(e.to_string()))?;
        Ok(Self { model })
    }
}

impl SubjectDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<BoundingBox> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(FACE_MIN_SIZE);
        detector.set_score_thresh(FACE_SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                clip_box(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect()
    }
}

/// Clip a detector box that may start at negative coordinates. The part
/// hanging off the top or left edge is dropped, not shifted inside.
fn clip_box(x: i32, y: i32, width: u32, height: u32) -> Option<BoundingBox> {
    let clip = |start: i32, extent: u32| {
        let end = start as i64 + extent as i64;
        let start = start.max(0) as i64;
        (end > start).then_some((start as usize, (end - start) as usize))
    };
    let (left, width) = clip(x, width)?;
    let (top, height) = clip(y, height)?;
    Some(BoundingBox {
        left,
        top,
        width,
        height,
    })
}

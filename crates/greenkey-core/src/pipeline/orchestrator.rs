use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::color::to_hsv;
use crate::composite::{blend, composite};
use crate::error::{GreenkeyError, Result};
use crate::frame::Frame;
use crate::framing::{self, crop, resize_area, CropRect};
use crate::io::image_io::{load_background, load_frame, save_frame};
use crate::locate::{locate, subject_center, SubjectDetector};
use crate::refine::{border, smooth};
use crate::segment::{backdrop_mask, spill_candidate_mask};
use crate::spill::correct;

use super::config::PipelineConfig;
use super::types::{PipelineStage, ProcessedFrame};

/// Runs the compositing pipeline on single images.
///
/// Holds the validated configuration, the shared read-only background and
/// the optional face detector. One instance serves every worker of a batch.
pub struct Orchestrator {
    config: PipelineConfig,
    background: Arc<Frame>,
    detector: Option<Arc<dyn SubjectDetector>>,
}

impl Orchestrator {
    /// Build from already-loaded assets.
    ///
    /// Fails if the configuration is invalid, or if face detection is
    /// enabled without a detector.
    pub fn new(
        config: PipelineConfig,
        background: Arc<Frame>,
        detector: Option<Arc<dyn SubjectDetector>>,
    ) -> Result<Self> {
        config.validate()?;
        if config.use_face_detection && detector.is_none() {
            return Err(GreenkeyError::InvalidConfig(
                "face detection is enabled but no detector was provided".into(),
            ));
        }
        Ok(Self {
            config,
            background,
            detector,
        })
    }

    /// Load the background and detector named by `config`.
    ///
    /// Asset failures surface here, before any image is touched.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let mut background = load_background(&config.background_image_path, config.rotation)?;
        if let Some(width) = config.background_width {
            background = resize_area(&background, width)?;
        }
        info!(
            path = %config.background_image_path.display(),
            width = background.width(),
            height = background.height(),
            "Background loaded"
        );

        let detector = load_detector(&config)?;
        Self::new(config, Arc::new(background), detector)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn background(&self) -> &Frame {
        &self.background
    }

    /// The background region that lines up pixel-for-pixel with a
    /// `width` x `height` subject: the whole background if it matches, its
    /// top-left `width` x `height` region if it is larger.
    pub fn fit_background(&self, width: usize, height: usize) -> Result<Cow<'_, Frame>> {
        let bg = self.background.as_ref();
        if bg.width() == width && bg.height() == height {
            return Ok(Cow::Borrowed(bg));
        }
        if bg.width() < width || bg.height() < height {
            return Err(GreenkeyError::DimensionMismatch {
                width,
                height,
                bg_width: bg.width(),
                bg_height: bg.height(),
            });
        }
        let rect = CropRect {
            x: 0,
            y: 0,
            width,
            height,
        };
        Ok(Cow::Owned(crop(bg, &rect)?))
    }

    /// Run every in-memory stage on a decoded capture-space frame.
    pub fn process_frame(&self, subject: &Frame) -> Result<ProcessedFrame> {
        let cfg = &self.config;
        let background = self.fit_background(subject.width(), subject.height())?;

        debug!(stage = %PipelineStage::Segmenting);
        let hsv = to_hsv(subject)?;
        let raw = backdrop_mask(&hsv, &cfg.segmentation)?;
        let matte = smooth(&raw, cfg.refine.kernel_size, cfg.refine.iterations);

        debug!(stage = %PipelineStage::Compositing, pixels = matte.count());
        let mut out = composite(subject, &background, &matte)?;

        if cfg.refine.blend_edges {
            debug!(stage = %PipelineStage::Blending);
            let ring = border(&matte, cfg.refine.border_thickness);
            out = blend(&out, &background, &ring, cfg.refine.blend_sigma)?;
        }

        let spill_pixels = if cfg.spill.enabled {
            let candidates = spill_candidate_mask(&hsv, &matte, &cfg.segmentation)?;
            debug!(stage = %PipelineStage::CorrectingSpill, pixels = candidates.count());
            out = correct(&out, &candidates, &cfg.spill.weights)?;
            candidates.count()
        } else {
            0
        };

        let face = match &self.detector {
            Some(detector) if cfg.use_face_detection => {
                debug!(stage = %PipelineStage::Locating);
                locate(
                    &out,
                    detector.as_ref(),
                    cfg.face_detection_width,
                    cfg.face_pick,
                )?
            }
            _ => None,
        };
        if cfg.use_face_detection && face.is_none() {
            debug!("No face found, framing on image center");
        }

        debug!(stage = %PipelineStage::Framing);
        let framed = framing::frame(
            &out,
            subject_center(face),
            cfg.crop_margin_width,
            cfg.crop_margin_height,
            cfg.output_width,
        )?;

        Ok(ProcessedFrame {
            frame: framed,
            face,
            backdrop_pixels: matte.count(),
            spill_pixels,
        })
    }

    /// Decode `input`, run the pipeline and write the result to `output`.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<ProcessedFrame> {
        debug!(stage = %PipelineStage::Decoding, file = %input.display());
        let subject = load_frame(input, self.config.rotation)?;

        let processed = self.process_frame(&subject)?;

        debug!(stage = %PipelineStage::Writing, file = %output.display());
        save_frame(&processed.frame, output, self.config.jpeg_quality)?;

        info!(
            file = %input.display(),
            width = processed.frame.width(),
            height = processed.frame.height(),
            face = processed.face.is_some(),
            "Image processed"
        );
        Ok(processed)
    }
}

#[cfg(feature = "face-detection")]
fn load_detector(config: &PipelineConfig) -> Result<Option<Arc<dyn SubjectDetector>>> {
    if !config.use_face_detection {
        return Ok(None);
    }
    let detector: Arc<dyn SubjectDetector> = Arc::new(
        crate::locate::RustfaceDetector::from_file(&config.face_model_path)?,
    );
    info!(model = %config.face_model_path.display(), "Face detector loaded");
    Ok(Some(detector))
}

#[cfg(not(feature = "face-detection"))]
fn load_detector(config: &PipelineConfig) -> Result<Option<Arc<dyn SubjectDetector>>> {
    if config.use_face_detection {
        return Err(GreenkeyError::InvalidConfig(
            "face detection requested but this build has no detector backend".into(),
        ));
    }
    Ok(None)
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BLEND_SIGMA, DEFAULT_BORDER_THICKNESS, DEFAULT_CROP_MARGIN_HEIGHT,
    DEFAULT_CROP_MARGIN_WIDTH, DEFAULT_EXTENSIONS, DEFAULT_FACE_DETECTION_WIDTH,
    DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_WIDTH, DEFAULT_SMOOTH_ITERATIONS, DEFAULT_SMOOTH_KERNEL,
};
use crate::error::{GreenkeyError, Result};
use crate::io::image_io::Rotation;
use crate::locate::FacePick;
use crate::segment::SegmentationConfig;
use crate::spill::SpillWeights;

/// Everything the orchestrator and batch driver need for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root of the input tree.
    pub source_dir: PathBuf,
    /// Root of the mirrored output tree.
    pub output_dir: PathBuf,
    /// Background substituted for the backdrop.
    pub background_image_path: PathBuf,
    /// Rescale the background to this width once, before the run.
    pub background_width: Option<u32>,
    /// File extensions picked up by discovery (case-insensitive, no dot).
    pub accepted_extensions: Vec<String>,
    /// Center the output crop on a detected face.
    pub use_face_detection: bool,
    /// SeetaFace frontal model used when face detection is enabled.
    pub face_model_path: PathBuf,
    /// Width the image is downscaled to before detection.
    pub face_detection_width: u32,
    /// Tie-break when several faces are found.
    pub face_pick: FacePick,
    /// Half-width of the output crop as a fraction of image width.
    pub crop_margin_width: f32,
    /// Half-height of the output crop as a fraction of image height.
    pub crop_margin_height: f32,
    /// Output width in pixels; height follows the crop's aspect ratio.
    pub output_width: u32,
    /// Rotation applied to subject and background after decode.
    pub rotation: Rotation,
    /// JPEG quality (1-100) for `.jpg`/`.jpeg` outputs.
    pub jpeg_quality: u8,
    /// Worker threads; `None` uses all available cores.
    pub threads: Option<usize>,
    pub segmentation: SegmentationConfig,
    pub refine: RefineConfig,
    pub spill: SpillConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("photos"),
            output_dir: PathBuf::from("output"),
            background_image_path: PathBuf::from("bg.jpg"),
            background_width: None,
            accepted_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            use_face_detection: false,
            face_model_path: PathBuf::from("models/seeta_fd_frontal_v1.0.bin"),
            face_detection_width: DEFAULT_FACE_DETECTION_WIDTH,
            face_pick: FacePick::default(),
            crop_margin_width: DEFAULT_CROP_MARGIN_WIDTH,
            crop_margin_height: DEFAULT_CROP_MARGIN_HEIGHT,
            output_width: DEFAULT_OUTPUT_WIDTH,
            rotation: Rotation::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            threads: None,
            segmentation: SegmentationConfig::default(),
            refine: RefineConfig::default(),
            spill: SpillConfig::default(),
        }
    }
}

/// Matte smoothing and edge blending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefineConfig {
    /// Side of the square structuring element (odd).
    #[serde(default = "default_kernel_size")]
    pub kernel_size: usize,
    /// Opening passes.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Border ring thickness in pixels.
    #[serde(default = "default_border_thickness")]
    pub border_thickness: usize,
    /// Gaussian sigma that softens the border ring.
    #[serde(default = "default_blend_sigma")]
    pub blend_sigma: f32,
    /// Blend the border ring after hard replacement.
    #[serde(default = "default_true")]
    pub blend_edges: bool,
}

fn default_kernel_size() -> usize {
    DEFAULT_SMOOTH_KERNEL
}
fn default_iterations() -> usize {
    DEFAULT_SMOOTH_ITERATIONS
}
fn default_border_thickness() -> usize {
    DEFAULT_BORDER_THICKNESS
}
fn default_blend_sigma() -> f32 {
    DEFAULT_BLEND_SIGMA
}
fn default_true() -> bool {
    true
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_SMOOTH_KERNEL,
            iterations: DEFAULT_SMOOTH_ITERATIONS,
            border_thickness: DEFAULT_BORDER_THICKNESS,
            blend_sigma: DEFAULT_BLEND_SIGMA,
            blend_edges: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpillConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub weights: SpillWeights,
}

impl Default for SpillConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weights: SpillWeights::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GreenkeyError::InvalidConfig(msg));

        for (name, margin) in [
            ("crop_margin_width", self.crop_margin_width),
            ("crop_margin_height", self.crop_margin_height),
        ] {
            if !(margin > 0.0 && margin <= 0.5) {
                return invalid(format!("{name} must be in (0, 0.5], got {margin}"));
            }
        }
        if self.output_width == 0 {
            return invalid("output_width must be > 0".into());
        }
        if self.face_detection_width == 0 {
            return invalid("face_detection_width must be > 0".into());
        }
        if self.background_width == Some(0) {
            return invalid("background_width must be > 0".into());
        }
        if self.accepted_extensions.is_empty() {
            return invalid("accepted_extensions must not be empty".into());
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return invalid(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            ));
        }
        if self.threads == Some(0) {
            return invalid("threads must be > 0".into());
        }
        if self.refine.kernel_size % 2 == 0 {
            return invalid(format!(
                "refine.kernel_size must be odd, got {}",
                self.refine.kernel_size
            ));
        }
        if self.refine.blend_edges && !(self.refine.blend_sigma > 0.0) {
            return invalid(format!(
                "refine.blend_sigma must be > 0, got {}",
                self.refine.blend_sigma
            ));
        }
        let w = &self.spill.weights;
        if [w.blue, w.green, w.red].iter().any(|v| *v < 0.0) {
            return invalid("spill weights must be non-negative".into());
        }
        Ok(())
    }

    /// Whether `path` has one of the accepted extensions.
    pub fn accepts(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.accepted_extensions
                    .iter()
                    .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

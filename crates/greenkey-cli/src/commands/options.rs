use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use greenkey_core::io::image_io::Rotation;
use greenkey_core::locate::FacePick;
use greenkey_core::pipeline::PipelineConfig;
use greenkey_core::spill::SpillWeights;

#[derive(Clone, Copy, ValueEnum)]
pub enum FacePickArg {
    /// First face reported by the detector
    First,
    /// Largest face
    Largest,
    /// Face closest to the image center
    Centered,
}

impl From<FacePickArg> for FacePick {
    fn from(arg: FacePickArg) -> Self {
        match arg {
            FacePickArg::First => FacePick::First,
            FacePickArg::Largest => FacePick::Largest,
            FacePickArg::Centered => FacePick::MostCentered,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RotateArg {
    None,
    Cw,
    Ccw,
    Half,
}

impl From<RotateArg> for Rotation {
    fn from(arg: RotateArg) -> Self {
        match arg {
            RotateArg::None => Rotation::None,
            RotateArg::Cw => Rotation::Clockwise90,
            RotateArg::Ccw => Rotation::CounterClockwise90,
            RotateArg::Half => Rotation::Half,
        }
    }
}

/// Options shared by every command that runs the pipeline.
///
/// Flags override values loaded from `--config`.
#[derive(Args)]
pub struct PipelineArgs {
    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Background image
    #[arg(short, long)]
    pub background: Option<PathBuf>,

    /// Rescale the background to this width before processing
    #[arg(long)]
    pub background_width: Option<u32>,

    /// Center the crop on a detected face
    #[arg(long)]
    pub face_detection: bool,

    /// SeetaFace frontal model file
    #[arg(long)]
    pub face_model: Option<PathBuf>,

    /// Which face wins when several are detected
    #[arg(long, value_enum)]
    pub face_pick: Option<FacePickArg>,

    /// Width the image is downscaled to for face detection
    #[arg(long)]
    pub detection_width: Option<u32>,

    /// Crop half-width as a fraction of image width (0-0.5)
    #[arg(long)]
    pub margin_width: Option<f32>,

    /// Crop half-height as a fraction of image height (0-0.5)
    #[arg(long)]
    pub margin_height: Option<f32>,

    /// Output width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Rotate input and background after decoding
    #[arg(long, value_enum)]
    pub rotate: Option<RotateArg>,

    /// Replace green with the blue/red average instead of a partial correction
    #[arg(long)]
    pub full_spill: bool,

    /// Disable spill correction
    #[arg(long)]
    pub no_spill: bool,

    /// Disable edge blending
    #[arg(long)]
    pub no_blend: bool,

    /// JPEG output quality (1-100)
    #[arg(long)]
    pub jpeg_quality: Option<u8>,
}

impl PipelineArgs {
    /// Load `--config` (or the defaults) and apply the flag overrides.
    pub fn load(&self) -> Result<PipelineConfig> {
        let mut config: PipelineConfig = if let Some(ref path) = self.config {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid pipeline config")?
        } else {
            PipelineConfig::default()
        };

        if let Some(ref bg) = self.background {
            config.background_image_path = bg.clone();
        }
        if self.background_width.is_some() {
            config.background_width = self.background_width;
        }
        if self.face_detection {
            config.use_face_detection = true;
        }
        if let Some(ref model) = self.face_model {
            config.face_model_path = model.clone();
        }
        if let Some(pick) = self.face_pick {
            config.face_pick = pick.into();
        }
        if let Some(w) = self.detection_width {
            config.face_detection_width = w;
        }
        if let Some(m) = self.margin_width {
            config.crop_margin_width = m;
        }
        if let Some(m) = self.margin_height {
            config.crop_margin_height = m;
        }
        if let Some(w) = self.width {
            config.output_width = w;
        }
        if let Some(r) = self.rotate {
            config.rotation = r.into();
        }
        if self.full_spill {
            config.spill.weights = SpillWeights::FULL;
        }
        if self.no_spill {
            config.spill.enabled = false;
        }
        if self.no_blend {
            config.refine.blend_edges = false;
        }
        if let Some(q) = self.jpeg_quality {
            config.jpeg_quality = q;
        }

        Ok(config)
    }
}

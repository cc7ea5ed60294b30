use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use greenkey_core::color::bgr_to_hsv;
use greenkey_core::io::image_io::{load_frame, Rotation};
use greenkey_core::pipeline::PipelineConfig;

use super::options::RotateArg;

#[derive(Args)]
pub struct ProbeArgs {
    /// Image to inspect
    pub file: PathBuf,

    /// Column (x) of the pixel
    pub x: usize,

    /// Row (y) of the pixel
    pub y: usize,

    /// Rotate the image after decoding, as the pipeline would
    #[arg(long, value_enum)]
    pub rotate: Option<RotateArg>,

    /// Pipeline config file whose thresholds are checked
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &ProbeArgs) -> Result<()> {
    let config: PipelineConfig = if let Some(ref path) = args.config {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        PipelineConfig::default()
    };
    let rotation = args.rotate.map(Rotation::from).unwrap_or(config.rotation);

    let frame = load_frame(&args.file, rotation)?;
    if args.x >= frame.width() || args.y >= frame.height() {
        bail!(
            "({}, {}) is outside the {}x{} image",
            args.x,
            args.y,
            frame.width(),
            frame.height()
        );
    }

    let bgr = frame.pixel(args.y, args.x);
    let hsv = bgr_to_hsv(bgr);
    let matching = config.segmentation.matching(hsv);

    println!("Pixel ({}, {}) of {}", args.x, args.y, args.file.display());
    println!("  BGR:       {:?}", bgr);
    println!("  HSV:       {:?}", hsv);
    if matching.is_empty() {
        println!("  Matches:   none");
    } else {
        let names: Vec<String> = matching.iter().map(|c| c.to_string()).collect();
        println!("  Matches:   {}", names.join(", "));
    }

    Ok(())
}

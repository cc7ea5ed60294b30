use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use greenkey_core::pipeline::Orchestrator;

use super::options::PipelineArgs;

#[derive(Args)]
pub struct ImageArgs {
    /// Input image
    pub input: PathBuf,

    /// Output image (format chosen from the extension)
    pub output: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

pub fn run(args: &ImageArgs) -> Result<()> {
    let config = args.pipeline.load()?;
    let orchestrator =
        Orchestrator::from_config(config).context("Failed to prepare the pipeline")?;

    let processed = orchestrator
        .process_file(&args.input, &args.output)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    println!(
        "Processed {} -> {} ({}x{})",
        args.input.display(),
        args.output.display(),
        processed.frame.width(),
        processed.frame.height()
    );
    println!("  Backdrop:  {} px replaced", processed.backdrop_pixels);
    println!("  Spill:     {} px corrected", processed.spill_pixels);
    match processed.face {
        Some(face) => println!(
            "  Face:      {}x{} at ({}, {})",
            face.width, face.height, face.left, face.top
        ),
        None if orchestrator.config().use_face_detection => {
            println!("  Face:      none found, centered crop")
        }
        None => {}
    }

    Ok(())
}

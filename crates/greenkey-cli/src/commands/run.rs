use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use greenkey_core::batch::{run_batch, BatchEvent, BatchReporter, BatchSummary};
use greenkey_core::pipeline::Orchestrator;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use super::options::PipelineArgs;
use crate::summary::{print_batch_summary, print_pipeline_summary};

#[derive(Args)]
pub struct RunArgs {
    /// Directory tree of input images
    pub source: Option<PathBuf>,

    /// Output directory (relative paths are mirrored)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Worker threads (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Drives an indicatif bar and prints one line per finished image.
struct ConsoleReporter {
    pb: ProgressBar,
}

impl ConsoleReporter {
    fn new() -> Result<Self> {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg:12} [{bar:40}] {pos}/{len} ({eta})")?
                .progress_chars("=> "),
        );
        pb.set_message("Processing");
        Ok(Self { pb })
    }
}

impl BatchReporter for ConsoleReporter {
    fn started(&self, total: usize) {
        self.pb.set_length(total as u64);
    }

    fn item_finished(&self, event: &BatchEvent, done: usize, total: usize) {
        self.pb.set_position(done as u64);
        match event {
            BatchEvent::Processed { name, .. } => {
                self.pb
                    .println(format!("Processed {name} [{done}/{total}]"));
            }
            BatchEvent::Skipped { name, .. } => {
                self.pb
                    .println(format!("Skipped {name}, output exists [{done}/{total}]"));
            }
            BatchEvent::Failed { name, error } => {
                self.pb.println(format!("Failed {name}: {error}"));
            }
        }
    }

    fn finished(&self, _summary: &BatchSummary) {
        self.pb.finish_and_clear();
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = args.pipeline.load()?;
    if let Some(ref source) = args.source {
        config.source_dir = source.clone();
    }
    if let Some(ref output) = args.output {
        config.output_dir = output.clone();
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }

    print_pipeline_summary(&config);
    debug!(?config, "resolved pipeline config");

    let orchestrator =
        Orchestrator::from_config(config).context("Failed to prepare the pipeline")?;
    let reporter = ConsoleReporter::new()?;
    let summary = run_batch(&orchestrator, &reporter)?;

    println!("Done");
    print_batch_summary(&summary);

    if summary.has_failures() {
        bail!("{} of {} image(s) failed", summary.failed, summary.total);
    }
    Ok(())
}

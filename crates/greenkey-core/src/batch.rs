//! Batch driver: discover inputs, fan the orchestrator out over a worker
//! pool, and report completions through a single aggregator.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{GreenkeyError, Result};
use crate::pipeline::{Orchestrator, PipelineConfig};

/// Completion report for one input, sent from a worker to the aggregator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchEvent {
    Processed { name: String, output: PathBuf },
    /// The output already existed; the input was not touched.
    Skipped { name: String, output: PathBuf },
    Failed { name: String, error: String },
}

impl BatchEvent {
    pub fn name(&self) -> &str {
        match self {
            Self::Processed { name, .. } | Self::Skipped { name, .. } | Self::Failed { name, .. } => {
                name
            }
        }
    }
}

/// Totals for a finished batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    fn record(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Processed { .. } => self.processed += 1,
            BatchEvent::Skipped { .. } => self.skipped += 1,
            BatchEvent::Failed { .. } => self.failed += 1,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Receives batch progress on the calling thread. All methods default to no-ops.
pub trait BatchReporter {
    /// Discovery finished with `total` inputs.
    fn started(&self, _total: usize) {}

    /// One input finished; `done` counts every finished input so far.
    fn item_finished(&self, _event: &BatchEvent, _done: usize, _total: usize) {}

    fn finished(&self, _summary: &BatchSummary) {}
}

/// Reporter that ignores everything.
pub struct NoOpReporter;
impl BatchReporter for NoOpReporter {}

/// Every file under `root` whose extension is accepted by `config`, sorted.
///
/// The configured output directory is pruned from the walk when it lies
/// inside `root`, so earlier results are never picked up as inputs.
pub fn discover_inputs(root: &Path, config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(GreenkeyError::InvalidConfig(format!(
            "source directory {} does not exist",
            root.display()
        )));
    }

    let output_root = fs::canonicalize(&config.output_dir).ok();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| match &output_root {
            Some(out) if entry.depth() > 0 && entry.file_type().is_dir() => {
                fs::canonicalize(entry.path()).map_or(true, |p| &p != out)
            }
            _ => true,
        });

    let mut inputs = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() && config.accepts(entry.path()) {
            inputs.push(entry.into_path());
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Mirror `input`'s path relative to `source_root` under `output_root`.
pub fn output_path_for(input: &Path, source_root: &Path, output_root: &Path) -> PathBuf {
    match input.strip_prefix(source_root) {
        Ok(relative) => output_root.join(relative),
        Err(_) => output_root.join(input.file_name().unwrap_or(input.as_os_str())),
    }
}

fn display_name(input: &Path, source_root: &Path) -> String {
    input
        .strip_prefix(source_root)
        .unwrap_or(input)
        .display()
        .to_string()
}

fn process_one(orchestrator: &Orchestrator, input: &Path) -> BatchEvent {
    let config = orchestrator.config();
    let name = display_name(input, &config.source_dir);
    let output = output_path_for(input, &config.source_dir, &config.output_dir);

    if output.exists() {
        return BatchEvent::Skipped { name, output };
    }

    match orchestrator.process_file(input, &output) {
        Ok(_) => BatchEvent::Processed { name, output },
        Err(e) => {
            debug!(file = %input.display(), error = %e, "Image failed");
            BatchEvent::Failed {
                name,
                error: e.to_string(),
            }
        }
    }
}

/// Process every input under the configured source directory.
///
/// Workers run on a dedicated Rayon pool and send one [`BatchEvent`] each
/// through a channel; the calling thread owns the completion counter and
/// drives `reporter`. Per-image failures never abort the batch. Inputs whose
/// output already exists are skipped, so an interrupted run can be resumed.
pub fn run_batch(orchestrator: &Orchestrator, reporter: &dyn BatchReporter) -> Result<BatchSummary> {
    let config = orchestrator.config();
    let inputs = discover_inputs(&config.source_dir, config)?;
    let total = inputs.len();
    info!(total, source = %config.source_dir.display(), "Inputs discovered");
    reporter.started(total);

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = config.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|e| GreenkeyError::ThreadPool(e.to_string()))?;

    let mut summary = BatchSummary {
        total,
        ..Default::default()
    };
    let (tx, rx) = mpsc::channel::<BatchEvent>();

    std::thread::scope(|scope| {
        scope.spawn(move || {
            pool.install(|| {
                inputs.par_iter().for_each_with(tx, |tx, input| {
                    // The receiver outlives every worker.
                    let _ = tx.send(process_one(orchestrator, input));
                });
            });
        });

        for (i, event) in rx.iter().enumerate() {
            summary.record(&event);
            reporter.item_finished(&event, i + 1, total);
        }
    });

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Batch finished"
    );
    reporter.finished(&summary);
    Ok(summary)
}

pub mod config;
mod orchestrator;
mod types;

pub use config::{PipelineConfig, RefineConfig, SpillConfig};
pub use orchestrator::Orchestrator;
pub use types::{PipelineStage, ProcessedFrame};

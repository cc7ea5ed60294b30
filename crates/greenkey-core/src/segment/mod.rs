pub mod config;
pub mod threshold;

pub use config::{Criterion, HsvRange, SegmentationConfig};
pub use threshold::{backdrop_mask, in_range, segment, spill_candidate_mask};

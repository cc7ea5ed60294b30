use crate::frame::{BoundingBox, Frame};

/// Pipeline processing stage, used for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Decoding,
    Segmenting,
    Compositing,
    Blending,
    CorrectingSpill,
    Locating,
    Framing,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decoding => write!(f, "Decoding"),
            Self::Segmenting => write!(f, "Segmenting backdrop"),
            Self::Compositing => write!(f, "Compositing"),
            Self::Blending => write!(f, "Blending edges"),
            Self::CorrectingSpill => write!(f, "Correcting spill"),
            Self::Locating => write!(f, "Locating subject"),
            Self::Framing => write!(f, "Framing"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Result of running the pipeline on one image.
#[derive(Clone, Debug)]
pub struct ProcessedFrame {
    /// Final, framed and resized image.
    pub frame: Frame,
    /// Face used for framing, in full-resolution input coordinates.
    pub face: Option<BoundingBox>,
    /// Pixels replaced by the background.
    pub backdrop_pixels: usize,
    /// Pixels whose spill was corrected.
    pub spill_pixels: usize,
}

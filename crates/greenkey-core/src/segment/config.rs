use serde::{Deserialize, Serialize};

/// Inclusive per-channel bounds on an 8-bit HSV pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    /// Lower bounds `[h, s, v]`.
    pub lower: [u8; 3],
    /// Upper bounds `[h, s, v]`.
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// True when every channel of `px` lies within its bounds.
    #[inline]
    pub fn contains(&self, px: [u8; 3]) -> bool {
        (px[0] >= self.lower[0])
            & (px[0] <= self.upper[0])
            & (px[1] >= self.lower[1])
            & (px[1] <= self.upper[1])
            & (px[2] >= self.lower[2])
            & (px[2] <= self.upper[2])
    }
}

/// Named pixel classification criterion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Criterion {
    /// Evenly lit backdrop.
    Backdrop,
    /// Backdrop under the subject's shadow: higher saturation, lower value.
    ShadowedBackdrop,
    /// Backdrop blown out by direct light: lower saturation, higher value.
    OverexposedBackdrop,
    /// Skin tones and spill-contaminated skin. Overlaps the backdrop hues.
    SpillCandidate,
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backdrop => write!(f, "backdrop"),
            Self::ShadowedBackdrop => write!(f, "shadowed backdrop"),
            Self::OverexposedBackdrop => write!(f, "overexposed backdrop"),
            Self::SpillCandidate => write!(f, "spill candidate"),
        }
    }
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Backdrop,
        Criterion::ShadowedBackdrop,
        Criterion::OverexposedBackdrop,
        Criterion::SpillCandidate,
    ];
}

pub const BACKDROP_RANGE: HsvRange = HsvRange::new([45, 100, 70], [100, 255, 255]);
pub const SHADOWED_BACKDROP_RANGE: HsvRange = HsvRange::new([45, 229, 35], [100, 255, 150]);
pub const OVEREXPOSED_BACKDROP_RANGE: HsvRange = HsvRange::new([45, 75, 230], [100, 110, 255]);
pub const SPILL_CANDIDATE_RANGE: HsvRange = HsvRange::new([15, 10, 10], [85, 255, 255]);

/// Threshold boxes for every criterion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    #[serde(default = "default_backdrop")]
    pub backdrop: HsvRange,
    #[serde(default = "default_shadowed")]
    pub shadowed_backdrop: HsvRange,
    #[serde(default = "default_overexposed")]
    pub overexposed_backdrop: HsvRange,
    #[serde(default = "default_spill")]
    pub spill_candidate: HsvRange,
}

fn default_backdrop() -> HsvRange {
    BACKDROP_RANGE
}
fn default_shadowed() -> HsvRange {
    SHADOWED_BACKDROP_RANGE
}
fn default_overexposed() -> HsvRange {
    OVEREXPOSED_BACKDROP_RANGE
}
fn default_spill() -> HsvRange {
    SPILL_CANDIDATE_RANGE
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            backdrop: BACKDROP_RANGE,
            shadowed_backdrop: SHADOWED_BACKDROP_RANGE,
            overexposed_backdrop: OVEREXPOSED_BACKDROP_RANGE,
            spill_candidate: SPILL_CANDIDATE_RANGE,
        }
    }
}

impl SegmentationConfig {
    pub fn range(&self, criterion: Criterion) -> HsvRange {
        match criterion {
            Criterion::Backdrop => self.backdrop,
            Criterion::ShadowedBackdrop => self.shadowed_backdrop,
            Criterion::OverexposedBackdrop => self.overexposed_backdrop,
            Criterion::SpillCandidate => self.spill_candidate,
        }
    }

    /// Criteria whose range contains `hsv`.
    pub fn matching(&self, hsv: [u8; 3]) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|c| self.range(*c).contains(hsv))
            .collect()
    }
}

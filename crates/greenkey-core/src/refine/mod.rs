pub mod morphology;

pub use morphology::{border, dilate, erode, smooth};

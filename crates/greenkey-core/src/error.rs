use std::path::PathBuf;

use thiserror::Error;

use crate::frame::ColorSpace;

#[derive(Error, Debug)]
pub enum GreenkeyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height} with {channels} channel(s)")]
    InvalidDimensions {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("Failed to load asset {path}: {reason}")]
    Asset { path: PathBuf, reason: String },

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error(
        "Background is {bg_width}x{bg_height} but {width}x{height} is required"
    )]
    DimensionMismatch {
        width: usize,
        height: usize,
        bg_width: usize,
        bg_height: usize,
    },

    #[error("Failed to write {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("Expected a frame in {expected} space, got {found}")]
    ColorSpaceMismatch {
        expected: ColorSpace,
        found: ColorSpace,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl GreenkeyError {
    /// Whether this error must abort a whole batch rather than a single image.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Asset { .. } | Self::InvalidConfig(_) | Self::ThreadPool(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GreenkeyError>;

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, ImageFormat, Rgb, RgbImage};
use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::error::{GreenkeyError, Result};
use crate::frame::{ColorSpace, Frame, BLUE, CHANNELS, GREEN, RED};

/// Rotation applied right after decode. Capture devices often store frames
/// rotated and rely on metadata to display them upright.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    CounterClockwise90,
    Half,
}

impl Rotation {
    pub fn apply(self, img: RgbImage) -> RgbImage {
        match self {
            Self::None => img,
            Self::Clockwise90 => image::imageops::rotate90(&img),
            Self::CounterClockwise90 => image::imageops::rotate270(&img),
            Self::Half => image::imageops::rotate180(&img),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Clockwise90 => write!(f, "90° CW"),
            Self::CounterClockwise90 => write!(f, "90° CCW"),
            Self::Half => write!(f, "180°"),
        }
    }
}

/// Convert an RGB buffer into a capture-order (B, G, R) frame.
pub fn frame_from_rgb(img: &RgbImage) -> Result<Frame> {
    let (w, h) = img.dimensions();
    let mut data = Array3::<u8>::zeros((h as usize, w as usize, CHANNELS));
    for (x, y, px) in img.enumerate_pixels() {
        let [r, g, b] = px.0;
        let (row, col) = (y as usize, x as usize);
        data[[row, col, BLUE]] = b;
        data[[row, col, GREEN]] = g;
        data[[row, col, RED]] = r;
    }
    Frame::new(data, ColorSpace::Capture)
}

/// Convert a capture-space frame back into an RGB buffer.
pub fn frame_to_rgb(frame: &Frame) -> Result<RgbImage> {
    frame.require_space(ColorSpace::Capture)?;
    let data = frame.data();
    Ok(RgbImage::from_fn(
        frame.width() as u32,
        frame.height() as u32,
        |x, y| {
            let (row, col) = (y as usize, x as usize);
            Rgb([
                data[[row, col, RED]],
                data[[row, col, GREEN]],
                data[[row, col, BLUE]],
            ])
        },
    ))
}

/// Decode an in-memory raster file. `path` only labels errors.
pub fn decode_frame(bytes: &[u8], path: &Path, rotation: Rotation) -> Result<Frame> {
    let decoded = image::load_from_memory(bytes).map_err(|e| GreenkeyError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    frame_from_rgb(&rotation.apply(decoded.to_rgb8()))
}

/// Read and decode a raster file from disk.
pub fn load_frame(path: &Path, rotation: Rotation) -> Result<Frame> {
    let bytes = fs::read(path).map_err(|e| GreenkeyError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    decode_frame(&bytes, path, rotation)
}

/// Encode a frame in `format`. `jpeg_quality` (1-100) only affects JPEG.
pub fn encode_frame(frame: &Frame, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let rgb = frame_to_rgb(frame)?;
    let mut buffer = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality.clamp(1, 100)).write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )?;
        }
        other => rgb.write_to(&mut Cursor::new(&mut buffer), other)?,
    }
    Ok(buffer)
}

/// Sibling path used while a write is in flight.
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.partial"))
}

/// Encode and write a frame, choosing the format from the file extension.
///
/// Parent directories are created on demand. The bytes land in a temporary
/// sibling first and are renamed into place, so `path` either does not exist
/// or holds a complete file.
pub fn save_frame(frame: &Frame, path: &Path, jpeg_quality: u8) -> Result<()> {
    let encode_error = |reason: String| GreenkeyError::Encode {
        path: path.to_path_buf(),
        reason,
    };

    let format = ImageFormat::from_path(path).map_err(|e| encode_error(e.to_string()))?;
    let bytes = encode_frame(frame, format, jpeg_quality).map_err(|e| encode_error(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| encode_error(e.to_string()))?;
    }
    let tmp = partial_path(path);
    if let Err(e) = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(encode_error(e.to_string()));
    }
    Ok(())
}

/// Load the shared background. Any failure is an asset error.
pub fn load_background(path: &Path, rotation: Rotation) -> Result<Frame> {
    load_frame(path, rotation).map_err(|e| GreenkeyError::Asset {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

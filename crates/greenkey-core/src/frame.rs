use ndarray::{Array3, ArrayView3, ArrayViewMut3};

use crate::error::{GreenkeyError, Result};

/// Number of channels per pixel.
pub const CHANNELS: usize = 3;

/// Channel index of the blue-like component in capture space.
pub const BLUE: usize = 0;
/// Channel index of the green-like component in capture space.
pub const GREEN: usize = 1;
/// Channel index of the red-like component in capture space.
pub const RED: usize = 2;

/// Color representation of a frame's pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    /// Raw capture order: channel 0 = blue, 1 = green, 2 = red.
    Capture,
    /// Hue (0..180), saturation (0..=255), value (0..=255).
    Hsv,
}

impl std::fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Capture => write!(f, "capture"),
            Self::Hsv => write!(f, "HSV"),
        }
    }
}

/// A dense 8-bit three-channel image.
///
/// Pixel data has shape `(height, width, 3)`. The dimensions are fixed at
/// construction: pixel values may be rewritten through [`Frame::data_mut`],
/// but the grid itself cannot be reshaped.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Array3<u8>,
    space: ColorSpace,
}

impl Frame {
    pub fn new(data: Array3<u8>, space: ColorSpace) -> Result<Self> {
        let (h, w, c) = data.dim();
        if h == 0 || w == 0 || c != CHANNELS {
            return Err(GreenkeyError::InvalidDimensions {
                width: w,
                height: h,
                channels: c,
            });
        }
        Ok(Self { data, space })
    }

    /// A capture-space frame with every pixel set to `pixel` (B, G, R).
    pub fn filled(height: usize, width: usize, pixel: [u8; 3]) -> Result<Self> {
        let data = Array3::from_shape_fn((height, width, CHANNELS), |(_, _, ch)| pixel[ch]);
        Self::new(data, ColorSpace::Capture)
    }

    /// A capture-space frame built from a per-pixel function of `(row, col)`.
    pub fn from_fn<F>(height: usize, width: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> [u8; 3],
    {
        let mut data = Array3::<u8>::zeros((height, width, CHANNELS));
        for row in 0..height {
            for col in 0..width {
                let px = f(row, col);
                for ch in 0..CHANNELS {
                    data[[row, col, ch]] = px[ch];
                }
            }
        }
        Self::new(data, ColorSpace::Capture)
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    pub fn data(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn data_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        self.data.view_mut()
    }

    pub fn into_data(self) -> Array3<u8> {
        self.data
    }

    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        [
            self.data[[row, col, 0]],
            self.data[[row, col, 1]],
            self.data[[row, col, 2]],
        ]
    }

    pub fn set_pixel(&mut self, row: usize, col: usize, px: [u8; 3]) {
        for (ch, v) in px.into_iter().enumerate() {
            self.data[[row, col, ch]] = v;
        }
    }

    /// Fail unless this frame is in `expected` space.
    pub fn require_space(&self, expected: ColorSpace) -> Result<()> {
        if self.space != expected {
            return Err(GreenkeyError::ColorSpaceMismatch {
                expected,
                found: self.space,
            });
        }
        Ok(())
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl BoundingBox {
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Center as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            self.left as f64 + self.width as f64 / 2.0,
            self.top as f64 + self.height as f64 / 2.0,
        )
    }

    /// Intersect with `[0, width) x [0, height)`. Returns `None` if nothing remains.
    pub fn clamped(&self, width: usize, height: usize) -> Option<BoundingBox> {
        let right = (self.left + self.width).min(width);
        let bottom = (self.top + self.height).min(height);
        if self.left >= right || self.top >= bottom {
            return None;
        }
        Some(BoundingBox {
            left: self.left,
            top: self.top,
            width: right - self.left,
            height: bottom - self.top,
        })
    }
}

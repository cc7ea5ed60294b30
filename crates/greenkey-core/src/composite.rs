use ndarray::{Array2, Axis, Zip};

use crate::error::{GreenkeyError, Result};
use crate::filters::gaussian_blur::gaussian_blur_array;
use crate::frame::{ColorSpace, Frame};
use crate::mask::Mask;

fn check_shapes(subject: &Frame, background: &Frame, mask: &Mask) -> Result<()> {
    subject.require_space(ColorSpace::Capture)?;
    background.require_space(ColorSpace::Capture)?;
    let (w, h) = (subject.width(), subject.height());
    if background.width() != w || background.height() != h {
        return Err(GreenkeyError::DimensionMismatch {
            width: w,
            height: h,
            bg_width: background.width(),
            bg_height: background.height(),
        });
    }
    if mask.width() != w || mask.height() != h {
        return Err(GreenkeyError::InvalidDimensions {
            width: mask.width(),
            height: mask.height(),
            channels: 1,
        });
    }
    Ok(())
}

/// Replace every masked subject pixel with the background pixel at the same
/// coordinates. Unmasked pixels are copied unchanged.
pub fn composite(subject: &Frame, background: &Frame, mask: &Mask) -> Result<Frame> {
    check_shapes(subject, background, mask)?;

    let mut out = subject.clone();
    Zip::from(out.data_mut().lanes_mut(Axis(2)))
        .and(background.data().lanes(Axis(2)))
        .and(&mask.data)
        .for_each(|mut dst, src, &selected| {
            if selected {
                dst.assign(&src);
            }
        });
    Ok(out)
}

/// Soft alpha for a border ring: the ring is Gaussian-smoothed and the result
/// kept only on ring pixels, so nothing outside the ring is touched.
pub fn blend_alpha(border: &Mask, sigma: f32) -> Array2<f32> {
    let mut alpha = gaussian_blur_array(&border.to_alpha(), sigma);
    Zip::from(&mut alpha).and(&border.data).for_each(|a, &on| {
        *a = if on { a.clamp(0.0, 1.0) } else { 0.0 };
    });
    alpha
}

/// Linear blend `(1 - a) * subject + a * background` over the border ring,
/// where `a` is [`blend_alpha`] of `border`.
pub fn blend(subject: &Frame, background: &Frame, border: &Mask, sigma: f32) -> Result<Frame> {
    check_shapes(subject, background, border)?;
    let alpha = blend_alpha(border, sigma);

    let mut out = subject.clone();
    Zip::from(out.data_mut().lanes_mut(Axis(2)))
        .and(background.data().lanes(Axis(2)))
        .and(&alpha)
        .for_each(|mut dst, src, &a| {
            if a <= 0.0 {
                return;
            }
            for ch in 0..dst.len() {
                let mixed = (1.0 - a) * dst[ch] as f32 + a * src[ch] as f32;
                dst[ch] = mixed.round().clamp(0.0, 255.0) as u8;
            }
        });
    Ok(out)
}

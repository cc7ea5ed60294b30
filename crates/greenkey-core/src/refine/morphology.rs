use ndarray::{Array2, Axis};

use crate::mask::Mask;

/// Morphological opening (erosion followed by dilation) with a square
/// structuring element of side `kernel_size`, repeated `iterations` times.
///
/// Removes isolated speckles smaller than the kernel while preserving larger
/// regions. A kernel of size 0 or 1, or zero iterations, leaves the mask
/// unchanged.
pub fn smooth(mask: &Mask, kernel_size: usize, iterations: usize) -> Mask {
    let mut current = mask.clone();
    if kernel_size <= 1 {
        return current;
    }
    for _ in 0..iterations {
        let eroded = erode(&current, kernel_size);
        current = dilate(&eroded, kernel_size);
    }
    current
}

/// Outer contour ring of every selected region, `thickness` pixels wide.
///
/// The ring consists of unselected pixels within `thickness` (Chebyshev
/// distance) of a selected pixel. The image edge does not count as a region
/// boundary, so a mask covering the whole frame has an empty ring.
pub fn border(mask: &Mask, thickness: usize) -> Mask {
    if thickness == 0 {
        return Mask::empty(mask.height(), mask.width());
    }
    let grown = dilate(mask, 2 * thickness + 1);
    grown.difference(mask)
}

/// Binary erosion: a pixel stays true only if all in-bounds pixels of its
/// `kernel_size` square neighborhood are true.
pub fn erode(mask: &Mask, kernel_size: usize) -> Mask {
    let radius = kernel_size / 2;
    let rows = sweep(&mask.data, radius, Axis(1), true);
    Mask::new(sweep(&rows, radius, Axis(0), true))
}

/// Binary dilation: a pixel becomes true if any in-bounds pixel of its
/// `kernel_size` square neighborhood is true.
pub fn dilate(mask: &Mask, kernel_size: usize) -> Mask {
    let radius = kernel_size / 2;
    let rows = sweep(&mask.data, radius, Axis(1), false);
    Mask::new(sweep(&rows, radius, Axis(0), false))
}

/// One separable pass of a square min/max filter along `axis`.
///
/// With `all = true` the output is the AND over the window (erosion),
/// otherwise the OR (dilation). Out-of-bounds neighbors are skipped.
fn sweep(data: &Array2<bool>, radius: usize, axis: Axis, all: bool) -> Array2<bool> {
    let mut result = data.clone();
    if radius == 0 {
        return result;
    }

    for (src, mut dst) in data.lanes(axis).into_iter().zip(result.lanes_mut(axis)) {
        let len = src.len();
        for i in 0..len {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius).min(len - 1);
            let window = src.slice(ndarray::s![lo..=hi]);
            dst[i] = if all {
                window.iter().all(|&v| v)
            } else {
                window.iter().any(|&v| v)
            };
        }
    }

    result
}

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Zip};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Apply a Gaussian blur to a raw array using separable 1D convolution.
///
/// Edges are handled by clamping to the nearest in-bounds sample.
/// A non-positive `sigma` returns the input unchanged.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    if sigma <= 0.0 {
        return data.clone();
    }
    let kernel = make_gaussian_kernel(sigma);
    let row_pass = convolve_axis(data, &kernel, Axis(1));
    convolve_axis(&row_pass, &kernel, Axis(0))
}

fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

fn convolve_axis(data: &Array2<f32>, kernel: &[f32], axis: Axis) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));
    let zip = Zip::from(result.lanes_mut(axis)).and(data.lanes(axis));

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        zip.par_for_each(|dst, src| convolve_lane(kernel, dst, src));
    } else {
        zip.for_each(|dst, src| convolve_lane(kernel, dst, src));
    }

    result
}

fn convolve_lane(kernel: &[f32], mut dst: ArrayViewMut1<f32>, src: ArrayView1<f32>) {
    let len = src.len() as isize;
    let radius = (kernel.len() / 2) as isize;
    for i in 0..len {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let j = (i + ki as isize - radius).clamp(0, len - 1);
            sum += src[j as usize] * kv;
        }
        dst[i as usize] = sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = make_gaussian_kernel(1.5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
        }
    }
}

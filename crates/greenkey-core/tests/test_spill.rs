use approx::assert_abs_diff_eq;
use ndarray::Array2;

use greenkey_core::frame::{Frame, BLUE, GREEN, RED};
use greenkey_core::mask::Mask;
use greenkey_core::spill::{correct, SpillWeights};

fn all(h: usize, w: usize) -> Mask {
    Mask::new(Array2::from_elem((h, w), true))
}

#[test]
fn test_weight_presets() {
    assert_eq!(SpillWeights::default(), SpillWeights::PARTIAL);
    assert_abs_diff_eq!(SpillWeights::PARTIAL.sum(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(SpillWeights::FULL.sum(), 1.0, epsilon = 1e-6);
    assert_eq!(SpillWeights::FULL.green, 0.0);
}

#[test]
fn test_partial_correction_rewrites_green_only() {
    let frame = Frame::filled(2, 3, [100, 200, 50]).unwrap();
    let out = correct(&frame, &all(2, 3), &SpillWeights::PARTIAL).unwrap();
    // 0.3 * 100 + 0.4 * 200 + 0.3 * 50
    assert_eq!(out.pixel(1, 2), [100, 125, 50]);
}

#[test]
fn test_full_correction_averages_blue_and_red() {
    let frame = Frame::filled(1, 1, [90, 250, 31]).unwrap();
    let out = correct(&frame, &all(1, 1), &SpillWeights::FULL).unwrap();
    let px = out.pixel(0, 0);
    assert_eq!(px[BLUE], 90);
    assert_eq!(px[RED], 31);
    // 60.5 rounds away from zero.
    assert_eq!(px[GREEN], 61);
}

#[test]
fn test_full_correction_is_idempotent_on_balanced_pixel() {
    let frame = Frame::filled(3, 3, [40, 60, 80]).unwrap();
    let once = correct(&frame, &all(3, 3), &SpillWeights::FULL).unwrap();
    assert_eq!(once, frame);
    let twice = correct(&once, &all(3, 3), &SpillWeights::FULL).unwrap();
    assert_eq!(twice, once);
}

#[test]
fn test_unselected_pixels_untouched() {
    let frame = Frame::from_fn(4, 4, |r, c| [r as u8 * 10, 240, c as u8 * 10]).unwrap();
    let mut data = Array2::from_elem((4, 4), false);
    data[[1, 1]] = true;
    let out = correct(&frame, &Mask::new(data), &SpillWeights::FULL).unwrap();
    for r in 0..4 {
        for c in 0..4 {
            if (r, c) == (1, 1) {
                assert_eq!(out.pixel(r, c), [10, 10, 10]);
            } else {
                assert_eq!(out.pixel(r, c), frame.pixel(r, c));
            }
        }
    }
}

#[test]
fn test_heavy_weights_clamp_to_byte_range() {
    let weights = SpillWeights {
        blue: 1.0,
        green: 1.0,
        red: 1.0,
    };
    let frame = Frame::filled(1, 1, [200, 200, 200]).unwrap();
    let out = correct(&frame, &all(1, 1), &weights).unwrap();
    assert_eq!(out.pixel(0, 0)[GREEN], 255);
}

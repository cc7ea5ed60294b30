use ndarray::Array2;

use greenkey_core::mask::Mask;
use greenkey_core::refine::{border, dilate, erode, smooth};

/// Mask with the rectangle `[top, top+h) x [left, left+w)` set.
fn rect_mask(height: usize, width: usize, top: usize, left: usize, h: usize, w: usize) -> Mask {
    Mask::new(Array2::from_shape_fn((height, width), |(r, c)| {
        r >= top && r < top + h && c >= left && c < left + w
    }))
}

#[test]
fn test_empty_mask_is_a_no_op() {
    let empty = Mask::empty(12, 9);
    assert!(smooth(&empty, 3, 2).is_empty());
    assert!(border(&empty, 1).is_empty());
    assert!(border(&empty, 3).is_empty());
}

#[test]
fn test_smooth_removes_isolated_speckle() {
    let mut mask = rect_mask(12, 12, 2, 2, 5, 5);
    mask.data[[10, 10]] = true;
    let smoothed = smooth(&mask, 3, 1);
    assert!(!smoothed.get(10, 10));
    assert_eq!(smoothed, rect_mask(12, 12, 2, 2, 5, 5));
}

#[test]
fn test_smooth_preserves_region_touching_image_edge() {
    let mask = rect_mask(10, 10, 0, 0, 10, 4);
    assert_eq!(smooth(&mask, 3, 1), mask);
}

#[test]
fn test_smooth_identity_cases() {
    let mut mask = rect_mask(8, 8, 1, 1, 3, 3);
    mask.data[[6, 6]] = true;
    assert_eq!(smooth(&mask, 1, 5), mask);
    assert_eq!(smooth(&mask, 3, 0), mask);
}

#[test]
fn test_opening_drops_thin_bar_and_is_stable() {
    // Two pixels wide: narrower than the kernel.
    let mut mask = rect_mask(20, 20, 2, 2, 8, 8);
    for r in 14..18 {
        for c in 2..4 {
            mask.data[[r, c]] = true;
        }
    }
    let once = smooth(&mask, 3, 1);
    assert!(!once.get(15, 2));
    assert_eq!(once.count(), 64);
    assert_eq!(smooth(&mask, 3, 3), once);
}

#[test]
fn test_erode_and_dilate_square_kernel() {
    let mask = rect_mask(9, 9, 4, 4, 1, 1);
    let grown = dilate(&mask, 3);
    assert_eq!(grown, rect_mask(9, 9, 3, 3, 3, 3));
    assert_eq!(erode(&grown, 3), mask);

    let five = dilate(&mask, 5);
    assert_eq!(five.count(), 25);
}

#[test]
fn test_border_is_outer_ring() {
    let mask = rect_mask(9, 9, 3, 3, 3, 3);
    let ring = border(&mask, 1);
    assert_eq!(ring.count(), 5 * 5 - 3 * 3);
    for r in 0..9 {
        for c in 0..9 {
            let expected = (2..=6).contains(&r) && (2..=6).contains(&c) && !mask.get(r, c);
            assert_eq!(ring.get(r, c), expected, "({r}, {c})");
        }
    }
}

#[test]
fn test_border_thickness_widens_ring() {
    let mask = rect_mask(13, 13, 5, 5, 3, 3);
    assert_eq!(border(&mask, 2).count(), 7 * 7 - 3 * 3);
}

#[test]
fn test_border_ignores_image_edge() {
    let full = Mask::new(Array2::from_elem((6, 6), true));
    assert!(border(&full, 1).is_empty());

    // A region touching the left edge only rings on its open sides.
    let mask = rect_mask(6, 6, 0, 0, 6, 2);
    let ring = border(&mask, 1);
    assert_eq!(ring, rect_mask(6, 6, 0, 2, 6, 1));
}

#[test]
fn test_border_never_overlaps_mask() {
    let mut mask = rect_mask(16, 16, 2, 3, 6, 4);
    mask.data[[12, 12]] = true;
    let ring = border(&mask, 2);
    assert!(ring.difference(&mask) == ring);
    assert!(!ring.is_empty());
}

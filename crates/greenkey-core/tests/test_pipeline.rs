mod common;

use std::sync::Arc;

use greenkey_core::color::to_hsv;
use greenkey_core::error::GreenkeyError;
use greenkey_core::frame::{BoundingBox, Frame};
use greenkey_core::io::image_io::load_frame;
use greenkey_core::locate::SubjectDetector;
use greenkey_core::pipeline::{Orchestrator, PipelineConfig};
use greenkey_core::refine::border;
use greenkey_core::segment::{backdrop_mask, SegmentationConfig};

use common::{
    green_with_disk, in_disk, passthrough_config, write_png, BACKGROUND, BLUE_SUBJECT, GREEN,
};

struct FixedDetector(Vec<BoundingBox>);

impl SubjectDetector for FixedDetector {
    fn detect(&self, _gray: &[u8], _width: u32, _height: u32) -> Vec<BoundingBox> {
        self.0.clone()
    }
}

fn orchestrator(config: PipelineConfig, background: Frame) -> Orchestrator {
    Orchestrator::new(config, Arc::new(background), None).unwrap()
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_pure_backdrop_becomes_background() {
    let subject = Frame::filled(100, 100, GREEN).unwrap();
    let background = Frame::filled(100, 100, BACKGROUND).unwrap();

    let full = orchestrator(passthrough_config(100), background.clone());
    let processed = full.process_frame(&subject).unwrap();
    assert_eq!(processed.frame, background);
    assert_eq!(processed.backdrop_pixels, 100 * 100);
    assert_eq!(processed.spill_pixels, 0);
    assert_eq!(processed.face, None);

    let framed = orchestrator(
        PipelineConfig {
            output_width: 50,
            ..Default::default()
        },
        background,
    );
    let processed = framed.process_frame(&subject).unwrap();
    assert_eq!((processed.frame.width(), processed.frame.height()), (50, 50));
    for row in 0..50 {
        for col in 0..50 {
            assert_eq!(processed.frame.pixel(row, col), BACKGROUND);
        }
    }
}

#[test]
fn test_disk_on_green_field() {
    let (h, w, r) = (60, 60, 12.0);
    let center = (30.0, 30.0);
    let subject = green_with_disk(h, w, center, r, BLUE_SUBJECT);
    let background = Frame::filled(h, w, BACKGROUND).unwrap();

    // Backdrop is exactly the field.
    let hsv = to_hsv(&subject).unwrap();
    let mask = backdrop_mask(&hsv, &SegmentationConfig::default()).unwrap();
    for row in 0..h {
        for col in 0..w {
            assert_eq!(
                mask.get(row, col),
                !in_disk(row, col, center.0, center.1, r),
                "({row}, {col})"
            );
        }
    }

    // Border traces the disk edge: disk pixels with a field neighbor.
    let ring = border(&mask, 1);
    for row in 0..h {
        for col in 0..w {
            let on_edge = !mask.get(row, col)
                && (row.saturating_sub(1)..=(row + 1).min(h - 1)).any(|rr| {
                    (col.saturating_sub(1)..=(col + 1).min(w - 1)).any(|cc| mask.get(rr, cc))
                });
            assert_eq!(ring.get(row, col), on_edge, "({row}, {col})");
        }
    }
    assert!(!ring.is_empty());

    let out = orchestrator(passthrough_config(w as u32), background)
        .process_frame(&subject)
        .unwrap()
        .frame;

    for row in 0..h {
        for col in 0..w {
            if in_disk(row, col, center.0, center.1, r - 2.0) {
                assert_eq!(out.pixel(row, col), BLUE_SUBJECT, "({row}, {col})");
            }
        }
    }
    for (row, col) in [(0, 0), (0, w - 1), (h - 1, 0), (h - 1, w - 1), (5, 30)] {
        assert_eq!(out.pixel(row, col), BACKGROUND);
    }
}

#[test]
fn test_spill_corrected_inside_subject() {
    // Hue 38: a skin-range tone with a green cast, not backdrop.
    let tinted = [60, 140, 120];
    let subject = green_with_disk(60, 60, (30.0, 30.0), 15.0, tinted);
    let background = Frame::filled(60, 60, BACKGROUND).unwrap();

    let processed = orchestrator(passthrough_config(60), background.clone())
        .process_frame(&subject)
        .unwrap();
    // 0.3 * 60 + 0.4 * 140 + 0.3 * 120
    assert_eq!(processed.frame.pixel(30, 30), [60, 110, 120]);
    assert!(processed.spill_pixels >= 600);

    let mut config = passthrough_config(60);
    config.spill.enabled = false;
    let untouched = orchestrator(config, background)
        .process_frame(&subject)
        .unwrap();
    assert_eq!(untouched.frame.pixel(30, 30), tinted);
    assert_eq!(untouched.spill_pixels, 0);
}

#[test]
fn test_edge_blend_can_be_disabled() {
    let subject = green_with_disk(40, 40, (20.0, 20.0), 8.0, BLUE_SUBJECT);
    let background = Frame::filled(40, 40, BACKGROUND).unwrap();

    let mut config = passthrough_config(40);
    config.refine.blend_edges = false;
    config.spill.enabled = false;
    config.refine.kernel_size = 1;
    let out = orchestrator(config, background)
        .process_frame(&subject)
        .unwrap()
        .frame;

    // Hard composite only: every pixel is either subject or background.
    for row in 0..40 {
        for col in 0..40 {
            let expected = if in_disk(row, col, 20.0, 20.0, 8.0) {
                BLUE_SUBJECT
            } else {
                BACKGROUND
            };
            assert_eq!(out.pixel(row, col), expected);
        }
    }
}

// ---------------------------------------------------------------------------
// Background fitting
// ---------------------------------------------------------------------------

#[test]
fn test_larger_background_is_cropped_top_left() {
    let background = Frame::from_fn(90, 130, |r, c| [r as u8, c as u8, 200]).unwrap();
    let subject = Frame::filled(60, 100, GREEN).unwrap();

    let orch = orchestrator(passthrough_config(100), background);
    let out = orch.process_frame(&subject).unwrap().frame;

    assert_eq!((out.width(), out.height()), (100, 60));
    assert_eq!(out.pixel(0, 0), [0, 0, 200]);
    assert_eq!(out.pixel(59, 99), [59, 99, 200]);
}

#[test]
fn test_smaller_background_fails_this_image_only() {
    let background = Frame::filled(50, 50, BACKGROUND).unwrap();
    let subject = Frame::filled(60, 40, GREEN).unwrap();

    let err = orchestrator(passthrough_config(40), background)
        .process_frame(&subject)
        .unwrap_err();

    assert!(matches!(
        err,
        GreenkeyError::DimensionMismatch {
            width: 40,
            height: 60,
            bg_width: 50,
            bg_height: 50
        }
    ));
    assert!(!err.is_fatal());
}

// ---------------------------------------------------------------------------
// Construction and face framing
// ---------------------------------------------------------------------------

#[test]
fn test_invalid_config_rejected_at_construction() {
    let config = PipelineConfig {
        crop_margin_width: 0.7,
        ..Default::default()
    };
    let err = Orchestrator::new(config, Arc::new(Frame::filled(4, 4, GREEN).unwrap()), None)
        .err()
        .unwrap();
    assert!(matches!(err, GreenkeyError::InvalidConfig(_)));
    assert!(err.is_fatal());
}

#[test]
fn test_face_detection_requires_detector() {
    let config = PipelineConfig {
        use_face_detection: true,
        ..Default::default()
    };
    let result = Orchestrator::new(config, Arc::new(Frame::filled(4, 4, GREEN).unwrap()), None);
    assert!(matches!(result, Err(GreenkeyError::InvalidConfig(_))));
}

#[test]
fn test_detected_face_centers_the_crop() {
    let subject = green_with_disk(100, 200, (40.0, 150.0), 20.0, BLUE_SUBJECT);
    let background = Frame::filled(100, 200, BACKGROUND).unwrap();
    let config = PipelineConfig {
        use_face_detection: true,
        face_detection_width: 100,
        crop_margin_width: 0.25,
        crop_margin_height: 0.5,
        output_width: 100,
        ..Default::default()
    };
    // Detection runs at half resolution.
    let detector: Arc<dyn SubjectDetector> = Arc::new(FixedDetector(vec![BoundingBox {
        left: 65,
        top: 10,
        width: 20,
        height: 20,
    }]));
    let orch = Orchestrator::new(config, Arc::new(background), Some(detector)).unwrap();

    let processed = orch.process_frame(&subject).unwrap();

    assert_eq!(
        processed.face,
        Some(BoundingBox {
            left: 130,
            top: 20,
            width: 40,
            height: 40
        })
    );
    // Crop x range is [100, 200): the disk center lands at column 50.
    let out = processed.frame;
    assert_eq!((out.width(), out.height()), (100, 100));
    assert_eq!(out.pixel(40, 50), BLUE_SUBJECT);
    assert_eq!(out.pixel(40, 5), BACKGROUND);
}

#[test]
fn test_no_face_falls_back_to_center() {
    let subject = Frame::filled(40, 80, GREEN).unwrap();
    let background = Frame::from_fn(40, 80, |_, c| [c as u8, 0, 0]).unwrap();
    let config = PipelineConfig {
        use_face_detection: true,
        crop_margin_width: 0.25,
        crop_margin_height: 0.5,
        output_width: 40,
        ..Default::default()
    };
    let detector: Arc<dyn SubjectDetector> = Arc::new(FixedDetector(Vec::new()));
    let orch = Orchestrator::new(config, Arc::new(background), Some(detector)).unwrap();

    let processed = orch.process_frame(&subject).unwrap();

    assert_eq!(processed.face, None);
    // Centered 40-wide crop of an 80-wide image starts at column 20.
    assert_eq!(processed.frame.pixel(0, 0), [20, 0, 0]);
}

#[test]
fn test_process_file_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out").join("nested").join("in.png");
    write_png(&input, &green_with_disk(50, 50, (25.0, 25.0), 10.0, BLUE_SUBJECT));

    let orch = orchestrator(passthrough_config(25), Frame::filled(50, 50, BACKGROUND).unwrap());
    let processed = orch.process_file(&input, &output).unwrap();

    let written = load_frame(&output, Default::default()).unwrap();
    assert_eq!(written, processed.frame);
    assert_eq!((written.width(), written.height()), (25, 25));
}

// ---------------------------------------------------------------------------
// Loading assets from config
// ---------------------------------------------------------------------------

#[test]
fn test_from_config_prescales_background() {
    let dir = tempfile::tempdir().unwrap();
    let bg_path = dir.path().join("bg.png");
    write_png(&bg_path, &Frame::filled(80, 100, BACKGROUND).unwrap());

    let config = PipelineConfig {
        background_image_path: bg_path.clone(),
        ..Default::default()
    };
    let orch = Orchestrator::from_config(config.clone()).unwrap();
    assert_eq!((orch.background().width(), orch.background().height()), (100, 80));

    let scaled = Orchestrator::from_config(PipelineConfig {
        background_width: Some(50),
        ..config
    })
    .unwrap();
    assert_eq!(
        (scaled.background().width(), scaled.background().height()),
        (50, 40)
    );
    assert_eq!(scaled.background().pixel(39, 49), BACKGROUND);
}

#[test]
fn test_from_config_missing_background_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig {
        background_image_path: dir.path().join("missing.jpg"),
        ..Default::default()
    };
    let err = Orchestrator::from_config(config).err().unwrap();
    assert!(matches!(err, GreenkeyError::Asset { .. }));
    assert!(err.is_fatal());
}

#[cfg(feature = "face-detection")]
#[test]
fn test_from_config_missing_face_model_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let bg_path = dir.path().join("bg.png");
    write_png(&bg_path, &Frame::filled(10, 10, BACKGROUND).unwrap());

    let config = PipelineConfig {
        background_image_path: bg_path,
        use_face_detection: true,
        face_model_path: dir.path().join("no_such_model.bin"),
        ..Default::default()
    };
    let err = Orchestrator::from_config(config).err().unwrap();
    assert!(matches!(err, GreenkeyError::Asset { .. }));
    assert!(err.is_fatal());
}

#[cfg(not(feature = "face-detection"))]
#[test]
fn test_from_config_face_detection_without_backend_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let bg_path = dir.path().join("bg.png");
    write_png(&bg_path, &Frame::filled(10, 10, BACKGROUND).unwrap());

    let config = PipelineConfig {
        background_image_path: bg_path,
        use_face_detection: true,
        ..Default::default()
    };
    let err = Orchestrator::from_config(config).err().unwrap();
    assert!(err.is_fatal());
}

//! Document assembly: page counts, ordering, and the abort-on-bad-frame
//! policy.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tempfile::TempDir;

use shotlog::document::assemble;
use shotlog::error::ShotlogError;

fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(w, h, Rgb([200, 100, 50]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn one_page_per_frame_regardless_of_input_order() {
    let dir = TempDir::new().unwrap();
    // Deliberately passed newest-first; assembly orders by timestamp.
    let later = write_png(dir.path(), "screenshot_20250301_101530.png", 640, 480);
    let earlier = write_png(dir.path(), "screenshot_20250301_101510.png", 480, 640);
    let middle = write_png(dir.path(), "screenshot_20250301_101520.png", 300, 300);

    let dest = dir.path().join("out.pdf");
    let summary = assemble(&[later, earlier, middle], &dest).unwrap();

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.path, dest);
    let bytes = std::fs::read(&dest).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn an_interrupted_run_yields_exactly_the_frames_it_captured() {
    let dir = TempDir::new().unwrap();
    // Two frames out of what would have been a much longer run.
    let frames = vec![
        write_png(dir.path(), "screenshot_20250301_090000.png", 800, 600),
        write_png(dir.path(), "screenshot_20250301_090010.png", 800, 600),
    ];

    let dest = dir.path().join("partial.pdf");
    let summary = assemble(&frames, &dest).unwrap();
    assert_eq!(summary.pages, 2);
}

#[test]
fn empty_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("out.pdf");
    let err = assemble(&[], &dest).unwrap_err();
    assert!(matches!(err, ShotlogError::EmptyDocument));
    assert!(!dest.exists());
}

#[test]
fn a_filename_without_a_timestamp_aborts_the_document() {
    let dir = TempDir::new().unwrap();
    let good = write_png(dir.path(), "screenshot_20250301_090000.png", 100, 100);
    let bad = write_png(dir.path(), "notes.png", 100, 100);

    let dest = dir.path().join("out.pdf");
    let err = assemble(&[good, bad], &dest).unwrap_err();
    assert!(matches!(err, ShotlogError::FrameName { .. }));
    assert!(!dest.exists());
}

#[test]
fn an_unreadable_frame_aborts_the_document() {
    let dir = TempDir::new().unwrap();
    let good = write_png(dir.path(), "screenshot_20250301_090000.png", 100, 100);
    let missing = dir.path().join("screenshot_20250301_090010.png");

    let dest = dir.path().join("out.pdf");
    assert!(assemble(&[good, missing], &dest).is_err());
    assert!(!dest.exists());
}

#[test]
fn mixed_orientations_assemble_into_one_document() {
    let dir = TempDir::new().unwrap();
    let frames = vec![
        write_png(dir.path(), "screenshot_20250301_120000.png", 1920, 1080),
        write_png(dir.path(), "screenshot_20250301_120010.png", 1080, 1920),
    ];

    let dest = dir.path().join("mixed.pdf");
    let summary = assemble(&frames, &dest).unwrap();
    assert_eq!(summary.pages, 2);
    assert!(dest.exists());
}

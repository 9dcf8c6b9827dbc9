#[allow(dead_code)]
mod common;

use std::fs;

use approx::assert_abs_diff_eq;

use fieldrot_core::error::FieldRotError;
use fieldrot_core::frame::RasterFrame;
use fieldrot_core::io::image_io::{load_raster, save_raster};
use fieldrot_core::io::scan::{list_frames, output_path};

use common::marked_frame;

#[test]
fn test_tiff_16bit_rgb_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("2020-08-22-1315_0.tif");
    let frame = marked_frame(12, 20, 3);
    save_raster(&frame, &path).unwrap();

    let loaded = load_raster(&path).unwrap();
    assert_eq!(loaded.data.dim(), (12, 20, 3));
    assert_eq!(loaded.bit_depth, 16);
    for (a, b) in loaded.data.iter().zip(frame.data.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-4);
    }
}

#[test]
fn test_tiff_mono_keeps_one_channel() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mono.tiff");
    save_raster(&marked_frame(8, 8, 1), &path).unwrap();

    let loaded = load_raster(&path).unwrap();
    assert_eq!(loaded.channels(), 1);
    assert_abs_diff_eq!(loaded.data[[0, 0, 0]], 0.8, epsilon = 1e-4);
    assert_abs_diff_eq!(loaded.data[[7, 7, 0]], 0.1, epsilon = 1e-4);
}

#[test]
fn test_png_8bit_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    let mut frame = marked_frame(6, 10, 4);
    frame.bit_depth = 8;
    save_raster(&frame, &path).unwrap();

    let loaded = load_raster(&path).unwrap();
    assert_eq!(loaded.bit_depth, 8);
    assert_eq!(loaded.channels(), 4);
    assert_abs_diff_eq!(loaded.data[[0, 0, 1]], 0.8, epsilon = 1.0 / 255.0);
}

#[test]
fn test_gray_alpha_tiff_is_written_as_rgba() {
    let dir = tempfile::tempdir().unwrap();
    for depth in [8u8, 16] {
        let mut frame = RasterFrame::black(5, 6, 2, depth);
        frame.data[[1, 2, 0]] = 0.6;
        frame.data[[1, 2, 1]] = 1.0;
        frame.data[[4, 5, 1]] = 0.4;
        let path = dir.path().join(format!("ga{depth}.tif"));
        save_raster(&frame, &path).unwrap();

        let loaded = load_raster(&path).unwrap();
        assert_eq!(loaded.data.dim(), (5, 6, 4));
        assert_eq!(loaded.bit_depth, depth);
        let tol = if depth == 8 { 1.0 / 255.0 } else { 1e-4 };
        for c in 0..3 {
            assert_abs_diff_eq!(loaded.data[[1, 2, c]], 0.6, epsilon = tol);
            assert_abs_diff_eq!(loaded.data[[4, 5, c]], 0.0, epsilon = tol);
        }
        assert_abs_diff_eq!(loaded.data[[1, 2, 3]], 1.0, epsilon = tol);
        assert_abs_diff_eq!(loaded.data[[4, 5, 3]], 0.4, epsilon = tol);
    }
}

#[test]
fn test_gray_alpha_png_keeps_two_channels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ga.png");
    let mut frame = RasterFrame::black(3, 4, 2, 16);
    frame.data[[0, 0, 1]] = 1.0;
    save_raster(&frame, &path).unwrap();

    let loaded = load_raster(&path).unwrap();
    assert_eq!(loaded.channels(), 2);
    assert_eq!(loaded.data[[0, 0, 1]], 1.0);
}

#[test]
fn test_out_of_range_samples_are_clamped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clamp.tif");
    let mut frame = RasterFrame::black(2, 2, 1, 16);
    frame.data[[0, 0, 0]] = 1.5;
    frame.data[[1, 1, 0]] = -0.5;
    save_raster(&frame, &path).unwrap();

    let loaded = load_raster(&path).unwrap();
    assert_eq!(loaded.data[[0, 0, 0]], 1.0);
    assert_eq!(loaded.data[[1, 1, 0]], 0.0);
}

#[test]
fn test_unsupported_channel_count() {
    let dir = tempfile::tempdir().unwrap();
    let frame = RasterFrame::black(2, 2, 5, 16);
    let err = save_raster(&frame, &dir.path().join("five.tif")).unwrap_err();
    assert!(matches!(err, FieldRotError::UnsupportedChannels(5)));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_raster(&dir.path().join("absent.tif")).is_err());
}

#[test]
fn test_list_frames_filters_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.tif", "a.TIFF", "c.png", "notes.txt", "d.tiff"] {
        fs::write(dir.path().join(name), b"").unwrap();
    }
    fs::create_dir(dir.path().join("sub.tif")).unwrap();

    let found = list_frames(dir.path(), &["tif".to_string(), "tiff".to_string()]).unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.TIFF", "b.tif", "d.tiff"]);
}

#[test]
fn test_list_frames_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let err = list_frames(&dir.path().join("nope"), &["tif".to_string()]).unwrap_err();
    assert!(matches!(err, FieldRotError::Io(_)));
}

#[test]
fn test_output_path_keeps_extension() {
    let out = output_path(
        std::path::Path::new("/data/2020-08-22-1315_0_lapl4.tif"),
        std::path::Path::new("/out"),
        "_derot",
    );
    assert_eq!(out, std::path::PathBuf::from("/out/2020-08-22-1315_0_lapl4_derot.tif"));

    let bare = output_path(std::path::Path::new("frame"), std::path::Path::new("o"), "_x");
    assert_eq!(bare, std::path::PathBuf::from("o/frame_x"));
}

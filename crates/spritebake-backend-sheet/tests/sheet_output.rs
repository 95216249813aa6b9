//! End-to-end sheet building from frame files on disk.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use spritebake_backend_sheet::{encode_sheet, SheetError, SheetOutput, SheetResult};
use spritebake_spec::SheetLayout;
use tempfile::TempDir;

fn color(index: usize) -> Rgba<u8> {
    Rgba([(index * 13) as u8, (index * 29) as u8, 200, 255])
}

fn write_frames(dir: &Path, count: usize, size: u32) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("frame_{i:04}.png"));
            RgbaImage::from_pixel(size, size, color(i))
                .save(&path)
                .unwrap();
            path
        })
        .collect()
}

fn build_sheet(
    layout: &SheetLayout,
    frames: &[PathBuf],
    output: &Path,
) -> SheetResult<SheetOutput> {
    encode_sheet(layout, frames)?.write(output)
}

#[test]
fn sixteen_frames_in_four_columns() {
    let dir = TempDir::new().unwrap();
    let frames = write_frames(dir.path(), 16, 256);
    let layout = SheetLayout::compute(16, Some(4), 256).unwrap();
    let output = dir.path().join("sheet.png");

    let sheet = build_sheet(&layout, &frames, &output).unwrap();

    assert_eq!((sheet.width, sheet.height), (1024, 1024));
    let decoded = image::open(&output).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (1024, 1024));
    for i in 0..16 {
        let (x, y) = layout.cell_origin(i as u32);
        assert_eq!(decoded.get_pixel(x + 128, y + 128), &color(i));
    }
}

#[test]
fn eight_frames_leave_last_cell_transparent() {
    let dir = TempDir::new().unwrap();
    let frames = write_frames(dir.path(), 8, 32);
    let layout = SheetLayout::compute(8, None, 32).unwrap();
    let output = dir.path().join("sheet.png");

    build_sheet(&layout, &frames, &output).unwrap();

    let decoded = image::open(&output).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (96, 96));
    assert_eq!(decoded.get_pixel(80, 80)[3], 0);
    assert_eq!(decoded.get_pixel(48, 80), &color(7));
}

#[test]
fn frames_of_another_size_are_resampled() {
    let dir = TempDir::new().unwrap();
    let frames = write_frames(dir.path(), 2, 64);
    let layout = SheetLayout::compute(2, None, 16).unwrap();
    let output = dir.path().join("sheet.png");

    let sheet = build_sheet(&layout, &frames, &output).unwrap();

    assert_eq!((sheet.width, sheet.height), (32, 16));
    let decoded = image::open(&output).unwrap().to_rgba8();
    assert_close(decoded.get_pixel(8, 8), &color(0));
    assert_close(decoded.get_pixel(24, 8), &color(1));
}

fn assert_close(actual: &Rgba<u8>, expected: &Rgba<u8>) {
    for (a, e) in actual.0.iter().zip(expected.0.iter()) {
        assert!(a.abs_diff(*e) <= 1, "{actual:?} != {expected:?}");
    }
}

#[test]
fn identical_frames_produce_identical_bytes() {
    let dir = TempDir::new().unwrap();
    let frames = write_frames(dir.path(), 5, 24);
    let layout = SheetLayout::compute(5, None, 24).unwrap();
    let first = dir.path().join("a.png");
    let second = dir.path().join("b.png");

    let a = build_sheet(&layout, &frames, &first).unwrap();
    let b = build_sheet(&layout, &frames, &second).unwrap();

    assert_eq!(a.hash, b.hash);
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn unwritable_destination_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let frames = write_frames(dir.path(), 1, 8);
    let layout = SheetLayout::compute(1, None, 8).unwrap();
    let output = dir.path().join("no_such_dir").join("sheet.png");

    let err = build_sheet(&layout, &frames, &output).unwrap_err();

    assert!(matches!(err, SheetError::Png(_)));
    assert!(!output.exists());
}

#[test]
fn unreadable_frame_is_reported() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("frame_0000.png");
    std::fs::write(&bogus, b"not a png").unwrap();
    let layout = SheetLayout::compute(1, None, 8).unwrap();
    let output = dir.path().join("sheet.png");

    let err = build_sheet(&layout, &[bogus.clone()], &output).unwrap_err();

    match err {
        SheetError::LoadFrame { path, .. } => assert_eq!(path, bogus),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn encoding_writes_nothing_until_asked() {
    let dir = TempDir::new().unwrap();
    let frames = write_frames(dir.path(), 4, 8);
    let layout = SheetLayout::compute(4, None, 8).unwrap();
    let output = dir.path().join("sheet.png");

    let encoded = encode_sheet(&layout, &frames).unwrap();
    assert!(!output.exists());

    let sheet = encoded.write(&output).unwrap();
    assert_eq!((sheet.width, sheet.height), (encoded.width, encoded.height));
    assert_eq!(sheet.hash, encoded.hash);
    assert_eq!(
        sheet.hash,
        blake3::hash(&std::fs::read(&output).unwrap()).to_hex().to_string()
    );
}

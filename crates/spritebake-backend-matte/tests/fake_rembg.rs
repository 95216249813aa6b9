//! Runs the `rembg` adapter against shell scripts standing in for rembg.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use spritebake_backend_matte::{BackgroundRemover, MatteError, Rembg, RembgConfig};
use tempfile::TempDir;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn write_frame(dir: &Path, size: u32) -> PathBuf {
    let path = dir.join("frame_0000.png");
    RgbaImage::from_pixel(size, size, Rgba([120, 120, 120, 255]))
        .save(&path)
        .unwrap();
    path
}

fn rembg(executable: &Path) -> Rembg {
    Rembg::locate(&RembgConfig::default().rembg_path(executable)).unwrap()
}

#[test]
fn replaces_frame_with_matted_result() {
    let dir = TempDir::new().unwrap();
    let frame = write_frame(dir.path(), 16);

    // Stand-in writes a prepared transparent image to the last argument.
    let matted = dir.path().join("prepared.png");
    RgbaImage::new(16, 16).save(&matted).unwrap();
    let script = write_script(
        dir.path(),
        "rembg",
        &format!(
            r#"for a; do last="$a"; done
cp "{}" "$last""#,
            matted.display()
        ),
    );

    rembg(&script).remove_background(&frame).unwrap();

    let result = image::open(&frame).unwrap().to_rgba8();
    assert_eq!(result.dimensions(), (16, 16));
    assert!(result.pixels().all(|p| p[3] == 0));
}

#[test]
fn non_zero_exit_is_an_error() {
    let dir = TempDir::new().unwrap();
    let frame = write_frame(dir.path(), 16);
    let script = write_script(dir.path(), "rembg", "echo 'model download failed' >&2\nexit 3");

    let err = rembg(&script).remove_background(&frame).unwrap_err();

    match err {
        MatteError::ProcessFailed {
            exit_code, stderr, ..
        } => {
            assert_eq!(exit_code, 3);
            assert!(stderr.contains("model download failed"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // The original frame is untouched.
    let original = image::open(&frame).unwrap().to_rgba8();
    assert!(original.pixels().all(|p| p[3] == 255));
}

#[test]
fn size_change_is_an_error() {
    let dir = TempDir::new().unwrap();
    let frame = write_frame(dir.path(), 16);
    let wrong = dir.path().join("wrong.png");
    RgbaImage::new(20, 20).save(&wrong).unwrap();
    let script = write_script(
        dir.path(),
        "rembg",
        &format!(
            r#"for a; do last="$a"; done
cp "{}" "$last""#,
            wrong.display()
        ),
    );

    let err = rembg(&script).remove_background(&frame).unwrap_err();

    assert!(matches!(
        err,
        MatteError::DimensionMismatch {
            expected: (16, 16),
            actual: (20, 20),
            ..
        }
    ));
}

#[test]
fn empty_output_is_an_error() {
    let dir = TempDir::new().unwrap();
    let frame = write_frame(dir.path(), 16);
    let script = write_script(dir.path(), "rembg", "exit 0");

    let err = rembg(&script).remove_background(&frame).unwrap_err();

    assert!(matches!(err, MatteError::OutputNotFound { .. }));
}

#[test]
fn matted_frame_keeps_its_permissions() {
    let dir = TempDir::new().unwrap();
    let frame = write_frame(dir.path(), 16);
    std::fs::set_permissions(&frame, std::fs::Permissions::from_mode(0o644)).unwrap();

    let matted = dir.path().join("prepared.png");
    RgbaImage::new(16, 16).save(&matted).unwrap();
    let script = write_script(
        dir.path(),
        "rembg",
        &format!(
            r#"for a; do last="$a"; done
cp "{}" "$last""#,
            matted.display()
        ),
    );

    rembg(&script).remove_background(&frame).unwrap();

    let mode = std::fs::metadata(&frame).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

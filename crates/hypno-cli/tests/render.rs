use assert_cmd::cargo::cargo_bin_cmd;
use std::{error::Error, fs};
use tempfile::tempdir;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[test]
fn render_writes_png() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let out = dir.path().join("night.png");
    cargo_bin_cmd!("hypno")
        .args([
            "render",
            "--out",
            out.to_str().expect("utf8 path"),
            "--seed",
            "8",
            "--width",
            "640",
            "--height",
            "400",
            "--markers",
            "--cursor-x",
            "200",
            "--cursor-y",
            "180",
        ])
        .assert()
        .success();
    let bytes = fs::read(&out)?;
    assert!(bytes.len() > PNG_MAGIC.len());
    assert_eq!(&bytes[..8], &PNG_MAGIC);
    Ok(())
}

#[test]
fn cursor_needs_both_coordinates() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("night.png");
    cargo_bin_cmd!("hypno")
        .args([
            "render",
            "--out",
            out.to_str().unwrap(),
            "--cursor-x",
            "200",
        ])
        .assert()
        .failure();
}

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::error::Error;

fn cursor(args: &[&str]) -> Result<Value, Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("hypno");
    cmd.arg("cursor").args(args);
    let out = cmd.assert().success().get_output().stdout.clone();
    Ok(serde_json::from_slice(&out)?)
}

#[test]
fn left_edge_reads_first_sample() -> Result<(), Box<dyn Error>> {
    let value = cursor(&[
        "--x", "50", "--y", "120", "--width", "1000", "--height", "600", "--no-jitter",
    ])?;
    assert_eq!(value["sample_index"], 0);
    assert_eq!(value["label"], "60.0");
    assert_eq!(value["anchor"][0], 60.0);
    assert_eq!(value["anchor"][1], 110.0);
    Ok(())
}

#[test]
fn margin_has_no_sample() -> Result<(), Box<dyn Error>> {
    let value = cursor(&["--x", "20", "--seed", "4"])?;
    assert!(value.is_null());
    let value = cursor(&["--x", "-5", "--seed", "4"])?;
    assert!(value.is_null());
    Ok(())
}

#[test]
fn last_column_reads_last_sample() -> Result<(), Box<dyn Error>> {
    // 96 samples over 900px of plot width; the last column starts at x = 950
    let value = cursor(&["--x", "950", "--width", "1000", "--seed", "9"])?;
    assert_eq!(value["sample_index"], 95);
    Ok(())
}

use crate::signal::Series;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse `{ "samples": [{ "time": .., "value": .. }] }`, validating order.
pub fn parse_series_json(text: &str) -> Result<Series> {
    serde_json::from_str(text).context("parsing series json")
}

pub fn load_series_json(path: &Path) -> Result<Series> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_series_json(&text).with_context(|| format!("reading series {}", path.display()))
}

pub fn series_to_json(series: &Series) -> Result<String> {
    Ok(serde_json::to_string_pretty(series)?)
}

/// Load a series, picking the format from the extension (`.csv` or JSON).
pub fn load_series(path: &Path) -> Result<Series> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => super::csv::load_series_csv(path),
        _ => load_series_json(path),
    }
}

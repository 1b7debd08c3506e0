use crate::{
    detectors::rem::RemDetectorConfig,
    error::{ChartError, ChartResult},
    generator::{validate_interval, validate_phases, validate_point_count, JitterConfig},
    signal::PhaseSpec,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything the chart needs to generate, detect and lay out a night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Inset in pixels reserved for axis labels
    pub margin: f64,
    pub value_min: f64,
    pub value_max: f64,
    pub point_count: usize,
    /// Minutes between samples
    pub sample_interval: f64,
    /// Rolling average window, in samples
    pub rolling_window_size: usize,
    /// Minimum distance between REM markers, in samples
    pub min_marker_spacing: usize,
    /// Distance between labelled ticks on the value axis
    pub y_tick_step: f64,
    // TOML requires tables after plain keys
    pub jitter: JitterConfig,
    pub phases: Vec<PhaseSpec>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let detector = RemDetectorConfig::default();
        Self {
            margin: 50.0,
            value_min: 40.0,
            value_max: 120.0,
            point_count: 96,
            sample_interval: 5.0,
            rolling_window_size: detector.window_size,
            min_marker_spacing: detector.min_spacing,
            y_tick_step: 20.0,
            jitter: JitterConfig::default(),
            phases: default_phases(),
        }
    }
}

pub fn default_phases() -> Vec<PhaseSpec> {
    vec![
        PhaseSpec::new("Light Sleep", 45.0, 60.0),
        PhaseSpec::new("Deep Sleep", 30.0, 55.0),
        PhaseSpec::new("REM Sleep", 15.0, 70.0),
    ]
}

impl ChartConfig {
    pub fn detector(&self) -> RemDetectorConfig {
        RemDetectorConfig {
            window_size: self.rolling_window_size,
            min_spacing: self.min_marker_spacing,
        }
    }

    /// Length of the night in minutes, sample to sample.
    pub fn total_minutes(&self) -> f64 {
        self.point_count.saturating_sub(1) as f64 * self.sample_interval
    }

    pub fn validate(&self) -> ChartResult<()> {
        validate_phases(&self.phases)?;
        validate_point_count(self.point_count)?;
        validate_interval(self.sample_interval)?;
        self.jitter.validate()?;
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ChartError::invalid(format!(
                "margin must be non-negative, got {}",
                self.margin
            )));
        }
        if !(self.value_min.is_finite() && self.value_max.is_finite())
            || self.value_max <= self.value_min
        {
            return Err(ChartError::invalid(format!(
                "value range {}..{} is empty",
                self.value_min, self.value_max
            )));
        }
        if self.rolling_window_size == 0 {
            return Err(ChartError::invalid("rolling window must hold at least one sample"));
        }
        if !self.y_tick_step.is_finite() || self.y_tick_step <= 0.0 {
            return Err(ChartError::invalid(format!(
                "y tick step must be positive, got {}",
                self.y_tick_step
            )));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing chart config")
    }
}

pub fn parse_config(text: &str) -> Result<ChartConfig> {
    let config: ChartConfig = toml::from_str(text).context("parsing chart config")?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<ChartConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("loading config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let cfg = ChartConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.total_minutes(), 475.0);
        assert_eq!(cfg.detector(), RemDetectorConfig::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = parse_config(
            r#"
point_count = 48
sample_interval = 2.5

[jitter]
noise = 0.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.point_count, 48);
        assert_eq!(cfg.sample_interval, 2.5);
        assert_eq!(cfg.jitter.noise, 0.0);
        assert_eq!(cfg.jitter.transition_samples, 3);
        assert_eq!(cfg.phases, default_phases());
    }

    #[test]
    fn custom_phases_parse() {
        let cfg = parse_config(
            r#"
[[phases]]
label = "Light Sleep"
duration = 45.0
base_value = 57.0

[[phases]]
label = "REM Sleep"
duration = 25.0
base_value = 63.0
"#,
        )
        .unwrap();
        assert_eq!(cfg.phases.len(), 2);
        assert_eq!(cfg.phases[1].base_value, 63.0);
    }

    #[test]
    fn rejects_inverted_value_range() {
        let err = parse_config("value_min = 100.0\nvalue_max = 60.0\n").unwrap_err();
        assert!(format!("{:#}", err).contains("value range"));
    }

    #[test]
    fn rejects_point_count_over_limit() {
        let err = parse_config("point_count = 1000001\n").unwrap_err();
        assert!(format!("{:#}", err).contains("exceeds the limit"));
        assert!(parse_config("point_count = 1000000\n").is_ok());
    }

    #[test]
    fn rejects_empty_phase_table() {
        assert!(parse_config("phases = []\n").is_err());
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.toml");
        let mut cfg = ChartConfig::default();
        cfg.min_marker_spacing = 12;
        fs::write(&path, cfg.to_toml().unwrap()).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_config(Path::new("/nonexistent/hypno.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/hypno.toml"));
    }
}

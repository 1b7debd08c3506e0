use crate::{
    error::{ChartError, ChartResult},
    signal::{RemMarker, Series},
};
use serde::{Deserialize, Serialize};

/// Parameters for the rolling-average crossing detector, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemDetectorConfig {
    /// Trailing window used for the rolling average.
    pub window_size: usize,
    /// Cool-down: a crossing within this many samples of the last accepted
    /// marker is dropped.
    pub min_spacing: usize,
}

impl Default for RemDetectorConfig {
    fn default() -> Self {
        // 30 and 90 minutes at the default 5-minute sample interval
        Self {
            window_size: 6,
            min_spacing: 18,
        }
    }
}

/// Flag upward crossings of the trailing rolling average.
pub fn detect_rem_markers(
    series: &Series,
    window_size: usize,
    min_spacing: usize,
) -> ChartResult<Vec<RemMarker>> {
    detect_rem_markers_with_config(
        series,
        &RemDetectorConfig {
            window_size,
            min_spacing,
        },
    )
}

/// Detect markers using the configurable detector.
///
/// A crossing at `i` means `value[i] >= avg` while `value[i - 1] < avg`, where
/// `avg` is the mean of the `window_size` samples before `i`. Series no longer
/// than the window yield no markers.
pub fn detect_rem_markers_with_config(
    series: &Series,
    cfg: &RemDetectorConfig,
) -> ChartResult<Vec<RemMarker>> {
    if cfg.window_size == 0 {
        return Err(ChartError::invalid("rolling window must hold at least one sample"));
    }
    let values: Vec<f64> = series.values().collect();
    if values.len() <= cfg.window_size {
        return Ok(Vec::new());
    }

    let win = cfg.window_size;
    let mut markers: Vec<RemMarker> = Vec::new();
    for i in win..values.len() {
        let rolling = values[i - win..i].iter().sum::<f64>() / win as f64;
        let crossed = values[i] >= rolling && values[i - 1] < rolling;
        if !crossed {
            continue;
        }
        let cooled_down = markers
            .last()
            .map_or(true, |last| i - last.sample_index > cfg.min_spacing);
        if cooled_down {
            markers.push(RemMarker::new(i));
        }
    }
    log::debug!(
        "rem detector: {} markers over {} samples (window {}, spacing {})",
        markers.len(),
        values.len(),
        cfg.window_size,
        cfg.min_spacing
    );
    Ok(markers)
}

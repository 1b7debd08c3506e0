use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};

/// One heart-rate reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Minutes from the start of the night
    pub time: f64,
    /// Beats per minute
    pub value: f64,
}

/// A named segment of the synthetic sleep cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpec {
    pub label: String,
    /// Nominal length in minutes
    pub duration: f64,
    /// Baseline heart rate in bpm
    pub base_value: f64,
}

impl PhaseSpec {
    pub fn new(label: impl Into<String>, duration: f64, base_value: f64) -> Self {
        Self {
            label: label.into(),
            duration,
            base_value,
        }
    }
}

/// Chronologically ordered heart-rate samples. Never mutated once built;
/// regeneration produces a fresh value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct Series {
    samples: Vec<Sample>,
}

/// Wire form of [`Series`]; decoding goes through the time-order check.
#[derive(Deserialize)]
struct RawSeries {
    samples: Vec<Sample>,
}

impl TryFrom<RawSeries> for Series {
    type Error = ChartError;

    fn try_from(raw: RawSeries) -> ChartResult<Self> {
        Series::try_from_samples(raw.samples)
    }
}

impl Series {
    pub(crate) fn from_generated(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Build a series from external samples, rejecting non-increasing time.
    pub fn try_from_samples(samples: Vec<Sample>) -> ChartResult<Self> {
        if let Some(bad) = samples
            .iter()
            .position(|s| !s.time.is_finite() || !s.value.is_finite())
        {
            return Err(ChartError::invalid(format!(
                "sample {} is not a finite number",
                bad
            )));
        }
        for (idx, w) in samples.windows(2).enumerate() {
            if w[1].time <= w[0].time {
                return Err(ChartError::invalid(format!(
                    "sample {} time {} does not follow {}",
                    idx + 1,
                    w[1].time,
                    w[0].time
                )));
            }
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Total span covered, in minutes.
    pub fn duration(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }
}

/// Detected REM-phase onset, by sample position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemMarker {
    pub sample_index: usize,
}

impl RemMarker {
    pub fn new(sample_index: usize) -> Self {
        Self { sample_index }
    }
}

use crate::{
    error::{ChartError, ChartResult},
    signal::{PhaseSpec, Sample, Series},
};
use rand::{
    rngs::{StdRng, ThreadRng},
    Rng,
};
use serde::{Deserialize, Serialize};

/// Source of uniform randomness for the generator.
///
/// Production code hands in a `StdRng`/`ThreadRng`; tests can inject a
/// [`SequenceSource`] to replay a fixed list of draws.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }

    /// Draw from `[-range, range)`. A zero range draws nothing.
    fn symmetric(&mut self, range: f64) -> f64 {
        if range > 0.0 {
            self.uniform(-range, range)
        } else {
            0.0
        }
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for ThreadRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of unit values, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    pos: usize,
}

impl SequenceSource {
    /// Values are clamped into `[0, 1)`; an empty list always yields 0.5.
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, pos: 0 }
    }

    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            self.pos += 1;
            return 0.5;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value
    }
}

/// Symmetric perturbation ranges applied while generating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// ± minutes added to each phase occurrence
    pub duration_minutes: f64,
    /// ± bpm added to each phase occurrence's baseline
    pub base_value: f64,
    /// ± bpm added to every emitted sample
    pub noise: f64,
    /// Samples spent interpolating into each phase
    pub transition_samples: usize,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 7.5,
            base_value: 2.5,
            noise: 1.5,
            transition_samples: 3,
        }
    }
}

impl JitterConfig {
    /// No randomness at all; the transition count stays at its default.
    pub fn none() -> Self {
        Self {
            duration_minutes: 0.0,
            base_value: 0.0,
            noise: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, range) in [
            ("duration jitter", self.duration_minutes),
            ("base value jitter", self.base_value),
            ("noise", self.noise),
        ] {
            if !range.is_finite() || range < 0.0 {
                return Err(ChartError::invalid(format!(
                    "{name} must be a non-negative number, got {range}"
                )));
            }
        }
        if self.transition_samples == 0 {
            return Err(ChartError::invalid(
                "transition sample count must be at least 1",
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_phases(phases: &[PhaseSpec]) -> ChartResult<()> {
    if phases.is_empty() {
        return Err(ChartError::invalid("phase sequence is empty"));
    }
    for phase in phases {
        if !phase.duration.is_finite() || !phase.base_value.is_finite() {
            return Err(ChartError::invalid(format!(
                "phase '{}' has non-finite duration or base value",
                phase.label
            )));
        }
    }
    Ok(())
}

/// Largest series the generator will build.
pub const MAX_POINT_COUNT: usize = 1_000_000;

pub(crate) fn validate_point_count(point_count: usize) -> ChartResult<()> {
    if point_count > MAX_POINT_COUNT {
        return Err(ChartError::invalid(format!(
            "point count {point_count} exceeds the limit of {MAX_POINT_COUNT}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_interval(sample_interval_minutes: f64) -> ChartResult<()> {
    if !sample_interval_minutes.is_finite() || sample_interval_minutes <= 0.0 {
        return Err(ChartError::invalid(format!(
            "sample interval must be positive, got {sample_interval_minutes}"
        )));
    }
    Ok(())
}

/// Generate `point_count` samples by cycling through `phases`.
///
/// Each phase occurrence gets its own perturbed duration and baseline, opens
/// with `transition_samples` samples interpolated from the previous baseline,
/// then holds its baseline (plus per-sample noise) for the rest of its
/// duration. Output is truncated mid-phase once `point_count` is reached.
pub fn generate_series(
    phases: &[PhaseSpec],
    point_count: usize,
    sample_interval_minutes: f64,
    jitter: &JitterConfig,
    rng: &mut dyn RandomSource,
) -> ChartResult<Series> {
    validate_phases(phases)?;
    validate_point_count(point_count)?;
    validate_interval(sample_interval_minutes)?;
    jitter.validate()?;

    let mut samples = Vec::with_capacity(point_count);
    let mut previous_base: Option<f64> = None;
    let transition = jitter.transition_samples;
    let transition_minutes = transition as f64 * sample_interval_minutes;

    'cycle: loop {
        for phase in phases {
            if samples.len() >= point_count {
                break 'cycle;
            }
            let duration = (phase.duration + rng.symmetric(jitter.duration_minutes)).max(0.0);
            let base = phase.base_value + rng.symmetric(jitter.base_value);
            let start = previous_base.unwrap_or(base);

            for k in 0..transition {
                let frac = (k + 1) as f64 / transition as f64;
                let value = start + (base - start) * frac + rng.symmetric(jitter.noise);
                push_sample(&mut samples, sample_interval_minutes, value);
                if samples.len() >= point_count {
                    break 'cycle;
                }
            }

            let steady =
                ((duration - transition_minutes).max(0.0) / sample_interval_minutes).ceil() as usize;
            for _ in 0..steady {
                let value = base + rng.symmetric(jitter.noise);
                push_sample(&mut samples, sample_interval_minutes, value);
                if samples.len() >= point_count {
                    break 'cycle;
                }
            }
            previous_base = Some(base);
        }
    }

    log::debug!(
        "generated {} samples over {} phases",
        samples.len(),
        phases.len()
    );
    Ok(Series::from_generated(samples))
}

fn push_sample(samples: &mut Vec<Sample>, interval: f64, value: f64) {
    let time = samples.len() as f64 * interval;
    samples.push(Sample { time, value });
}

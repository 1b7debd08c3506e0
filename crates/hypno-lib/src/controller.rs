use crate::{
    config::ChartConfig,
    detectors::rem::detect_rem_markers_with_config,
    error::ChartResult,
    generator::{generate_series, RandomSource},
    mapping::{CoordinateMapper, Viewport},
    plot::{build_scene, Point, RenderSurface, Scene, SceneInput},
    signal::{RemMarker, Sample, Series},
};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

const DEFAULT_WIDTH: f64 = 960.0;
const DEFAULT_HEIGHT: f64 = 600.0;
const READOUT_OFFSET: [f64; 2] = [10.0, -10.0];

/// Value under the crosshair and where to print it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorReadout {
    pub sample_index: usize,
    pub sample: Sample,
    /// bpm rounded to one decimal
    pub label: String,
    pub anchor: Point,
}

/// Owns the current night and the UI-facing toggles.
///
/// Every query recomputes from current state, so the surface can redraw as
/// often as it likes; `regenerate` swaps the whole series at once.
pub struct ChartController {
    config: ChartConfig,
    rng: Box<dyn RandomSource>,
    series: Series,
    viewport: Viewport,
    markers_visible: bool,
}

impl ChartController {
    pub fn new(config: ChartConfig, mut rng: Box<dyn RandomSource>) -> ChartResult<Self> {
        config.validate()?;
        let series = generate_series(
            &config.phases,
            config.point_count,
            config.sample_interval,
            &config.jitter,
            rng.as_mut(),
        )?;
        let viewport = Viewport::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, config.margin);
        Ok(Self {
            config,
            rng,
            series,
            viewport,
            markers_visible: false,
        })
    }

    pub fn with_seed(config: ChartConfig, seed: u64) -> ChartResult<Self> {
        Self::new(config, Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn from_entropy(config: ChartConfig) -> ChartResult<Self> {
        Self::new(config, Box::new(StdRng::from_entropy()))
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn current_series(&self) -> &Series {
        &self.series
    }

    /// Replace the current series with a freshly generated one.
    pub fn regenerate(&mut self) -> ChartResult<()> {
        let series = generate_series(
            &self.config.phases,
            self.config.point_count,
            self.config.sample_interval,
            &self.config.jitter,
            self.rng.as_mut(),
        )?;
        log::debug!("regenerated series with {} samples", series.len());
        self.series = series;
        Ok(())
    }

    pub fn markers_visible(&self) -> bool {
        self.markers_visible
    }

    pub fn set_markers_visible(&mut self, visible: bool) {
        self.markers_visible = visible;
    }

    /// Flip marker visibility, returning the new state.
    pub fn toggle_markers(&mut self) -> bool {
        self.markers_visible = !self.markers_visible;
        self.markers_visible
    }

    /// REM markers for the current series, regardless of visibility.
    pub fn markers(&self) -> Vec<RemMarker> {
        detect_rem_markers_with_config(&self.series, &self.config.detector()).unwrap_or_else(
            |err| {
                log::warn!("marker detection failed: {err}");
                Vec::new()
            },
        )
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Resize keeping the configured margin.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height, self.config.margin);
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(
            self.viewport,
            self.config.value_min,
            self.config.value_max,
            self.series.len(),
        )
    }

    /// Sample whose column contains `pixel_x`. Only the x position matters;
    /// `_pixel_y` is accepted so the surface can forward raw pointer events.
    pub fn cursor_sample(&self, pixel_x: f64, _pixel_y: f64) -> Option<Sample> {
        self.mapper()
            .sample_index_at(pixel_x)
            .and_then(|idx| self.series.get(idx).copied())
    }

    pub fn cursor_readout(&self, pixel_x: f64, pixel_y: f64) -> Option<CursorReadout> {
        let sample_index = self.mapper().sample_index_at(pixel_x)?;
        let sample = *self.series.get(sample_index)?;
        Some(CursorReadout {
            sample_index,
            sample,
            label: format!("{:.1}", sample.value),
            anchor: [pixel_x + READOUT_OFFSET[0], pixel_y + READOUT_OFFSET[1]],
        })
    }

    /// Draw primitives for the current state and an optional pointer.
    pub fn scene(&self, cursor: Option<(f64, f64)>) -> Scene {
        let mapper = self.mapper();
        let markers = self.markers_visible.then(|| self.markers());
        let readout = cursor.and_then(|(x, y)| self.cursor_readout(x, y));
        build_scene(&SceneInput {
            config: &self.config,
            mapper: &mapper,
            series: &self.series,
            markers: markers.as_deref(),
            cursor,
            readout: readout.as_ref(),
        })
    }

    pub fn render(
        &self,
        surface: &mut dyn RenderSurface,
        cursor: Option<(f64, f64)>,
    ) -> anyhow::Result<()> {
        surface.draw(&self.scene(cursor))
    }
}

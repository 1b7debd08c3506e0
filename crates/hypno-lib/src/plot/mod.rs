use crate::{
    config::ChartConfig,
    controller::CursorReadout,
    mapping::CoordinateMapper,
    signal::{RemMarker, Series},
};
use serde::{Deserialize, Serialize};

pub type Point = [f64; 2];

/// RGBA packed as `0xRRGGBBAA`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000FF);
    pub const WHITE: Color = Color(0xFFFFFFFF);

    pub fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }
    pub fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }
    pub fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }
    pub fn a(self) -> u8 {
        self.0 as u8
    }
    /// Alpha as a 0..=1 opacity.
    pub fn opacity(self) -> f64 {
        self.a() as f64 / 255.0
    }
}

const LINE_COLOR: Color = Color::WHITE;
const CURSOR_COLOR: Color = Color(0x80808080);
const AREA_COLOR: Color = Color(0x6FA8FF38);
const MARKER_COLOR: Color = Color(0xFF5FA2FF);
const MARKER_GUIDE_COLOR: Color = Color(0xFF5FA280);

const LABEL_SIZE: f32 = 16.0;
const READOUT_SIZE: f32 = 14.0;
const TICK_LENGTH: f64 = 5.0;
const MARKER_RADIUS: f64 = 4.0;
// beyond this an axis is left unlabelled
const MAX_TICKS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    pub dash: Option<[f32; 2]>,
    pub color: Color,
}

impl Style {
    pub fn solid(width: f32, color: Color) -> Self {
        Self {
            width,
            dash: None,
            color,
        }
    }
}

/// One drawing instruction. Text is anchored at its left baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        style: Style,
    },
    /// Open polyline when `fill` is `None`, otherwise a closed convex polygon.
    Path {
        points: Vec<Point>,
        style: Option<Style>,
        fill: Option<Color>,
    },
    Text {
        at: Point,
        text: String,
        size: f32,
        color: Color,
    },
    /// Angles in radians, clockwise from +x in screen space.
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        fill: Option<Color>,
        style: Option<Style>,
    },
}

/// Everything needed to paint one frame, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Color,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: f64, height: f64, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn line(&mut self, from: Point, to: Point, style: Style) {
        self.push(Primitive::Line { from, to, style });
    }

    fn text(&mut self, at: Point, text: impl Into<String>, size: f32, color: Color) {
        self.push(Primitive::Text {
            at,
            text: text.into(),
            size,
            color,
        });
    }
}

/// A drawing backend: egui painter, bitmap, test recorder.
pub trait RenderSurface {
    fn draw(&mut self, scene: &Scene) -> anyhow::Result<()>;
}

/// Inputs for [`build_scene`]. `markers` is `None` when markers are hidden.
pub struct SceneInput<'a> {
    pub config: &'a ChartConfig,
    pub mapper: &'a CoordinateMapper,
    pub series: &'a Series,
    pub markers: Option<&'a [RemMarker]>,
    pub cursor: Option<(f64, f64)>,
    pub readout: Option<&'a CursorReadout>,
}

pub fn build_scene(input: &SceneInput<'_>) -> Scene {
    let vp = *input.mapper.viewport();
    let mut scene = Scene::new(vp.width, vp.height, Color::BLACK);
    let axis = Style::solid(2.0, LINE_COLOR);

    scene.line([vp.left(), vp.bottom()], [vp.right(), vp.bottom()], axis);
    scene.line([vp.left(), vp.top()], [vp.left(), vp.bottom()], axis);
    scene.text([vp.width / 2.0, vp.height - 15.0], "Time", LABEL_SIZE, LINE_COLOR);
    scene.text([5.0, 20.0], "Heart Rate (BPM)", LABEL_SIZE, LINE_COLOR);

    push_value_ticks(&mut scene, input);
    push_hour_ticks(&mut scene, input);
    push_series(&mut scene, input);

    if let Some(markers) = input.markers {
        push_markers(&mut scene, input, markers);
    }
    if let Some((cx, cy)) = input.cursor {
        let crosshair = Style::solid(1.0, CURSOR_COLOR);
        scene.line([cx, vp.top()], [cx, vp.bottom()], crosshair);
        scene.line([vp.left(), cy], [vp.right(), cy], crosshair);
        if let Some(readout) = input.readout {
            scene.text(readout.anchor, readout.label.clone(), READOUT_SIZE, LINE_COLOR);
        }
    }
    scene
}

fn push_value_ticks(scene: &mut Scene, input: &SceneInput<'_>) {
    let cfg = input.config;
    let left = input.mapper.viewport().left();
    let tick = Style::solid(2.0, LINE_COLOR);
    let span = cfg.value_max - cfg.value_min;
    if !(cfg.y_tick_step.is_finite() && cfg.y_tick_step > 0.0 && span.is_finite() && span >= 0.0) {
        return;
    }
    let steps = (span / cfg.y_tick_step + 1e-9).floor();
    if steps > MAX_TICKS as f64 {
        return;
    }
    for k in 0..=steps as usize {
        let value = cfg.value_min + k as f64 * cfg.y_tick_step;
        let y = input.mapper.y_at(value);
        scene.line([left - TICK_LENGTH, y], [left, y], tick);
        scene.text([15.0, y + 5.0], format!("{:.0}", value), LABEL_SIZE, LINE_COLOR);
    }
}

fn push_hour_ticks(scene: &mut Scene, input: &SceneInput<'_>) {
    let interval = input.config.sample_interval;
    if !(interval.is_finite() && interval > 0.0) {
        return;
    }
    let span_minutes = input.series.len().saturating_sub(1) as f64 * interval;
    let bottom = input.mapper.viewport().bottom();
    let tick = Style::solid(2.0, LINE_COLOR);
    let hours = (span_minutes / 60.0 + 1e-9).floor();
    if !hours.is_finite() || hours > MAX_TICKS as f64 {
        return;
    }
    for hour in 0..=hours as usize {
        let x = input.mapper.x_at(hour as f64 * 60.0 / interval);
        scene.line([x, bottom + TICK_LENGTH], [x, bottom - TICK_LENGTH], tick);
        scene.text(
            [x - 12.0, bottom + 25.0],
            format!("{:02}:00", hour),
            LABEL_SIZE,
            LINE_COLOR,
        );
    }
}

fn push_series(scene: &mut Scene, input: &SceneInput<'_>) {
    let points: Vec<Point> = input
        .series
        .samples()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let (x, y) = input.mapper.to_pixel(i, s.value);
            [x, y]
        })
        .collect();
    let baseline = input.mapper.viewport().bottom();

    // area under the curve, one convex strip per segment
    for pair in points.windows(2) {
        scene.push(Primitive::Path {
            points: vec![
                pair[0],
                pair[1],
                [pair[1][0], baseline],
                [pair[0][0], baseline],
            ],
            style: None,
            fill: Some(AREA_COLOR),
        });
    }
    if !points.is_empty() {
        scene.push(Primitive::Path {
            points,
            style: Some(Style::solid(2.0, LINE_COLOR)),
            fill: None,
        });
    }
}

fn push_markers(scene: &mut Scene, input: &SceneInput<'_>, markers: &[RemMarker]) {
    let vp = *input.mapper.viewport();
    let guide = Style {
        width: 1.0,
        dash: Some([4.0, 4.0]),
        color: MARKER_GUIDE_COLOR,
    };
    for marker in markers {
        let Some(sample) = input.series.get(marker.sample_index) else {
            continue;
        };
        let (x, y) = input.mapper.to_pixel(marker.sample_index, sample.value);
        scene.line([x, vp.top()], [x, vp.bottom()], guide);
        scene.push(Primitive::Arc {
            center: [x, y],
            radius: MARKER_RADIUS,
            start_angle: 0.0,
            end_angle: std::f64::consts::TAU,
            fill: Some(MARKER_COLOR),
            style: None,
        });
        scene.text([x - 14.0, vp.top() - 8.0], "REM", READOUT_SIZE, MARKER_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mapping::Viewport,
        signal::{Sample, Series},
    };

    fn fixture() -> (ChartConfig, Series) {
        let cfg = ChartConfig::default();
        let samples = (0..cfg.point_count)
            .map(|i| Sample {
                time: i as f64 * cfg.sample_interval,
                value: 60.0 + (i % 7) as f64,
            })
            .collect();
        (cfg, Series::try_from_samples(samples).unwrap())
    }

    #[test]
    fn color_channels_unpack() {
        let c = Color(0x11223344);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0x11, 0x22, 0x33, 0x44));
        assert_eq!(Color::WHITE.opacity(), 1.0);
    }

    #[test]
    fn scene_has_axes_labels_and_curve() {
        let (cfg, series) = fixture();
        let mapper = CoordinateMapper::new(
            Viewport::new(1000.0, 600.0, cfg.margin),
            cfg.value_min,
            cfg.value_max,
            series.len(),
        );
        let scene = build_scene(&SceneInput {
            config: &cfg,
            mapper: &mapper,
            series: &series,
            markers: None,
            cursor: None,
            readout: None,
        });
        let texts: Vec<&str> = scene.texts().collect();
        assert!(texts.contains(&"Time"));
        assert!(texts.contains(&"Heart Rate (BPM)"));
        // 40, 60, 80, 100, 120
        for label in ["40", "60", "80", "100", "120"] {
            assert!(texts.contains(&label), "missing tick {label}");
        }
        // 475 minutes -> 00:00 through 07:00
        assert!(texts.contains(&"00:00"));
        assert!(texts.contains(&"07:00"));
        assert!(!texts.contains(&"08:00"));
        assert!(!texts.contains(&"REM"));

        let polyline = scene
            .primitives
            .iter()
            .find_map(|p| match p {
                Primitive::Path {
                    points, fill: None, ..
                } => Some(points),
                _ => None,
            })
            .expect("series polyline");
        assert_eq!(polyline.len(), series.len());
        assert_eq!(polyline[0], [50.0, mapper.y_at(60.0)]);
    }

    #[test]
    fn degenerate_tick_settings_skip_the_axis() {
        let (mut cfg, series) = fixture();
        let mapper = CoordinateMapper::new(
            Viewport::new(1000.0, 600.0, cfg.margin),
            cfg.value_min,
            cfg.value_max,
            series.len(),
        );
        for step in [0.0, -20.0, f64::NAN, 1e-300] {
            cfg.y_tick_step = step;
            let scene = build_scene(&SceneInput {
                config: &cfg,
                mapper: &mapper,
                series: &series,
                markers: None,
                cursor: None,
                readout: None,
            });
            let texts: Vec<&str> = scene.texts().collect();
            assert!(!texts.contains(&"40"), "step {step} still labelled");
            assert!(texts.contains(&"00:00"));
        }
        cfg.y_tick_step = 20.0;
        cfg.sample_interval = 0.0;
        let scene = build_scene(&SceneInput {
            config: &cfg,
            mapper: &mapper,
            series: &series,
            markers: None,
            cursor: None,
            readout: None,
        });
        assert!(!scene.texts().any(|t| t == "00:00"));
        assert!(scene.texts().any(|t| t == "40"));
    }

    #[test]
    fn markers_and_crosshair_are_emitted_on_request() {
        let (cfg, series) = fixture();
        let mapper = CoordinateMapper::new(
            Viewport::new(1000.0, 600.0, cfg.margin),
            cfg.value_min,
            cfg.value_max,
            series.len(),
        );
        let markers = [RemMarker::new(10), RemMarker::new(40)];
        let readout = CursorReadout {
            sample_index: 3,
            sample: *series.get(3).unwrap(),
            label: "63.0".into(),
            anchor: [90.0, 190.0],
        };
        let scene = build_scene(&SceneInput {
            config: &cfg,
            mapper: &mapper,
            series: &series,
            markers: Some(&markers),
            cursor: Some((80.0, 200.0)),
            readout: Some(&readout),
        });
        assert_eq!(scene.texts().filter(|t| *t == "REM").count(), 2);
        let arcs = scene
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Arc { .. }))
            .count();
        assert_eq!(arcs, 2);
        assert!(scene.texts().any(|t| t == "63.0"));
        assert!(scene.primitives.contains(&Primitive::Line {
            from: [80.0, 50.0],
            to: [80.0, 550.0],
            style: Style::solid(1.0, CURSOR_COLOR),
        }));
    }
}

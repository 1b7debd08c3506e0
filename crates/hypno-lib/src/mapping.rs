use serde::{Deserialize, Serialize};

/// Pixel geometry of the drawing surface. `margin` is the inset reserved for
/// axis labels on every side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn plot_width(&self) -> f64 {
        (self.width - 2.0 * self.margin).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - 2.0 * self.margin).max(0.0)
    }

    pub fn left(&self) -> f64 {
        self.margin
    }

    pub fn right(&self) -> f64 {
        self.width - self.margin
    }

    pub fn top(&self) -> f64 {
        self.margin
    }

    /// y of the x axis
    pub fn bottom(&self) -> f64 {
        self.height - self.margin
    }
}

// Keeps to_sample_index(to_pixel(i).x) == i despite float error in the divide.
const INDEX_NUDGE: f64 = 1e-9;

/// Linear map between (sample index, value) and (x, y) pixels.
///
/// Pure function of the constructor arguments. Degenerate geometry falls back
/// to fixed coordinates instead of producing NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    viewport: Viewport,
    value_min: f64,
    value_max: f64,
    point_count: usize,
}

impl CoordinateMapper {
    pub fn new(viewport: Viewport, value_min: f64, value_max: f64, point_count: usize) -> Self {
        Self {
            viewport,
            value_min,
            value_max,
            point_count,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Horizontal distance between neighbouring samples, `None` when there
    /// is at most one sample.
    pub fn x_step(&self) -> Option<f64> {
        if self.point_count <= 1 {
            None
        } else {
            Some(self.viewport.plot_width() / (self.point_count - 1) as f64)
        }
    }

    pub fn to_pixel(&self, sample_index: usize, value: f64) -> (f64, f64) {
        (self.x_at(sample_index as f64), self.y_at(value))
    }

    /// x for a fractional sample position.
    pub fn x_at(&self, position: f64) -> f64 {
        match self.x_step() {
            Some(step) => self.viewport.margin + position * step,
            None => self.viewport.margin,
        }
    }

    pub fn y_at(&self, value: f64) -> f64 {
        let span = self.value_max - self.value_min;
        if span == 0.0 || !span.is_finite() {
            return self.viewport.bottom();
        }
        self.viewport.bottom() - (value - self.value_min) * self.viewport.plot_height() / span
    }

    /// Floored inverse of the x mapping. Not clamped: anything outside
    /// `0..point_count` means there is no sample under `x`.
    pub fn to_sample_index(&self, x: f64) -> i64 {
        if !x.is_finite() {
            return -1;
        }
        match self.x_step() {
            Some(step) if step > 0.0 => {
                ((x - self.viewport.margin) / step + INDEX_NUDGE).floor() as i64
            }
            _ => {
                if x >= self.viewport.left() && x <= self.viewport.right() {
                    0
                } else {
                    -1
                }
            }
        }
    }

    /// Bounds-checked [`to_sample_index`](Self::to_sample_index).
    pub fn sample_index_at(&self, x: f64) -> Option<usize> {
        let idx = self.to_sample_index(x);
        if idx >= 0 && (idx as usize) < self.point_count {
            Some(idx as usize)
        } else {
            None
        }
    }
}

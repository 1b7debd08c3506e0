use anyhow::Result;
use hypno_lib::plot::{Color as ChartColor, Point, Primitive, RenderSurface, Scene, Style};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

/// Writes each scene to a PNG file.
pub struct BitmapSurface {
    path: PathBuf,
}

impl BitmapSurface {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RenderSurface for BitmapSurface {
    fn draw(&mut self, scene: &Scene) -> Result<()> {
        let size = (scene.width.max(1.0) as u32, scene.height.max(1.0) as u32);
        let root = BitMapBackend::new(&self.path, size).into_drawing_area();
        root.fill(&rgba(scene.background))?;
        for primitive in &scene.primitives {
            match primitive {
                Primitive::Line { from, to, style } => match style.dash {
                    Some([on, off]) => {
                        for (a, b) in dash_segments(*from, *to, on as f64, off as f64) {
                            root.draw(&PathElement::new(vec![px(a), px(b)], stroke(style)))?;
                        }
                    }
                    None => root.draw(&PathElement::new(vec![px(*from), px(*to)], stroke(style)))?,
                },
                Primitive::Path {
                    points,
                    style,
                    fill,
                } => {
                    let coords: Vec<(i32, i32)> = points.iter().copied().map(px).collect();
                    if let Some(fill) = fill {
                        root.draw(&Polygon::new(coords.clone(), rgba(*fill).filled()))?;
                    }
                    if let Some(style) = style {
                        root.draw(&PathElement::new(coords, stroke(style)))?;
                    }
                }
                Primitive::Text {
                    at,
                    text,
                    size,
                    color,
                } => {
                    let font = ("sans-serif", *size as f64)
                        .into_font()
                        .color(&rgba(*color))
                        .pos(Pos::new(HPos::Left, VPos::Bottom));
                    // headless machines may lack a system font; keep the geometry
                    if let Err(err) = root.draw(&Text::new(text.clone(), px(*at), font)) {
                        log::warn!("skipping label {text:?}: {err}");
                    }
                }
                Primitive::Arc {
                    center,
                    radius,
                    fill,
                    style,
                    ..
                } => {
                    let r = radius.round().max(1.0) as i32;
                    if let Some(fill) = fill {
                        root.draw(&Circle::new(px(*center), r, rgba(*fill).filled()))?;
                    }
                    if let Some(style) = style {
                        root.draw(&Circle::new(px(*center), r, stroke(style)))?;
                    }
                }
            }
        }
        root.present()?;
        Ok(())
    }
}

fn px(p: Point) -> (i32, i32) {
    (p[0].round() as i32, p[1].round() as i32)
}

fn rgba(color: ChartColor) -> RGBAColor {
    RGBColor(color.r(), color.g(), color.b()).mix(color.opacity())
}

fn stroke(style: &Style) -> ShapeStyle {
    rgba(style.color).stroke_width(style.width.round().max(1.0) as u32)
}

/// Split `from..to` into on/off dash pieces.
fn dash_segments(from: Point, to: Point, on: f64, off: f64) -> Vec<(Point, Point)> {
    let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 || on <= 0.0 {
        return vec![(from, to)];
    }
    let (ux, uy) = (dx / len, dy / len);
    let mut out = Vec::new();
    let mut t = 0.0;
    while t < len {
        let end = (t + on).min(len);
        out.push((
            [from[0] + ux * t, from[1] + uy * t],
            [from[0] + ux * end, from[1] + uy * end],
        ));
        t = end + off.max(0.0);
    }
    out
}

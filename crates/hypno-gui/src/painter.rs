use anyhow::Result;
use egui::{Align2, Color32, FontId, Pos2, Shape, Stroke};
use hypno_lib::plot::{Color, Point, Primitive, RenderSurface, Scene, Style};

/// Paints scenes into an egui painter, offset to the allocated rect.
pub struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    origin: Pos2,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a egui::Painter, origin: Pos2) -> Self {
        Self { painter, origin }
    }

    fn pos(&self, p: Point) -> Pos2 {
        to_pos(p, self.origin)
    }
}

impl RenderSurface for EguiSurface<'_> {
    fn draw(&mut self, scene: &Scene) -> Result<()> {
        let area = egui::Rect::from_min_size(
            self.origin,
            egui::vec2(scene.width as f32, scene.height as f32),
        );
        self.painter.rect_filled(area, 0.0, color32(scene.background));

        for primitive in &scene.primitives {
            match primitive {
                Primitive::Line { from, to, style } => {
                    let ends = [self.pos(*from), self.pos(*to)];
                    match style.dash {
                        Some([on, off]) => self.painter.extend(Shape::dashed_line(
                            &ends,
                            stroke(style),
                            on,
                            off,
                        )),
                        None => {
                            self.painter.line_segment(ends, stroke(style));
                        }
                    }
                }
                Primitive::Path {
                    points,
                    style,
                    fill,
                } => {
                    let pts: Vec<Pos2> = points.iter().map(|p| self.pos(*p)).collect();
                    match fill {
                        Some(fill) => {
                            let outline = style.as_ref().map(stroke).unwrap_or(Stroke::NONE);
                            self.painter
                                .add(Shape::convex_polygon(pts, color32(*fill), outline));
                        }
                        None => {
                            if let Some(style) = style {
                                self.painter.add(Shape::line(pts, stroke(style)));
                            }
                        }
                    }
                }
                Primitive::Text {
                    at,
                    text,
                    size,
                    color,
                } => {
                    self.painter.text(
                        self.pos(*at),
                        Align2::LEFT_BOTTOM,
                        text,
                        FontId::proportional(*size),
                        color32(*color),
                    );
                }
                // markers are full discs
                Primitive::Arc {
                    center,
                    radius,
                    fill,
                    style,
                    ..
                } => {
                    let c = self.pos(*center);
                    if let Some(fill) = fill {
                        self.painter.circle_filled(c, *radius as f32, color32(*fill));
                    }
                    if let Some(style) = style {
                        self.painter.circle_stroke(c, *radius as f32, stroke(style));
                    }
                }
            }
        }
        Ok(())
    }
}

fn to_pos(p: Point, origin: Pos2) -> Pos2 {
    Pos2::new(origin.x + p[0] as f32, origin.y + p[1] as f32)
}

fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), color.a())
}

fn stroke(style: &Style) -> Stroke {
    Stroke::new(style.width, color32(style.color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_colors_map_directly() {
        assert_eq!(
            color32(Color(0xFF5FA2FF)),
            Color32::from_rgb(0xFF, 0x5F, 0xA2)
        );
        assert_eq!(color32(Color::BLACK), Color32::BLACK);
    }

    #[test]
    fn translucent_colors_keep_alpha() {
        assert_eq!(color32(Color(0x80808080)).a(), 0x80);
    }

    #[test]
    fn points_shift_by_origin() {
        assert_eq!(
            to_pos([10.0, 20.5], Pos2::new(4.0, 8.0)),
            Pos2::new(14.0, 28.5)
        );
    }

    #[test]
    fn stroke_carries_width() {
        let s = stroke(&Style::solid(2.0, Color::WHITE));
        assert_eq!(s.width, 2.0);
        assert_eq!(s.color, Color32::WHITE);
    }
}

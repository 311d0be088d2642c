//! Pixel backend built on tiny-skia

mod fonts;

pub use fonts::{FontBook, FontFace};

use std::sync::Arc;

use tiny_skia::{
    FillRule, LinearGradient, Mask, PathBuilder, Pixmap, RadialGradient, Rect, Shader, SpreadMode,
    Stroke, Transform,
};

use crate::canvas::{self, Canvas, DrawOp, FontSpec, Paint, Path2D, PathSegment, Shape, TextAlign};
use crate::color::Color;
use crate::error::{RenderError, Result};

/// [`Canvas`] that paints into an RGBA pixmap
pub struct RasterCanvas {
    pixmap: Pixmap,
    fonts: Arc<FontBook>,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, fonts: Arc<FontBook>) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Surface(format!("cannot allocate {}x{} surface", width, height))
        })?;
        Ok(Self { pixmap, fonts })
    }

    pub fn into_artifact(self) -> Artifact {
        Artifact {
            pixmap: self.pixmap,
        }
    }

    fn fill(&mut self, shape: &Shape, paint: &tiny_skia::Paint<'_>, transform: Transform) -> Result<()> {
        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
            } => {
                let rect = Rect::from_xywh(*x, *y, *width, *height).ok_or_else(|| {
                    RenderError::Draw(format!("invalid rect {}x{} at ({}, {})", width, height, x, y))
                })?;
                self.pixmap.fill_rect(rect, paint, transform, None);
            }
            Shape::Circle { center, radius } => {
                let path = PathBuilder::from_circle(center.x, center.y, *radius).ok_or_else(|| {
                    RenderError::Draw(format!("invalid circle radius {}", radius))
                })?;
                self.pixmap
                    .fill_path(&path, paint, FillRule::Winding, transform, None);
            }
            Shape::Path(path) => {
                let path = to_skia_path(path)?;
                self.pixmap
                    .fill_path(&path, paint, FillRule::Winding, transform, None);
            }
        }
        Ok(())
    }

    fn text(
        &mut self,
        text: &str,
        origin: canvas::Point,
        align: TextAlign,
        font: &FontSpec,
        paint: &tiny_skia::Paint<'_>,
    ) -> Result<()> {
        let face = self.fonts.face(&font.family).clone();
        let advance = face.measure(text, font);
        let left = match align {
            TextAlign::Left => origin.x,
            TextAlign::Center => origin.x - advance / 2.0,
            TextAlign::Right => origin.x - advance,
        };

        let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())
            .ok_or_else(|| RenderError::Surface("cannot allocate text mask".to_string()))?;
        face.rasterize(text, font, left, origin.y, &mut mask)?;

        // Limit the masked fill to the run's box; off-surface text paints nothing
        let (width, height) = (self.pixmap.width() as f32, self.pixmap.height() as f32);
        let bounds = Rect::from_ltrb(
            left.max(0.0).floor(),
            (origin.y - font.size * 1.25).max(0.0).floor(),
            (left + advance + font.size).min(width).ceil(),
            (origin.y + font.size * 0.5).min(height).ceil(),
        );
        if let Some(bounds) = bounds {
            self.pixmap
                .fill_rect(bounds, paint, Transform::identity(), Some(&mask));
        }
        Ok(())
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn draw(&mut self, op: DrawOp) -> Result<()> {
        match op {
            DrawOp::Fill {
                shape,
                paint,
                rotation,
                ..
            } => {
                let paint = to_skia_paint(&paint)?;
                let transform = match rotation {
                    Some(r) => Transform::from_rotate_at(r.radians.to_degrees(), r.pivot.x, r.pivot.y),
                    None => Transform::identity(),
                };
                self.fill(&shape, &paint, transform)
            }
            DrawOp::Stroke {
                path, paint, width, ..
            } => {
                let paint = to_skia_paint(&paint)?;
                let path = to_skia_path(&path)?;
                let stroke = Stroke {
                    width,
                    ..Stroke::default()
                };
                self.pixmap
                    .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
                Ok(())
            }
            DrawOp::Text {
                text,
                origin,
                align,
                font,
                paint,
                ..
            } => {
                let paint = to_skia_paint(&paint)?;
                self.text(&text, origin, align, &font, &paint)
            }
        }
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> Result<f32> {
        let width = self.fonts.face(&font.family).measure(text, font);
        if width.is_finite() {
            Ok(width)
        } else {
            Err(RenderError::Measure(format!("non-finite width for {:?}", text)))
        }
    }
}

fn to_skia_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.alpha_u8())
}

fn to_skia_point(point: canvas::Point) -> tiny_skia::Point {
    tiny_skia::Point::from_xy(point.x, point.y)
}

fn to_skia_stops(stops: &[canvas::GradientStop]) -> Vec<tiny_skia::GradientStop> {
    stops
        .iter()
        .map(|s| tiny_skia::GradientStop::new(s.offset, to_skia_color(s.color)))
        .collect()
}

fn to_skia_paint(paint: &Paint) -> Result<tiny_skia::Paint<'static>> {
    let shader = match paint {
        Paint::Solid(color) => Shader::SolidColor(to_skia_color(*color)),
        Paint::LinearGradient { start, end, stops } => LinearGradient::new(
            to_skia_point(*start),
            to_skia_point(*end),
            to_skia_stops(stops),
            SpreadMode::Pad,
            Transform::identity(),
        )
        .ok_or_else(|| RenderError::Draw("invalid linear gradient".to_string()))?,
        Paint::RadialGradient {
            center,
            radius,
            stops,
        } => RadialGradient::new(
            to_skia_point(*center),
            to_skia_point(*center),
            *radius,
            to_skia_stops(stops),
            SpreadMode::Pad,
            Transform::identity(),
        )
        .ok_or_else(|| RenderError::Draw("invalid radial gradient".to_string()))?,
    };

    Ok(tiny_skia::Paint {
        shader,
        anti_alias: true,
        ..tiny_skia::Paint::default()
    })
}

fn to_skia_path(path: &Path2D) -> Result<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for segment in path.segments() {
        match *segment {
            PathSegment::MoveTo(p) => builder.move_to(p.x, p.y),
            PathSegment::LineTo(p) => builder.line_to(p.x, p.y),
            PathSegment::CubicTo(c1, c2, end) => {
                builder.cubic_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y)
            }
            PathSegment::Close => builder.close(),
        }
    }
    builder
        .finish()
        .ok_or_else(|| RenderError::Draw("empty or degenerate path".to_string()))
}

/// Finished raster image
pub struct Artifact {
    pixmap: Pixmap,
}

impl Artifact {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight RGBA at (`x`, `y`), `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        // Pixmap::pixel only checks the flat index, so x past the edge would wrap
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// True when every pixel has full alpha
    pub fn is_opaque(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == u8::MAX)
    }

    /// Premultiplied RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{FontWeight, GradientStop, Layer, Point, Rotation};

    fn canvas(size: u32) -> RasterCanvas {
        RasterCanvas::new(size, size, Arc::new(FontBook::builtin())).unwrap()
    }

    fn background(size: f32, color: Color) -> DrawOp {
        DrawOp::Fill {
            layer: Layer::Background,
            shape: Shape::Rect {
                x: 0.0,
                y: 0.0,
                width: size,
                height: size,
            },
            paint: Paint::Solid(color),
            rotation: None,
        }
    }

    #[test]
    fn test_zero_size_surface_rejected() {
        let result = RasterCanvas::new(0, 10, Arc::new(FontBook::builtin()));
        assert!(matches!(result, Err(RenderError::Surface(_))));
    }

    #[test]
    fn test_solid_fill_opaque() {
        let mut c = canvas(16);
        c.draw(background(16.0, Color::rgb(10, 20, 30))).unwrap();
        let artifact = c.into_artifact();
        assert!(artifact.is_opaque());
        assert_eq!(artifact.pixel(3, 3), Some([10, 20, 30, 255]));
        assert_eq!(artifact.pixel(16, 0), None);
        assert_eq!(artifact.pixel(17, 3), None);
        assert_eq!(artifact.pixel(0, 16), None);
        assert_eq!(artifact.pixel(15, 15), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_untouched_surface_transparent() {
        let artifact = canvas(8).into_artifact();
        assert!(!artifact.is_opaque());
    }

    #[test]
    fn test_text_changes_pixels() {
        let mut c = canvas(64);
        c.draw(background(64.0, Color::BLACK)).unwrap();
        c.draw(DrawOp::Text {
            layer: Layer::Content,
            text: "W".to_string(),
            origin: Point::new(32.0, 40.0),
            align: TextAlign::Center,
            font: FontSpec::new("sans", 32.0, FontWeight::Bold),
            paint: Paint::Solid(Color::WHITE),
        })
        .unwrap();
        let artifact = c.into_artifact();
        let lit = (0..64)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .filter(|&(x, y)| artifact.pixel(x, y).map(|p| p[0] > 128).unwrap_or(false))
            .count();
        assert!(lit > 0);
        assert!(artifact.is_opaque());
    }

    #[test]
    fn test_gradients_and_rotation() {
        let mut c = canvas(32);
        c.draw(DrawOp::Fill {
            layer: Layer::Background,
            shape: Shape::Rect {
                x: 0.0,
                y: 0.0,
                width: 32.0,
                height: 32.0,
            },
            paint: Paint::LinearGradient {
                start: Point::new(0.0, 0.0),
                end: Point::new(0.0, 32.0),
                stops: vec![
                    GradientStop::new(0.0, Color::BLACK),
                    GradientStop::new(1.0, Color::WHITE),
                ],
            },
            rotation: None,
        })
        .unwrap();
        c.draw(DrawOp::Fill {
            layer: Layer::Decoration,
            shape: Shape::Path(Path2D::polygon(&[
                Point::new(8.0, 8.0),
                Point::new(24.0, 8.0),
                Point::new(16.0, 24.0),
            ])),
            paint: Paint::RadialGradient {
                center: Point::new(16.0, 16.0),
                radius: 12.0,
                stops: vec![
                    GradientStop::new(0.0, Color::WHITE.with_alpha(0.5)),
                    GradientStop::new(1.0, Color::BLACK.with_alpha(0.0)),
                ],
            },
            rotation: Some(Rotation {
                pivot: Point::new(16.0, 16.0),
                radians: 0.5,
            }),
        })
        .unwrap();
        let artifact = c.into_artifact();
        assert!(artifact.is_opaque());
        let top = artifact.pixel(1, 0).unwrap()[0];
        let bottom = artifact.pixel(1, 31).unwrap()[0];
        assert!(top < bottom);
    }

    #[test]
    fn test_empty_path_is_error() {
        let mut c = canvas(8);
        let result = c.draw(DrawOp::Stroke {
            layer: Layer::Decoration,
            path: Path2D::new(),
            paint: Paint::Solid(Color::WHITE),
            width: 1.0,
        });
        assert!(matches!(result, Err(RenderError::Draw(_))));
    }

    #[test]
    fn test_png_signature() {
        let mut c = canvas(4);
        c.draw(background(4.0, Color::WHITE)).unwrap();
        let png = c.into_artifact().to_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}

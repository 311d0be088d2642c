//! Backend-agnostic drawing surface
//!
//! Renderers describe a frame as an ordered list of [`DrawOp`]s submitted to
//! a [`Canvas`]. Operations are painted in submission order; later ones land
//! on top. Each op carries the [`Layer`] it belongs to so the ordering of
//! background, decoration, content and branding can be checked.

use crate::color::Color;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, 0.0 to 1.0
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Fill or stroke source
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        center: Point,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// Path description in canvas coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path2D {
    segments: Vec<PathSegment>,
}

impl Path2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.segments.push(PathSegment::MoveTo(Point::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.segments.push(PathSegment::LineTo(Point::new(x, y)));
        self
    }

    pub fn cubic_to(mut self, c1: Point, c2: Point, end: Point) -> Self {
        self.segments.push(PathSegment::CubicTo(c1, c2, end));
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(PathSegment::Close);
        self
    }

    /// Closed polygon through `points`
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new();
        for (i, p) in points.iter().enumerate() {
            path = if i == 0 {
                path.move_to(p.x, p.y)
            } else {
                path.line_to(p.x, p.y)
            };
        }
        path.close()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Circle {
        center: Point,
        radius: f32,
    },
    Path(Path2D),
}

/// Rotation of a shape about a pivot point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub pivot: Point,
    pub radians: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Origin is the left end of the baseline
    Left,
    /// Origin is the middle of the baseline
    Center,
    /// Origin is the right end of the baseline
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    /// Em size in pixels
    pub size: f32,
    pub weight: FontWeight,
}

impl FontSpec {
    pub fn new(family: &str, size: f32, weight: FontWeight) -> Self {
        Self {
            family: family.to_string(),
            size,
            weight,
        }
    }
}

/// Painter's-order groups of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Decoration,
    Content,
    Branding,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill {
        layer: Layer,
        shape: Shape,
        paint: Paint,
        rotation: Option<Rotation>,
    },
    Stroke {
        layer: Layer,
        path: Path2D,
        paint: Paint,
        width: f32,
    },
    Text {
        layer: Layer,
        text: String,
        /// Baseline anchor, interpreted per `align`
        origin: Point,
        align: TextAlign,
        font: FontSpec,
        paint: Paint,
    },
}

impl DrawOp {
    pub fn layer(&self) -> Layer {
        match self {
            DrawOp::Fill { layer, .. } | DrawOp::Stroke { layer, .. } | DrawOp::Text { layer, .. } => {
                *layer
            }
        }
    }
}

/// 2D drawing context
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Paint one operation on top of everything drawn so far
    fn draw(&mut self, op: DrawOp) -> Result<()>;

    /// Advance width of `text` in pixels when drawn with `font`
    fn measure_text(&self, text: &str, font: &FontSpec) -> Result<f32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_path_closed() {
        let path = Path2D::polygon(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 8.0),
        ]);
        let segments = path.segments();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], PathSegment::MoveTo(Point::new(0.0, 0.0)));
        assert_eq!(segments[3], PathSegment::Close);
    }

    #[test]
    fn test_layer_order() {
        assert!(Layer::Background < Layer::Decoration);
        assert!(Layer::Decoration < Layer::Content);
        assert!(Layer::Content < Layer::Branding);
    }
}

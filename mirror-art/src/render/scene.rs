//! Per-render state shared by the tone routines

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::analysis::{AnalysisResult, LayoutHint};
use crate::canvas::{Canvas, DrawOp, FontSpec, Layer, Paint, Point, Shape, TextAlign};
use crate::color::{add_alpha, Color};
use crate::error::Result;
use crate::tone::{DefaultPalette, Tone};
use crate::wrap::wrap_on_canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Primary,
    Secondary,
    Accent,
    Background,
}

impl Role {
    fn as_str(&self) -> &'static str {
        match self {
            Role::Primary => "primary",
            Role::Secondary => "secondary",
            Role::Accent => "accent",
            Role::Background => "background",
        }
    }
}

pub(crate) struct Scene {
    pub width: f32,
    pub height: f32,
    pub family: String,
    pub layout: LayoutHint,
    pub sentences: Vec<String>,
    pub rng: StdRng,
    defaults: DefaultPalette,
    primary: Option<String>,
    secondary: Option<String>,
    accent: Option<String>,
    background: Option<String>,
}

impl Scene {
    pub fn new(tone: Tone, analysis: &AnalysisResult, width: u32, height: u32) -> Self {
        let palette = &analysis.color_palette;
        Self {
            width: width as f32,
            height: height as f32,
            family: analysis.font_family(tone),
            layout: analysis.layout_hint(),
            sentences: analysis.selected_sentences.clone(),
            rng: StdRng::seed_from_u64(analysis.decoration_seed()),
            defaults: tone.default_palette(),
            primary: usable(Role::Primary, palette.primary.as_deref()),
            secondary: usable(Role::Secondary, palette.secondary.as_deref()),
            accent: usable(Role::Accent, palette.accent.as_deref()),
            background: usable(Role::Background, palette.background.as_deref()),
        }
    }

    /// Palette color for `role` at `alpha`
    ///
    /// Hex entries take the alpha; other CSS forms are used as given.
    /// Missing or unparseable entries use the tone default.
    pub fn color(&self, role: Role, alpha: f32) -> Color {
        let (raw, fallback) = match role {
            Role::Primary => (&self.primary, self.defaults.primary),
            Role::Secondary => (&self.secondary, self.defaults.secondary),
            Role::Accent => (&self.accent, self.defaults.accent),
            Role::Background => (&self.background, self.defaults.background),
        };
        raw.as_deref()
            .and_then(|raw| Color::parse(&add_alpha(raw, alpha)))
            .unwrap_or_else(|| fallback.with_alpha(alpha))
    }

    /// Opaque full-surface fill in the background color
    pub fn paint_base(&self, canvas: &mut dyn Canvas) -> Result<()> {
        canvas.draw(DrawOp::Fill {
            layer: Layer::Background,
            shape: self.full_rect(),
            paint: Paint::Solid(self.color(Role::Background, 1.0).with_alpha(1.0)),
            rotation: None,
        })
    }

    /// Full-surface fill with `paint` on the background layer
    pub fn paint_overlay(&self, canvas: &mut dyn Canvas, paint: Paint) -> Result<()> {
        canvas.draw(DrawOp::Fill {
            layer: Layer::Background,
            shape: self.full_rect(),
            paint,
            rotation: None,
        })
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn text_paint(&self) -> Paint {
        Paint::Solid(self.color(Role::Accent, 0.95))
    }

    fn full_rect(&self) -> Shape {
        Shape::Rect {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        }
    }

    /// Horizontal anchor honoring the layout hint
    pub fn anchor(&self, x: f32, align: TextAlign) -> (f32, TextAlign) {
        match self.layout {
            LayoutHint::Centered => (self.width / 2.0, TextAlign::Center),
            LayoutHint::Native => (x, align),
        }
    }
}

fn usable(role: Role, raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if Color::parse(&add_alpha(raw, 1.0)).is_some() {
        Some(raw.to_string())
    } else {
        warn!(
            "Unusable {} palette color '{}', using tone default",
            role.as_str(),
            raw
        );
        None
    }
}

/// Font and line metrics for one block of sentence text
#[derive(Debug, Clone)]
pub(crate) struct TextStyle {
    pub font: FontSpec,
    pub line_height: f32,
    pub max_width: f32,
}

impl TextStyle {
    /// Baseline for a line box whose top edge is at `top`
    pub fn baseline(&self, top: f32) -> f32 {
        top + (self.line_height + 0.7 * self.font.size) / 2.0
    }

    pub fn wrap(&self, canvas: &dyn Canvas, text: &str) -> Result<Vec<String>> {
        wrap_on_canvas(canvas, text, self.max_width, &self.font)
    }

    pub fn block_height(&self, lines: usize) -> f32 {
        lines as f32 * self.line_height
    }

    /// Draw `lines` as stacked line boxes starting at `top`
    ///
    /// Returns the bottom edge of the block.
    pub fn draw_lines(
        &self,
        canvas: &mut dyn Canvas,
        lines: &[String],
        x: f32,
        top: f32,
        align: TextAlign,
        paint: &Paint,
    ) -> Result<f32> {
        let mut line_top = top;
        for line in lines {
            canvas.draw(DrawOp::Text {
                layer: Layer::Content,
                text: line.clone(),
                origin: Point::new(x, self.baseline(line_top)),
                align,
                font: self.font.clone(),
                paint: paint.clone(),
            })?;
            line_top += self.line_height;
        }
        Ok(line_top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ColorPalette;

    #[test]
    fn test_palette_hex_takes_alpha() {
        let analysis = AnalysisResult::new("fusion", ["a", "b", "c"]).with_palette(ColorPalette {
            primary: Some("#102030".to_string()),
            ..ColorPalette::default()
        });
        let scene = Scene::new(Tone::Fusion, &analysis, 100, 100);
        let color = scene.color(Role::Primary, 0.5);
        assert_eq!((color.r, color.g, color.b), (0x10, 0x20, 0x30));
        assert!((color.a - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_palette_garbage_falls_back() {
        let analysis = AnalysisResult::new("gentle", ["a", "b", "c"]).with_palette(ColorPalette {
            background: Some("not-a-hex".to_string()),
            ..ColorPalette::default()
        });
        let scene = Scene::new(Tone::Gentle, &analysis, 100, 100);
        let expected = Tone::Gentle.default_palette().background;
        assert_eq!(scene.color(Role::Background, 1.0), expected);
    }

    #[test]
    fn test_non_hex_color_used_as_given() {
        let analysis = AnalysisResult::new("intense", ["a", "b", "c"]).with_palette(ColorPalette {
            accent: Some("rgb(1, 2, 3)".to_string()),
            ..ColorPalette::default()
        });
        let scene = Scene::new(Tone::Intense, &analysis, 100, 100);
        assert_eq!(scene.color(Role::Accent, 0.2), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_centered_hint_overrides_anchor() {
        let mut analysis = AnalysisResult::new("intense", ["a", "b", "c"]);
        let scene = Scene::new(Tone::Intense, &analysis, 200, 200);
        assert_eq!(scene.anchor(20.0, TextAlign::Left), (20.0, TextAlign::Left));

        analysis.layout = Some("centered".to_string());
        let scene = Scene::new(Tone::Intense, &analysis, 200, 200);
        assert_eq!(scene.anchor(20.0, TextAlign::Left), (100.0, TextAlign::Center));
    }
}

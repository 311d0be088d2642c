//! Gentle: vertical wash, starfield, centered stack

use rand::Rng;

use crate::canvas::{Canvas, DrawOp, FontSpec, FontWeight, GradientStop, Layer, Paint, Point, Shape, TextAlign};
use crate::error::Result;

use super::scene::{Role, Scene, TextStyle};

pub(crate) const STAR_COUNT: usize = 20;
const FONT_SIZE: f32 = 40.0;
const LINE_HEIGHT: f32 = 1.6;

pub(crate) fn draw(canvas: &mut dyn Canvas, scene: &mut Scene) -> Result<()> {
    scene.paint_base(canvas)?;
    scene.paint_overlay(
        canvas,
        Paint::LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(0.0, scene.height),
            stops: vec![
                GradientStop::new(0.0, scene.color(Role::Background, 1.0)),
                GradientStop::new(1.0, scene.color(Role::Primary, 0.35)),
            ],
        },
    )?;

    for _ in 0..STAR_COUNT {
        let center = Point::new(
            scene.rng.gen_range(0.0..scene.width),
            scene.rng.gen_range(0.0..scene.height),
        );
        let radius = scene.rng.gen_range(1.0f32..3.0);
        let alpha = scene.rng.gen_range(0.3f32..0.9);
        canvas.draw(DrawOp::Fill {
            layer: Layer::Decoration,
            shape: Shape::Circle { center, radius },
            paint: Paint::Solid(scene.color(Role::Accent, alpha)),
            rotation: None,
        })?;
    }

    sentences(canvas, scene)
}

/// All sentences as one stack, vertically centered on the surface
fn sentences(canvas: &mut dyn Canvas, scene: &Scene) -> Result<()> {
    let style = TextStyle {
        font: FontSpec::new(&scene.family, FONT_SIZE, FontWeight::Regular),
        line_height: FONT_SIZE * LINE_HEIGHT,
        max_width: scene.width * 0.74,
    };
    let paint = scene.text_paint();
    let gap = style.line_height * 0.4;

    let blocks = scene
        .sentences
        .iter()
        .map(|s| style.wrap(&*canvas, s))
        .collect::<Result<Vec<_>>>()?;

    let line_count: usize = blocks.iter().map(Vec::len).sum();
    let gaps = blocks.len().saturating_sub(1) as f32 * gap;
    let stack_height = style.block_height(line_count) + gaps;

    let mut top = scene.height / 2.0 - stack_height / 2.0;
    for lines in &blocks {
        top = style.draw_lines(canvas, lines, scene.width / 2.0, top, TextAlign::Center, &paint)? + gap;
    }
    Ok(())
}

//! Intense: diagonal gradient, rotated polygons, anchored blocks

use std::f32::consts::TAU;

use rand::Rng;

use crate::canvas::{
    Canvas, DrawOp, FontSpec, FontWeight, GradientStop, Layer, Paint, Path2D, Point, Rotation,
    Shape, TextAlign,
};
use crate::error::Result;

use super::scene::{Role, Scene, TextStyle};

const POLYGON_COUNT: usize = 12;
const FONT_SIZE: f32 = 46.0;
const LINE_HEIGHT: f32 = 1.35;

/// Sentence anchor: x and top as fractions of the surface, max width
/// as a fraction of the width
struct Anchor {
    x: f32,
    top: f32,
    max_width: f32,
    align: TextAlign,
}

const ANCHORS: [Anchor; 3] = [
    Anchor {
        x: 0.08,
        top: 0.18,
        max_width: 0.5,
        align: TextAlign::Left,
    },
    Anchor {
        x: 0.92,
        top: 0.42,
        max_width: 0.5,
        align: TextAlign::Right,
    },
    Anchor {
        x: 0.5,
        top: 0.68,
        max_width: 0.84,
        align: TextAlign::Center,
    },
];

pub(crate) fn draw(canvas: &mut dyn Canvas, scene: &mut Scene) -> Result<()> {
    scene.paint_base(canvas)?;
    scene.paint_overlay(
        canvas,
        Paint::LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(scene.width, scene.height),
            stops: vec![
                GradientStop::new(0.0, scene.color(Role::Primary, 0.55)),
                GradientStop::new(0.5, scene.color(Role::Secondary, 0.35)),
                GradientStop::new(1.0, scene.color(Role::Background, 1.0)),
            ],
        },
    )?;

    polygons(canvas, scene)?;
    sentences(canvas, scene)
}

fn polygons(canvas: &mut dyn Canvas, scene: &mut Scene) -> Result<()> {
    for i in 0..POLYGON_COUNT {
        let sides: usize = scene.rng.gen_range(3..=6);
        let radius: f32 = scene.rng.gen_range(40.0..160.0);
        let center = Point::new(
            scene.rng.gen_range(0.0..scene.width),
            scene.rng.gen_range(0.0..scene.height),
        );
        let radians = scene.rng.gen_range(0.0..TAU);
        let alpha = scene.rng.gen_range(0.08f32..0.3);

        let points: Vec<Point> = (0..sides)
            .map(|k| {
                let angle = TAU * k as f32 / sides as f32;
                Point::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            })
            .collect();
        let role = if i % 2 == 0 { Role::Primary } else { Role::Accent };

        canvas.draw(DrawOp::Fill {
            layer: Layer::Decoration,
            shape: Shape::Path(Path2D::polygon(&points)),
            paint: Paint::Solid(scene.color(role, alpha)),
            rotation: Some(Rotation {
                pivot: center,
                radians,
            }),
        })?;
    }
    Ok(())
}

fn sentences(canvas: &mut dyn Canvas, scene: &Scene) -> Result<()> {
    let paint = scene.text_paint();

    for (sentence, anchor) in scene.sentences.iter().zip(&ANCHORS) {
        let style = TextStyle {
            font: FontSpec::new(&scene.family, FONT_SIZE, FontWeight::Bold),
            line_height: FONT_SIZE * LINE_HEIGHT,
            max_width: scene.width * anchor.max_width,
        };
        let lines = style.wrap(canvas, sentence)?;
        let (x, align) = scene.anchor(scene.width * anchor.x, anchor.align);
        style.draw_lines(canvas, &lines, x, scene.height * anchor.top, align, &paint)?;
    }
    Ok(())
}

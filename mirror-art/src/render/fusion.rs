//! Fusion: radial glow, organic flows, offset columns

use rand::Rng;

use crate::canvas::{
    Canvas, DrawOp, FontSpec, FontWeight, GradientStop, Layer, Paint, Path2D, Point, Shape,
    TextAlign,
};
use crate::error::Result;

use super::scene::{Role, Scene, TextStyle};

const FLOW_COUNT: usize = 6;
const FONT_SIZE: f32 = 44.0;
const LINE_HEIGHT: f32 = 1.45;
/// Left edge of each sentence column, as a fraction of the width
const COLUMNS: [f32; 3] = [0.10, 0.28, 0.18];

pub(crate) fn draw(canvas: &mut dyn Canvas, scene: &mut Scene) -> Result<()> {
    background(canvas, scene)?;
    flows(canvas, scene)?;
    sentences(canvas, scene)
}

fn background(canvas: &mut dyn Canvas, scene: &Scene) -> Result<()> {
    scene.paint_base(canvas)?;
    scene.paint_overlay(
        canvas,
        Paint::RadialGradient {
            center: scene.center(),
            radius: scene.width * 0.75,
            stops: vec![
                GradientStop::new(0.0, scene.color(Role::Primary, 0.45)),
                GradientStop::new(0.55, scene.color(Role::Secondary, 0.2)),
                GradientStop::new(1.0, scene.color(Role::Background, 1.0)),
            ],
        },
    )
}

fn flows(canvas: &mut dyn Canvas, scene: &mut Scene) -> Result<()> {
    let (w, h) = (scene.width, scene.height);

    for i in 0..FLOW_COUNT {
        let y = h * (0.15 + 0.13 * i as f32) + scene.rng.gen_range(-20.0f32..20.0);
        let path = Path2D::new().move_to(-50.0, y).cubic_to(
            Point::new(w * 0.3, y + scene.rng.gen_range(-160.0f32..160.0)),
            Point::new(w * 0.7, y + scene.rng.gen_range(-160.0f32..160.0)),
            Point::new(w + 50.0, y + scene.rng.gen_range(-80.0f32..80.0)),
        );
        let color = if i % 2 == 0 {
            scene.color(Role::Accent, 0.18)
        } else {
            scene.color(Role::Secondary, 0.22)
        };
        canvas.draw(DrawOp::Stroke {
            layer: Layer::Decoration,
            path,
            paint: Paint::Solid(color),
            width: 2.0 + 0.75 * i as f32,
        })?;
    }

    let wave = Path2D::new()
        .move_to(0.0, h * 0.78)
        .cubic_to(
            Point::new(w * 0.33, h * 0.70),
            Point::new(w * 0.66, h * 0.88),
            Point::new(w, h * 0.80),
        )
        .line_to(w, h)
        .line_to(0.0, h)
        .close();
    canvas.draw(DrawOp::Fill {
        layer: Layer::Decoration,
        shape: Shape::Path(wave),
        paint: Paint::Solid(scene.color(Role::Primary, 0.12)),
        rotation: None,
    })
}

fn sentences(canvas: &mut dyn Canvas, scene: &Scene) -> Result<()> {
    let style = TextStyle {
        font: FontSpec::new(&scene.family, FONT_SIZE, FontWeight::Regular),
        line_height: FONT_SIZE * LINE_HEIGHT,
        max_width: scene.width * 0.62,
    };
    let paint = scene.text_paint();
    let gap = style.line_height * 0.5;

    let mut top = scene.height * 0.2;
    for (sentence, column) in scene.sentences.iter().zip(COLUMNS) {
        let lines = style.wrap(canvas, sentence)?;
        let (x, align) = scene.anchor(scene.width * column, TextAlign::Left);
        top = style.draw_lines(canvas, &lines, x, top, align, &paint)? + gap;
    }
    Ok(())
}

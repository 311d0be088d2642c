//! Branding footer, drawn after everything else

use crate::canvas::{Canvas, DrawOp, FontSpec, FontWeight, Layer, Paint, Point, Shape, TextAlign};
use crate::color::Color;
use crate::error::Result;

use super::scene::{Role, Scene};

pub const FOOTER_MARK: &str = "Mirror of Dreams";

/// Footer baseline distance from the bottom edge
pub const FOOTER_OFFSET: f32 = 56.0;

const FONT_SIZE: f32 = 26.0;
const ICON_RADIUS: f32 = 12.0;
const ICON_GAP: f32 = 10.0;

/// Crescent icon followed by the site mark, centered as one group
pub(crate) fn draw(canvas: &mut dyn Canvas, scene: &Scene) -> Result<()> {
    let font = FontSpec::new(&scene.family, FONT_SIZE, FontWeight::Regular);
    let baseline = scene.height - FOOTER_OFFSET;
    let text_width = canvas.measure_text(FOOTER_MARK, &font)?;

    let group_width = ICON_RADIUS * 2.0 + ICON_GAP + text_width;
    let left = (scene.width - group_width) / 2.0;
    let icon_center = Point::new(left + ICON_RADIUS, baseline - FONT_SIZE * 0.35);

    canvas.draw(DrawOp::Fill {
        layer: Layer::Branding,
        shape: Shape::Circle {
            center: icon_center,
            radius: ICON_RADIUS,
        },
        paint: Paint::Solid(scene.color(Role::Accent, 0.9)),
        rotation: None,
    })?;
    canvas.draw(DrawOp::Fill {
        layer: Layer::Branding,
        shape: Shape::Circle {
            center: Point::new(icon_center.x + 5.0, icon_center.y - 4.0),
            radius: 7.0,
        },
        paint: Paint::Solid(scene.color(Role::Background, 1.0).with_alpha(1.0)),
        rotation: None,
    })?;

    canvas.draw(DrawOp::Text {
        layer: Layer::Branding,
        text: FOOTER_MARK.to_string(),
        origin: Point::new(left + ICON_RADIUS * 2.0 + ICON_GAP, baseline),
        align: TextAlign::Left,
        font,
        paint: Paint::Solid(Color::WHITE.with_alpha(0.75)),
    })
}

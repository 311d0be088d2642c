//! Canvas that records operations instead of painting them

use crate::canvas::{Canvas, DrawOp, FontSpec, FontWeight, Layer};
use crate::error::Result;

/// In-memory [`Canvas`] keeping every submitted [`DrawOp`] in order
///
/// Text is measured with a fixed per-character advance so layout is
/// deterministic without font data.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Operations on one layer, in submission order
    pub fn ops_in(&self, layer: Layer) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(move |op| op.layer() == layer)
    }

    /// Text strings drawn on `layer`, in submission order
    pub fn texts_in(&self, layer: Layer) -> Vec<&str> {
        self.ops_in(layer)
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Advance per character as a fraction of the font size
    pub fn char_advance(font: &FontSpec) -> f32 {
        match font.weight {
            FontWeight::Regular => font.size * 0.5,
            FontWeight::Bold => font.size * 0.55,
        }
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw(&mut self, op: DrawOp) -> Result<()> {
        self.ops.push(op);
        Ok(())
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> Result<f32> {
        Ok(text.chars().count() as f32 * Self::char_advance(font))
    }
}

//! Font faces for the raster backend
//!
//! A [`FontBook`] maps family names (`sans`, `serif`, `mono`, ...) to faces.
//! Unmapped families use the default face. Without any font file the default
//! is the embedded 8×8 bitmap face, so rendering never depends on the host
//! having fonts installed.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use font8x8::UnicodeFonts;
use tiny_skia::{FillRule, Mask, PathBuilder, Rect, Transform};
use tracing::{debug, info};

use crate::canvas::{FontSpec, FontWeight};
use crate::error::{RenderError, Result};

/// Bitmap face advance as a fraction of the em size
const BITMAP_ADVANCE: f32 = 0.6;

/// Horizontal smear applied for bold, as a fraction of the em size
const FAUX_BOLD_OFFSET: f32 = 0.03;

#[derive(Clone)]
pub enum FontFace {
    /// Embedded 8×8 bitmap glyphs (Basic Latin and Latin-1)
    Builtin,
    /// Outline font loaded from TrueType/OpenType data
    Outline(Arc<FontVec>),
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontFace::Builtin => f.write_str("FontFace::Builtin"),
            FontFace::Outline(font) => write!(f, "FontFace::Outline({} glyphs)", font.glyph_count()),
        }
    }
}

impl FontFace {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(FontFace::Outline(Arc::new(font)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data)
            .map_err(|e| RenderError::Font(format!("{}: {}", path.display(), e)))?;
        Ok(FontFace::Outline(Arc::new(font)))
    }

    /// Advance width of `text` in pixels
    pub fn measure(&self, text: &str, font: &FontSpec) -> f32 {
        let width = match self {
            FontFace::Builtin => text.chars().count() as f32 * font.size * BITMAP_ADVANCE,
            FontFace::Outline(face) => {
                let scaled = face.as_scaled(PxScale::from(font.size));
                let mut width = 0.0;
                let mut previous = None;
                for c in text.chars() {
                    let id = scaled.glyph_id(c);
                    if let Some(prev) = previous {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    previous = Some(id);
                }
                width
            }
        };

        match font.weight {
            FontWeight::Bold if !text.is_empty() => width + font.size * FAUX_BOLD_OFFSET,
            _ => width,
        }
    }

    /// Accumulate glyph coverage for `text` into `mask`
    ///
    /// `left` is the start of the run and `baseline` its baseline, both in
    /// mask pixels.
    pub fn rasterize(
        &self,
        text: &str,
        font: &FontSpec,
        left: f32,
        baseline: f32,
        mask: &mut Mask,
    ) -> Result<()> {
        let passes: &[f32] = match font.weight {
            FontWeight::Regular => &[0.0],
            FontWeight::Bold => &[0.0, FAUX_BOLD_OFFSET],
        };

        for offset in passes {
            let x = left + offset * font.size;
            match self {
                FontFace::Builtin => rasterize_bitmap(text, font.size, x, baseline, mask)?,
                FontFace::Outline(face) => rasterize_outline(face, text, font.size, x, baseline, mask),
            }
        }
        Ok(())
    }
}

fn bitmap_glyph(c: char) -> [u8; 8] {
    let c = match c {
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        '\u{2026}' => '.',
        other => other,
    };
    font8x8::BASIC_FONTS
        .get(c)
        .or_else(|| font8x8::LATIN_FONTS.get(c))
        .or_else(|| font8x8::BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn rasterize_bitmap(text: &str, size: f32, left: f32, baseline: f32, mask: &mut Mask) -> Result<()> {
    // 8 cells span one advance; row 7 is the descender row
    let cell = size * BITMAP_ADVANCE / 8.0;
    let top = baseline - 7.0 * cell;

    let mut builder = PathBuilder::new();
    for (i, c) in text.chars().enumerate() {
        let glyph_left = left + i as f32 * size * BITMAP_ADVANCE;
        for (row, bits) in bitmap_glyph(c).iter().enumerate() {
            for col in 0..8 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                if let Some(rect) = Rect::from_xywh(
                    glyph_left + col as f32 * cell,
                    top + row as f32 * cell,
                    cell,
                    cell,
                ) {
                    builder.push_rect(rect);
                }
            }
        }
    }

    // Whitespace-only text has no path
    if let Some(path) = builder.finish() {
        mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    }
    Ok(())
}

fn rasterize_outline(face: &FontVec, text: &str, size: f32, left: f32, baseline: f32, mask: &mut Mask) {
    let scale = PxScale::from(size);
    let scaled = face.as_scaled(scale);
    let width = mask.width() as i32;
    let height = mask.height() as i32;

    let mut caret = left;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = face.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        let data = mask.data_mut();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i32 + gx as i32;
            let y = bounds.min.y as i32 + gy as i32;
            if x < 0 || y < 0 || x >= width || y >= height {
                return;
            }
            let idx = (y * width + x) as usize;
            let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            data[idx] = data[idx].max(value);
        });
    }
}

/// Family name to face mapping
#[derive(Debug, Clone)]
pub struct FontBook {
    default: FontFace,
    families: HashMap<String, FontFace>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontBook {
    /// Book with only the embedded bitmap face
    pub fn builtin() -> Self {
        Self {
            default: FontFace::Builtin,
            families: HashMap::new(),
        }
    }

    /// Book whose default face is loaded from `path`
    pub fn from_file(path: &Path) -> Result<Self> {
        let face = FontFace::from_file(path)?;
        info!("Loaded font: {}", path.display());
        Ok(Self {
            default: face,
            families: HashMap::new(),
        })
    }

    pub fn insert_family(&mut self, family: &str, face: FontFace) {
        debug!("Registered font family: {}", family);
        self.families.insert(family.to_lowercase(), face);
    }

    /// Face for `family`, or the default face
    pub fn face(&self, family: &str) -> &FontFace {
        self.families
            .get(&family.to_lowercase())
            .unwrap_or(&self.default)
    }
}

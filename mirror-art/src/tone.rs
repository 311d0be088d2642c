//! Tones and their default palettes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::Color;

/// Stylistic category driving both phrasing and visual rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Balanced blend: radial glow, organic flows, offset columns
    Fusion,
    /// Soft: vertical gradient, starfield, centered stack
    Gentle,
    /// Bold: diagonal gradient, rotated polygons, anchored blocks
    Intense,
}

/// Default colors for one tone, used when the palette omits or garbles a role
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultPalette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
}

impl Tone {
    /// Parse a tone name; `None` for anything unrecognized
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "fusion" => Some(Tone::Fusion),
            "gentle" => Some(Tone::Gentle),
            "intense" => Some(Tone::Intense),
            _ => None,
        }
    }

    /// Parse a tone name, falling back to [`Tone::Fusion`]
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Tone::Fusion)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Fusion => "fusion",
            Tone::Gentle => "gentle",
            Tone::Intense => "intense",
        }
    }

    pub fn all_variants() -> &'static [Tone] {
        &[Tone::Fusion, Tone::Gentle, Tone::Intense]
    }

    pub fn default_palette(&self) -> DefaultPalette {
        match self {
            Tone::Fusion => DefaultPalette {
                primary: Color::rgb(0x8B, 0x5C, 0xF6),
                secondary: Color::rgb(0xEC, 0x48, 0x99),
                accent: Color::rgb(0xFB, 0xBF, 0x24),
                background: Color::rgb(0x1E, 0x1B, 0x4B),
            },
            Tone::Gentle => DefaultPalette {
                primary: Color::rgb(0xA5, 0xB4, 0xFC),
                secondary: Color::rgb(0xC4, 0xB5, 0xFD),
                accent: Color::WHITE,
                background: Color::rgb(0x0F, 0x0F, 0x23),
            },
            Tone::Intense => DefaultPalette {
                primary: Color::rgb(0xDC, 0x26, 0x26),
                secondary: Color::rgb(0x7C, 0x2D, 0x12),
                accent: Color::rgb(0xFD, 0xE6, 0x8A),
                background: Color::rgb(0x1A, 0x05, 0x05),
            },
        }
    }

    /// Font family used when no typography hint applies
    pub fn default_family(&self) -> &'static str {
        match self {
            Tone::Gentle => "serif",
            Tone::Fusion | Tone::Intense => "sans",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

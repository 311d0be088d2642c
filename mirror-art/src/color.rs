//! Color parsing and the palette alpha helper
//!
//! Palette entries arrive as CSS-style strings. [`add_alpha`] works at the
//! string level (like assigning a computed `fillStyle`), and [`Color::parse`]
//! turns the result into something a backend can paint with.

use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity, 0.0 (transparent) to 1.0 (opaque)
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Alpha as an 8-bit channel value
    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)`,
    /// `white`, `black` or `transparent`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "white" => return Some(Color::WHITE),
            "black" => return Some(Color::BLACK),
            "transparent" => return Some(Color::BLACK.with_alpha(0.0)),
            _ => {}
        }

        if let Some(args) = function_args(&lower, "rgba") {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            if parts.len() != 4 {
                return None;
            }
            let alpha: f32 = parts[3].parse().ok()?;
            if !alpha.is_finite() {
                return None;
            }
            return Some(
                Color::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?)
                    .with_alpha(alpha),
            );
        }

        if let Some(args) = function_args(&lower, "rgb") {
            let parts: Vec<&str> = args.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return None;
            }
            return Some(Color::rgb(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
            ));
        }

        None
    }
}

fn function_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn channel(s: &str) -> Option<u8> {
    let value: f32 = s.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(Color::rgb(
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Color::rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

/// Convert `#rrggbb` plus an alpha fraction into `rgba(r, g, b, a)`
///
/// Anything that is not a six-digit hex color is returned unchanged. No
/// validation and no error.
///
/// ```
/// use mirror_art::add_alpha;
///
/// assert_eq!(add_alpha("#000000", 0.5), "rgba(0, 0, 0, 0.5)");
/// assert_eq!(add_alpha("not-a-hex", 0.5), "not-a-hex");
/// ```
pub fn add_alpha(color: &str, alpha: f32) -> String {
    let hex = match color.strip_prefix('#') {
        Some(hex) if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) => hex,
        _ => return color.to_string(),
    };

    // Length and digits checked above
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

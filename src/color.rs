//! Color normalization
//!
//! Fill, stroke and gradient stop colors all pass through here on their way to
//! VML, which only understands `#rrggbb`.

use std::fmt;
use std::str::FromStr;

/// An opaque RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Named colors accepted in attribute values
const NAMED: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("lime", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("aqua", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("fuchsia", Color::rgb(255, 0, 255)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("brown", Color::rgb(165, 42, 42)),
    ("pink", Color::rgb(255, 192, 203)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("lightgray", Color::rgb(211, 211, 211)),
    ("lightgrey", Color::rgb(211, 211, 211)),
    ("darkgray", Color::rgb(169, 169, 169)),
    ("darkgrey", Color::rgb(169, 169, 169)),
    ("silver", Color::rgb(192, 192, 192)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("navy", Color::rgb(0, 0, 128)),
    ("olive", Color::rgb(128, 128, 0)),
    ("teal", Color::rgb(0, 128, 128)),
];

/// Error for color strings that match no supported form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color `{}`", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for Color {
    type Err = UnknownColor;

    /// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)` (components 0-255 or
    /// percentages), `rgba(...)` with the alpha ignored, and the named colors
    /// above. Case and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownColor(s.to_string());
        let value = s.trim().to_ascii_lowercase();

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(unknown);
        }

        if let Some(body) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
        {
            let body = body.strip_suffix(')').ok_or_else(unknown)?;
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() < 3 {
                return Err(unknown());
            }
            let channel = |p: &str| -> Option<u8> {
                let v = match p.strip_suffix('%') {
                    Some(pct) => pct.parse::<f64>().ok()? * 2.55,
                    None => p.parse::<f64>().ok()?,
                };
                Some(v.round().clamp(0.0, 255.0) as u8)
            };
            return match (channel(parts[0]), channel(parts[1]), channel(parts[2])) {
                (Some(r), Some(g), Some(b)) => Ok(Color::rgb(r, g, b)),
                _ => Err(unknown()),
            };
        }

        NAMED
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, c)| *c)
            .ok_or_else(unknown)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Color::rgb(it.next()??, it.next()??, it.next()??))
        }
        6 => {
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

/// Normalize any supported color string to `#rrggbb`.
///
/// Unrecognized input yields `None`; the engine then passes the value through
/// untouched rather than failing the render.
pub fn to_hex(color: &str) -> Option<String> {
    color.parse::<Color>().ok().map(Color::to_hex)
}

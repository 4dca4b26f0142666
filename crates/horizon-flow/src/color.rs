//! RGBA colours used for clearing the window.

use std::fmt;
use std::str::FromStr;

use horizon_flow_core::FlowError;

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a colour from RGBA components.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour from RGB components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create a colour from a hex string (e.g., "#FF0000" or "#FF0000FF").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let len = hex.len();

        if (len != 6 && len != 8) || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        let a = if len == 8 {
            u8::from_str_radix(&hex[6..8], 16).ok()?
        } else {
            255
        };

        Some(Self::rgba(r, g, b, a))
    }

    /// Look up a common colour name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "yellow" => Self::YELLOW,
            "cyan" | "aqua" => Self::CYAN,
            "magenta" | "fuchsia" => Self::MAGENTA,
            "gray" | "grey" => Self::GRAY,
            "silver" => Self::rgb(192, 192, 192),
            "maroon" => Self::rgb(128, 0, 0),
            "olive" => Self::rgb(128, 128, 0),
            "lime" => Self::rgb(0, 255, 0),
            "navy" => Self::rgb(0, 0, 128),
            "purple" => Self::rgb(128, 0, 128),
            "teal" => Self::rgb(0, 128, 128),
            "orange" => Self::rgb(255, 165, 0),
            "pink" => Self::rgb(255, 192, 203),
            "brown" => Self::rgb(165, 42, 42),
            "transparent" => Self::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }

    /// Pack into the `0x00RRGGBB` layout used by software framebuffers.
    ///
    /// Alpha is dropped; the window surface is always opaque.
    #[inline]
    pub fn to_xrgb(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    // Common colors
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Self::rgba(r, g, b, a)
    }
}

/// Values accepted wherever a colour can be given loosely: a [`Color`], an
/// RGB or RGBA tuple, or a colour name / hex string.
pub trait IntoColor {
    /// Convert into a [`Color`].
    fn into_color(self) -> Result<Color, FlowError>;
}

impl IntoColor for Color {
    fn into_color(self) -> Result<Color, FlowError> {
        Ok(self)
    }
}

impl IntoColor for (u8, u8, u8) {
    fn into_color(self) -> Result<Color, FlowError> {
        Ok(self.into())
    }
}

impl IntoColor for (u8, u8, u8, u8) {
    fn into_color(self) -> Result<Color, FlowError> {
        Ok(self.into())
    }
}

impl IntoColor for &str {
    fn into_color(self) -> Result<Color, FlowError> {
        self.parse()
    }
}

impl FromStr for Color {
    type Err = FlowError;

    /// Parse a colour name or a `#RRGGBB` / `#RRGGBBAA` hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = if s.starts_with('#') {
            Self::from_hex(s)
        } else {
            Self::from_name(s).or_else(|| Self::from_hex(s))
        };
        parsed.ok_or_else(|| FlowError::invalid_argument("color", format!("unknown colour {s:?}")))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_white() {
        assert_eq!(Color::default(), Color::WHITE);
    }

    #[test]
    fn test_parse_names_and_hex() {
        assert_eq!("black".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("Navy".parse::<Color>().unwrap(), Color::rgb(0, 0, 128));
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(
            "#10203040".parse::<Color>().unwrap(),
            Color::rgba(0x10, 0x20, 0x30, 0x40)
        );
        assert_eq!("00ff00".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert_eq!("green".parse::<Color>().unwrap(), Color::rgb(0, 255, 0));
        assert_eq!("red".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("chartreuse-ish".parse::<Color>().unwrap_err().is_invalid_argument());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
        assert!("#ÿÿÿ".parse::<Color>().is_err());
    }

    #[test]
    fn test_xrgb_and_display() {
        assert_eq!(Color::rgb(0x12, 0x34, 0x56).to_xrgb(), 0x0012_3456);
        assert_eq!(Color::rgb(255, 0, 0).to_string(), "#ff0000");
        assert_eq!(Color::TRANSPARENT.to_string(), "#00000000");
        assert_eq!(Color::from((1, 2, 3)), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_into_color() {
        assert_eq!("white".into_color().unwrap(), Color::WHITE);
        assert_eq!((9u8, 8u8, 7u8, 6u8).into_color().unwrap(), Color::rgba(9, 8, 7, 6));
        assert!("nope".into_color().is_err());
    }
}

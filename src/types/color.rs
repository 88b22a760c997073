//! Entity and layer color values

use std::fmt;

/// Color as stored on entities and layers
///
/// Decoded either from an AutoCAD Color Index (group code 62) or from a
/// packed 24-bit true color (group code 420).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Color by layer (index 256)
    #[default]
    ByLayer,
    /// Color by block (index 0)
    ByBlock,
    /// AutoCAD Color Index (1-255)
    Index(u8),
    /// True color with RGB values
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub const WHITE: Color = Color::Index(7);

    /// Create a color from an AutoCAD Color Index.
    ///
    /// Negative indices mark a layer that is turned off; the color itself is
    /// the absolute value.
    pub fn from_index(index: i16) -> Self {
        match index {
            0 => Color::ByBlock,
            256 => Color::ByLayer,
            1..=255 => Color::Index(index as u8),
            _ if index < 0 => Color::Index(index.unsigned_abs().min(255) as u8),
            _ => Color::WHITE,
        }
    }

    /// Create a color from a packed `0x00RRGGBB` true color value
    pub fn from_true_color(value: i32) -> Self {
        Color::Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Index code written to group code 62.
    ///
    /// True colors have no index of their own and are written as white
    /// alongside their packed value.
    pub fn index_code(&self) -> i16 {
        match self {
            Color::ByBlock => 0,
            Color::ByLayer => 256,
            Color::Index(i) => *i as i16,
            Color::Rgb { .. } => 7,
        }
    }

    /// Packed true color value, if this is a true color
    pub fn true_color(&self) -> Option<i32> {
        match self {
            Color::Rgb { r, g, b } => Some(((*r as i32) << 16) | ((*g as i32) << 8) | *b as i32),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::ByLayer => write!(f, "ByLayer"),
            Color::ByBlock => write!(f, "ByBlock"),
            Color::Index(i) => write!(f, "Index({})", i),
            Color::Rgb { r, g, b } => write!(f, "RGB({}, {}, {})", r, g, b),
        }
    }
}

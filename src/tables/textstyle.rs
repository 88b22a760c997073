//! Text style table entry

use bitflags::bitflags;

use super::{table_entry, TableKind};
use crate::object::{ObjectCommon, ObjectLinks};

bitflags! {
    /// Text generation flags (code 71)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextGenerationFlags: i16 {
        /// Text is backward (mirrored in X)
        const BACKWARD = 2;
        /// Text is upside down (mirrored in Y)
        const UPSIDE_DOWN = 4;
    }
}

/// A text style table entry
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub object: ObjectCommon,
    /// Style name
    pub name: String,
    pub flags: TextGenerationFlags,
    /// Fixed text height (0 = variable)
    pub height: f64,
    pub width_factor: f64,
    /// Oblique angle in radians
    pub oblique_angle: f64,
    /// Primary font file name
    pub font_file: String,
    /// Big font file name (for Asian languages)
    pub big_font_file: String,
}

impl TextStyle {
    pub const STANDARD: &'static str = "Standard";
    pub(crate) const STANDARD_NAMES: &'static [&'static str] = &[Self::STANDARD];

    /// Create a new text style
    pub fn new(name: impl Into<String>) -> Self {
        TextStyle {
            object: ObjectCommon::new(),
            name: name.into(),
            flags: TextGenerationFlags::empty(),
            height: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            font_file: String::new(),
            big_font_file: String::new(),
        }
    }

    /// Create the "Standard" text style
    pub fn standard() -> Self {
        TextStyle {
            font_file: "txt".to_string(),
            ..Self::new(Self::STANDARD)
        }
    }
}

impl ObjectLinks for TextStyle {}

table_entry!(TextStyle, TableKind::TextStyle);

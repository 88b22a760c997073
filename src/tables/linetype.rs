//! Line type table entry

use super::{table_entry, TableKind, TextStyle};
use crate::object::{ObjectCommon, ObjectLinks};
use crate::types::{Handle, ObjectRef, Vector3};

/// One element of a line type pattern
#[derive(Debug, Clone, PartialEq)]
pub struct LineTypeSegment {
    /// Length of the element (positive = dash, negative = space, 0 = dot)
    pub length: f64,
    /// Shape number, or 0 for plain segments
    pub shape_number: i16,
    /// Style of embedded text or shapes
    pub style: ObjectRef<TextStyle>,
    /// Offset of the embedded element
    pub offset: Vector3,
    pub rotation: f64,
    pub scale: f64,
    /// Embedded text
    pub text: String,
}

impl LineTypeSegment {
    /// Create a dash element
    pub fn dash(length: f64) -> Self {
        Self::with_length(length.abs())
    }

    /// Create a space element
    pub fn space(length: f64) -> Self {
        Self::with_length(-length.abs())
    }

    fn with_length(length: f64) -> Self {
        LineTypeSegment {
            length,
            shape_number: 0,
            style: ObjectRef::NULL,
            offset: Vector3::ZERO,
            rotation: 0.0,
            scale: 1.0,
            text: String::new(),
        }
    }
}

/// A line type table entry
#[derive(Debug, Clone, PartialEq)]
pub struct LineType {
    pub object: ObjectCommon,
    /// Line type name
    pub name: String,
    pub description: String,
    /// Total pattern length
    pub pattern_length: f64,
    /// Alignment (always 'A')
    pub alignment: char,
    pub segments: Vec<LineTypeSegment>,
}

impl LineType {
    pub const BY_LAYER: &'static str = "ByLayer";
    pub const BY_BLOCK: &'static str = "ByBlock";
    pub const CONTINUOUS: &'static str = "Continuous";
    pub(crate) const STANDARD_NAMES: &'static [&'static str] =
        &[Self::BY_LAYER, Self::BY_BLOCK, Self::CONTINUOUS];

    /// Create a new line type
    pub fn new(name: impl Into<String>) -> Self {
        LineType {
            object: ObjectCommon::new(),
            name: name.into(),
            description: String::new(),
            pattern_length: 0.0,
            alignment: 'A',
            segments: Vec::new(),
        }
    }

    pub fn by_layer() -> Self {
        Self::new(Self::BY_LAYER)
    }

    pub fn by_block() -> Self {
        Self::new(Self::BY_BLOCK)
    }

    /// Create the standard "Continuous" line type
    pub fn continuous() -> Self {
        LineType {
            description: "Solid line".to_string(),
            ..Self::new(Self::CONTINUOUS)
        }
    }

    /// Append a segment and update the pattern length
    pub fn add_segment(&mut self, segment: LineTypeSegment) {
        self.pattern_length += segment.length.abs();
        self.segments.push(segment);
    }
}

impl ObjectLinks for LineType {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        for segment in self.segments.iter_mut() {
            segment.style.remap(map);
        }
    }
}

table_entry!(LineType, TableKind::LineType);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TableEntry;

    #[test]
    fn test_pattern_length() {
        let mut dashed = LineType::new("Dashed");
        dashed.add_segment(LineTypeSegment::dash(0.5));
        dashed.add_segment(LineTypeSegment::space(0.25));
        assert_eq!(dashed.segments.len(), 2);
        assert!((dashed.pattern_length - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_standard_names_ignore_case() {
        assert!(LineType::by_layer().is_standard());
        assert!(LineType::new("CONTINUOUS").is_standard());
        assert!(!LineType::new("Dashed").is_standard());
    }
}

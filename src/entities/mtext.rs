//! Multi-line text entity

use super::EntityCommon;
use crate::object::{ObjectCommon, ObjectLinks};
use crate::tables::TextStyle;
use crate::types::{Handle, ObjectRef, Vector3};

/// Attachment point for MText (code 71)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentPoint {
    #[default]
    TopLeft = 1,
    TopCenter = 2,
    TopRight = 3,
    MiddleLeft = 4,
    MiddleCenter = 5,
    MiddleRight = 6,
    BottomLeft = 7,
    BottomCenter = 8,
    BottomRight = 9,
}

impl AttachmentPoint {
    /// Create from the stored value; unknown values fall back to top left
    pub fn from_value(value: i16) -> Self {
        match value {
            2 => AttachmentPoint::TopCenter,
            3 => AttachmentPoint::TopRight,
            4 => AttachmentPoint::MiddleLeft,
            5 => AttachmentPoint::MiddleCenter,
            6 => AttachmentPoint::MiddleRight,
            7 => AttachmentPoint::BottomLeft,
            8 => AttachmentPoint::BottomCenter,
            9 => AttachmentPoint::BottomRight,
            _ => AttachmentPoint::TopLeft,
        }
    }

    pub fn value(&self) -> i16 {
        *self as i16
    }
}

/// A multi-line text entity
#[derive(Debug, Clone, PartialEq)]
pub struct MText {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    /// Text content (may contain formatting codes)
    pub value: String,
    pub insertion_point: Vector3,
    pub height: f64,
    /// Reference rectangle width
    pub rectangle_width: f64,
    /// Rotation angle in radians
    pub rotation: f64,
    pub style: ObjectRef<TextStyle>,
    pub attachment_point: AttachmentPoint,
    pub normal: Vector3,
}

impl MText {
    pub fn new() -> Self {
        MText {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            value: String::new(),
            insertion_point: Vector3::ZERO,
            height: 1.0,
            rectangle_width: 0.0,
            rotation: 0.0,
            style: ObjectRef::NULL,
            attachment_point: AttachmentPoint::TopLeft,
            normal: Vector3::UNIT_Z,
        }
    }
}

impl Default for MText {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectLinks for MText {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.style.remap(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_point_values() {
        assert_eq!(AttachmentPoint::from_value(5), AttachmentPoint::MiddleCenter);
        assert_eq!(AttachmentPoint::from_value(42), AttachmentPoint::TopLeft);
        assert_eq!(AttachmentPoint::BottomRight.value(), 9);
    }
}

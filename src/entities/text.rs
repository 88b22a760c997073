//! Text entity

use super::EntityCommon;
use crate::object::{ObjectCommon, ObjectLinks};
use crate::tables::TextStyle;
use crate::types::{Handle, ObjectRef, Vector3};

/// A single-line text entity
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    /// Text content
    pub value: String,
    /// Insertion point (first alignment point)
    pub insertion_point: Vector3,
    /// Second alignment point (for aligned/fit text)
    pub alignment_point: Option<Vector3>,
    pub height: f64,
    /// Rotation angle in radians
    pub rotation: f64,
    pub width_factor: f64,
    pub oblique_angle: f64,
    pub style: ObjectRef<TextStyle>,
    pub normal: Vector3,
}

impl Text {
    /// Create a new text entity
    pub fn new() -> Self {
        Text {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            value: String::new(),
            insertion_point: Vector3::ZERO,
            alignment_point: None,
            height: 1.0,
            rotation: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            style: ObjectRef::NULL,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a text entity with a value at a location
    pub fn with_value(value: impl Into<String>, insertion_point: Vector3) -> Self {
        Text {
            value: value.into(),
            insertion_point,
            ..Self::new()
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectLinks for Text {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.style.remap(map);
    }
}

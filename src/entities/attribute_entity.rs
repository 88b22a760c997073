//! Attribute entity - Block attribute instance with actual values

use super::{AttributeFlags, EntityCommon};
use crate::object::{ObjectCommon, ObjectLinks};
use crate::tables::TextStyle;
use crate::types::{Handle, ObjectRef, Vector3};

/// Attribute entity, owned by the insert it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEntity {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    /// Attribute tag (matches the ATTDEF tag)
    pub tag: String,
    /// Actual attribute value
    pub value: String,
    pub insertion_point: Vector3,
    pub height: f64,
    pub rotation: f64,
    pub flags: AttributeFlags,
    pub style: ObjectRef<TextStyle>,
}

impl AttributeEntity {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        AttributeEntity {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            tag: tag.into(),
            value: value.into(),
            insertion_point: Vector3::ZERO,
            height: 1.0,
            rotation: 0.0,
            flags: AttributeFlags::empty(),
            style: ObjectRef::NULL,
        }
    }
}

impl ObjectLinks for AttributeEntity {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.style.remap(map);
    }
}

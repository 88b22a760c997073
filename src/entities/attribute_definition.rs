//! AttributeDefinition entity - Block attribute template

use bitflags::bitflags;

use super::EntityCommon;
use crate::object::{ObjectCommon, ObjectLinks};
use crate::tables::TextStyle;
use crate::types::{Handle, ObjectRef, Vector3};

bitflags! {
    /// Attribute flags (code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AttributeFlags: i16 {
        /// Attribute is invisible
        const INVISIBLE = 1;
        /// Value cannot be changed
        const CONSTANT = 2;
        /// Verification required on input
        const VERIFY = 4;
        /// No prompt during insertion
        const PRESET = 8;
        /// Attribute may not be moved
        const LOCKED_POSITION = 16;
    }
}

/// Attribute definition, the template of an attribute inside a block
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    /// Attribute tag
    pub tag: String,
    /// Prompt shown when the block is inserted
    pub prompt: String,
    /// Default value
    pub default_value: String,
    pub insertion_point: Vector3,
    pub height: f64,
    pub rotation: f64,
    pub flags: AttributeFlags,
    pub style: ObjectRef<TextStyle>,
}

impl AttributeDefinition {
    pub fn new(tag: impl Into<String>, prompt: impl Into<String>) -> Self {
        AttributeDefinition {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            tag: tag.into(),
            prompt: prompt.into(),
            default_value: String::new(),
            insertion_point: Vector3::ZERO,
            height: 1.0,
            rotation: 0.0,
            flags: AttributeFlags::empty(),
            style: ObjectRef::NULL,
        }
    }
}

impl ObjectLinks for AttributeDefinition {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.style.remap(map);
    }
}

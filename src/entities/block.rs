//! Block begin and end markers
//!
//! A block definition is bracketed by a BLOCK entity and an ENDBLK entity,
//! both owned by the block record. The BLOCK marker carries the definition's
//! name, base point and flags as they are stored on disk.

use super::EntityCommon;
use crate::object::{ObjectCommon, ObjectLinks};
use crate::tables::BlockFlags;
use crate::types::Vector3;

/// Block entity - marks the beginning of a block definition
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    /// Block name (should match the BlockRecord name)
    pub name: String,
    /// Base point (insertion point) for the block
    pub base_point: Vector3,
    pub description: String,
    pub flags: BlockFlags,
    /// X-ref path name (for external references)
    pub xref_path: String,
}

impl Block {
    /// Create a new block entity
    pub fn new(name: impl Into<String>, base_point: Vector3) -> Self {
        Self {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            name: name.into(),
            base_point,
            description: String::new(),
            flags: BlockFlags::empty(),
            xref_path: String::new(),
        }
    }

    /// Builder: Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl ObjectLinks for Block {}

/// BlockEnd entity - marks the end of a block definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockEnd {
    pub object: ObjectCommon,
    pub common: EntityCommon,
}

impl BlockEnd {
    /// Create a new block end entity
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectLinks for BlockEnd {}

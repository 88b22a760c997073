//! Block record table entry
//!
//! A block record is the owner of a block definition: its BLOCK and ENDBLK
//! marker entities and the entities between them. Model space and paper
//! space are block records with reserved names.

use bitflags::bitflags;

use super::{table_entry, TableKind};
use crate::entities::{Block, BlockEnd};
use crate::object::{ObjectCommon, ObjectLinks};
use crate::objects::Layout;
use crate::types::{Handle, ObjectRef, OwnedRef, Vector3};

bitflags! {
    /// Block type flags (code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: i16 {
        /// Block is anonymous
        const ANONYMOUS = 1;
        /// Block has attribute definitions
        const HAS_ATTRIBUTES = 2;
        /// Block is an external reference
        const XREF = 4;
        /// Block is an xref overlay
        const XREF_OVERLAY = 8;
        /// Block is externally dependent
        const EXTERNAL = 16;
    }
}

/// A block record table entry
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    pub object: ObjectCommon,
    /// Block name
    pub name: String,
    pub flags: BlockFlags,
    /// Insertion base point
    pub base_point: Vector3,
    pub description: String,
    /// Layout this record is the space of
    pub layout: ObjectRef<Layout>,
    /// BLOCK marker
    pub block: OwnedRef<Block>,
    /// ENDBLK marker
    pub block_end: OwnedRef<BlockEnd>,
    /// Entities of the definition, in drawing order
    pub entities: Vec<OwnedRef>,
}

impl BlockRecord {
    pub const MODEL_SPACE: &'static str = "*Model_Space";
    pub const PAPER_SPACE: &'static str = "*Paper_Space";
    pub(crate) const STANDARD_NAMES: &'static [&'static str] =
        &[Self::MODEL_SPACE, Self::PAPER_SPACE];

    /// Create a new block record
    pub fn new(name: impl Into<String>) -> Self {
        BlockRecord {
            object: ObjectCommon::new(),
            name: name.into(),
            flags: BlockFlags::empty(),
            base_point: Vector3::ZERO,
            description: String::new(),
            layout: ObjectRef::NULL,
            block: OwnedRef::NULL,
            block_end: OwnedRef::NULL,
            entities: Vec::new(),
        }
    }

    pub fn model_space() -> Self {
        Self::new(Self::MODEL_SPACE)
    }

    pub fn paper_space() -> Self {
        Self::new(Self::PAPER_SPACE)
    }

    pub fn is_model_space(&self) -> bool {
        self.name.eq_ignore_ascii_case(Self::MODEL_SPACE)
    }

    pub fn is_paper_space(&self) -> bool {
        self.name.eq_ignore_ascii_case(Self::PAPER_SPACE)
    }

    pub fn is_anonymous(&self) -> bool {
        self.flags.contains(BlockFlags::ANONYMOUS)
    }

    /// Append an entity; returns `false` if it is already part of the block
    pub fn add_entity(&mut self, entity: OwnedRef) -> bool {
        if entity.is_null() || self.entities.contains(&entity) {
            return false;
        }
        self.entities.push(entity);
        true
    }
}

impl ObjectLinks for BlockRecord {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.layout.remap(map);
        self.block.remap(map);
        self.block_end.remap(map);
        crate::types::reference::remap_all(&mut self.entities, |e| e.remap(map));
    }

    fn owned_links(&self, out: &mut Vec<Handle>) {
        out.push(self.block.handle());
        out.extend(self.entities.iter().map(|e| e.handle()));
        out.push(self.block_end.handle());
    }
}

table_entry!(BlockRecord, TableKind::BlockRecord);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        assert!(BlockRecord::model_space().is_model_space());
        assert!(BlockRecord::new("*PAPER_SPACE").is_paper_space());
        assert!(!BlockRecord::new("Door").is_model_space());
    }

    #[test]
    fn test_owned_links_order() {
        let mut record = BlockRecord::new("Door");
        record.block = OwnedRef::new(Handle::new(0x10));
        record.block_end = OwnedRef::new(Handle::new(0x13));
        assert!(record.add_entity(OwnedRef::new(Handle::new(0x11))));
        assert!(!record.add_entity(OwnedRef::new(Handle::new(0x11))));
        record.add_entity(OwnedRef::new(Handle::new(0x12)));

        let mut owned = Vec::new();
        record.owned_links(&mut owned);
        let values: Vec<u64> = owned.iter().map(|h| h.value()).collect();
        assert_eq!(values, vec![0x10, 0x11, 0x12, 0x13]);
    }

    #[test]
    fn test_remap_drops_removed_entity() {
        let mut record = BlockRecord::new("Door");
        record.add_entity(OwnedRef::new(Handle::new(5)));
        record.add_entity(OwnedRef::new(Handle::new(6)));
        record.remap_links(&mut |h| if h.value() == 5 { Handle::NULL } else { h });
        assert_eq!(record.entities, vec![OwnedRef::new(Handle::new(6))]);
    }
}

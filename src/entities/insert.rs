//! Insert entity (block reference)

use super::{AttributeEntity, EntityCommon, Seqend};
use crate::object::{ObjectCommon, ObjectLinks};
use crate::tables::BlockRecord;
use crate::types::{Handle, ObjectRef, OwnedRef, Vector3};

/// Insert entity - a reference to a block definition
///
/// Attribute values of the inserted block are separate ATTRIB entities owned
/// by the insert and closed by a SEQEND.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    /// Referenced block definition
    pub block: ObjectRef<BlockRecord>,
    /// Insertion point (in WCS)
    pub insert_point: Vector3,
    /// X, Y and Z scale factors
    pub scale: Vector3,
    /// Rotation angle in radians
    pub rotation: f64,
    pub normal: Vector3,
    pub attributes: Vec<OwnedRef<AttributeEntity>>,
    /// Closes the attribute list; null when there are no attributes
    pub seqend: OwnedRef<Seqend>,
}

impl Insert {
    /// Create a new insert of a block at a location
    pub fn new(block: ObjectRef<BlockRecord>, insert_point: Vector3) -> Self {
        Self {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            block,
            insert_point,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: 0.0,
            normal: Vector3::UNIT_Z,
            attributes: Vec::new(),
            seqend: OwnedRef::NULL,
        }
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }
}

impl Default for Insert {
    fn default() -> Self {
        Self::new(ObjectRef::NULL, Vector3::ZERO)
    }
}

impl ObjectLinks for Insert {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.block.remap(map);
        crate::types::reference::remap_all(&mut self.attributes, |a| a.remap(map));
        self.seqend.remap(map);
    }

    fn owned_links(&self, out: &mut Vec<Handle>) {
        out.extend(self.attributes.iter().map(|a| a.handle()));
        out.push(self.seqend.handle());
    }
}

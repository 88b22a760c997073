//! Handle reference types.
//!
//! Every outgoing handle of a decomposed record is tagged with the kind of
//! edge it encodes. Ownership edges make the writer visit the target; pointer
//! edges do not.

/// Reference code of an outgoing handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ReferenceType {
    /// Soft ownership reference (code 2): table and dictionary entries
    SoftOwnership = 2,
    /// Hard ownership reference (code 3): extended dictionary, sub-entities
    HardOwnership = 3,
    /// Soft pointer reference (code 4): owner back-links, reactors
    SoftPointer = 4,
    /// Hard pointer reference (code 5): layer, style, block references
    HardPointer = 5,
}

impl ReferenceType {
    /// Try to create a reference type from a raw code value.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(ReferenceType::SoftOwnership),
            3 => Some(ReferenceType::HardOwnership),
            4 => Some(ReferenceType::SoftPointer),
            5 => Some(ReferenceType::HardPointer),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Whether the target is owned by the referencing object.
    pub fn is_ownership(&self) -> bool {
        matches!(self, ReferenceType::SoftOwnership | ReferenceType::HardOwnership)
    }
}

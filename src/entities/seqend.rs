//! Sequence end entity

use super::EntityCommon;
use crate::object::{ObjectCommon, ObjectLinks};

/// Closes the vertex list of a polyline or the attribute list of an insert
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Seqend {
    pub object: ObjectCommon,
    pub common: EntityCommon,
}

impl Seqend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectLinks for Seqend {}

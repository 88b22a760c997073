//! Dimension entity

use super::EntityCommon;
use crate::object::{ObjectCommon, ObjectLinks};
use crate::tables::{BlockRecord, DimStyle};
use crate::types::{Handle, ObjectRef, Vector3};

/// Dimension type (low bits of code 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DimensionType {
    /// Rotated, horizontal, or vertical linear dimension
    #[default]
    Linear = 0,
    Aligned = 1,
    /// Angular 2 lines dimension
    Angular = 2,
    Diameter = 3,
    Radius = 4,
    /// Angular 3 points dimension
    Angular3Point = 5,
    Ordinate = 6,
}

impl DimensionType {
    pub fn from_value(value: i16) -> Self {
        match value & 0x0F {
            1 => DimensionType::Aligned,
            2 => DimensionType::Angular,
            3 => DimensionType::Diameter,
            4 => DimensionType::Radius,
            5 => DimensionType::Angular3Point,
            6 => DimensionType::Ordinate,
            _ => DimensionType::Linear,
        }
    }

    pub fn value(&self) -> i16 {
        *self as i16
    }
}

/// A dimension; its geometry lives in an anonymous block
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    pub dimension_type: DimensionType,
    /// Definition point for the dimension line (in WCS)
    pub definition_point: Vector3,
    /// Middle point of dimension text (in WCS)
    pub text_middle_point: Vector3,
    /// Text override; empty means the measurement
    pub text: String,
    pub measurement: f64,
    pub style: ObjectRef<DimStyle>,
    /// Block holding the rendered geometry
    pub block: ObjectRef<BlockRecord>,
    pub normal: Vector3,
}

impl Dimension {
    pub fn new(dimension_type: DimensionType) -> Self {
        Dimension {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            dimension_type,
            definition_point: Vector3::ZERO,
            text_middle_point: Vector3::ZERO,
            text: String::new(),
            measurement: 0.0,
            style: ObjectRef::NULL,
            block: ObjectRef::NULL,
            normal: Vector3::UNIT_Z,
        }
    }
}

impl ObjectLinks for Dimension {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.style.remap(map);
        self.block.remap(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ignores_high_flags() {
        assert_eq!(DimensionType::from_value(0x20 | 4), DimensionType::Radius);
        assert_eq!(DimensionType::from_value(0x80), DimensionType::Linear);
    }
}

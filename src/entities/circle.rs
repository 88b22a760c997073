//! Circle entity

use super::EntityCommon;
use crate::object::{ObjectCommon, ObjectLinks};
use crate::types::Vector3;

/// A circle entity
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    pub center: Vector3,
    pub radius: f64,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
    pub normal: Vector3,
}

impl Circle {
    pub fn new() -> Self {
        Circle {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            radius: 1.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a circle from its center and radius
    pub fn from_center_radius(center: Vector3, radius: f64) -> Self {
        Circle {
            center,
            radius,
            ..Self::new()
        }
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectLinks for Circle {}

//! Point entity

use super::EntityCommon;
use crate::object::{ObjectCommon, ObjectLinks};
use crate::types::Vector3;

/// A point entity
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    /// Location of the point
    pub location: Vector3,
    /// Thickness (extrusion in Z direction)
    pub thickness: f64,
    /// Normal vector
    pub normal: Vector3,
}

impl Point {
    /// Create a new point at the origin
    pub fn new() -> Self {
        Point {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            location: Vector3::ZERO,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }

    /// Create a new point at a specific location
    pub fn at(location: Vector3) -> Self {
        Point {
            location,
            ..Self::new()
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectLinks for Point {}

//! Arc entity

use super::EntityCommon;
use crate::object::{ObjectCommon, ObjectLinks};
use crate::types::Vector3;

/// An arc entity; angles in radians, counter-clockwise from start to end
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    pub center: Vector3,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub thickness: f64,
    pub normal: Vector3,
}

impl Arc {
    pub fn new() -> Self {
        Arc {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            center: Vector3::ZERO,
            radius: 1.0,
            start_angle: 0.0,
            end_angle: std::f64::consts::PI,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
        }
    }
}

impl Default for Arc {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectLinks for Arc {}

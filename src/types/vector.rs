//! Point value type carried by entities

use std::fmt;

/// 3D point or direction as decoded from a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Create a new 3D vector
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    /// Unit Z vector (default extrusion direction)
    pub const UNIT_Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);
}

impl Default for Vector3 {
    fn default() -> Self {
        Vector3::ZERO
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector3_default_is_origin() {
        assert_eq!(Vector3::default(), Vector3::ZERO);
        assert_eq!(Vector3::UNIT_Z.z, 1.0);
    }

    #[test]
    fn test_vector3_display() {
        assert_eq!(Vector3::new(1.0, 2.5, 0.0).to_string(), "(1, 2.5, 0)");
    }
}

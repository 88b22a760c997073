//! Polyline entity with its vertices
//!
//! A polyline owns a chain of VERTEX entities closed by a SEQEND. Each
//! vertex is a separate object of the document.

use bitflags::bitflags;

use super::{EntityCommon, Seqend};
use crate::object::{ObjectCommon, ObjectLinks};
use crate::types::{Handle, OwnedRef, Vector3};

bitflags! {
    /// Polyline flags (code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PolylineFlags: i16 {
        const CLOSED = 1;
        const CURVE_FIT = 2;
        const SPLINE_FIT = 4;
        const POLYLINE_3D = 8;
        const POLYGON_MESH = 16;
        const CLOSED_N = 32;
        const POLYFACE_MESH = 64;
        const LINETYPE_CONTINUOUS = 128;
    }
}

bitflags! {
    /// Vertex flags (code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VertexFlags: i16 {
        const EXTRA_VERTEX = 1;
        const CURVE_FIT_TANGENT = 2;
        const SPLINE_VERTEX = 8;
        const SPLINE_CONTROL = 16;
        const POLYLINE_3D = 32;
        const POLYGON_MESH = 64;
        const POLYFACE_FACE = 128;
    }
}

/// A heavy (2D or 3D) polyline
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    pub flags: PolylineFlags,
    pub elevation: f64,
    pub default_start_width: f64,
    pub default_end_width: f64,
    pub normal: Vector3,
    /// Vertices in order
    pub vertices: Vec<OwnedRef<Vertex>>,
    /// Closing sequence end
    pub seqend: OwnedRef<Seqend>,
}

impl Polyline {
    pub fn new() -> Self {
        Polyline {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            flags: PolylineFlags::empty(),
            elevation: 0.0,
            default_start_width: 0.0,
            default_end_width: 0.0,
            normal: Vector3::UNIT_Z,
            vertices: Vec::new(),
            seqend: OwnedRef::NULL,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.flags.contains(PolylineFlags::CLOSED)
    }
}

impl Default for Polyline {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectLinks for Polyline {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        crate::types::reference::remap_all(&mut self.vertices, |v| v.remap(map));
        self.seqend.remap(map);
    }

    fn owned_links(&self, out: &mut Vec<Handle>) {
        out.extend(self.vertices.iter().map(|v| v.handle()));
        out.push(self.seqend.handle());
    }
}

/// A vertex of a polyline
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub object: ObjectCommon,
    pub common: EntityCommon,
    pub location: Vector3,
    pub start_width: f64,
    pub end_width: f64,
    /// Bulge (tangent of 1/4 of the arc angle to the next vertex)
    pub bulge: f64,
    pub flags: VertexFlags,
}

impl Vertex {
    pub fn new(location: Vector3) -> Self {
        Vertex {
            object: ObjectCommon::new(),
            common: EntityCommon::new(),
            location,
            start_width: 0.0,
            end_width: 0.0,
            bulge: 0.0,
            flags: VertexFlags::empty(),
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Vector3::ZERO)
    }
}

impl ObjectLinks for Vertex {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_links_end_with_seqend() {
        let mut polyline = Polyline::new();
        polyline.vertices.push(OwnedRef::new(Handle::new(0x21)));
        polyline.vertices.push(OwnedRef::new(Handle::new(0x22)));
        polyline.seqend = OwnedRef::new(Handle::new(0x23));

        let mut owned = Vec::new();
        polyline.owned_links(&mut owned);
        assert_eq!(owned.last(), Some(&Handle::new(0x23)));
        assert_eq!(owned.len(), 3);
    }
}

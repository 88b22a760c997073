//! CAD entity types and traits
//!
//! Entities are the graphical objects of a document. Each one is owned by a
//! block record (model space, paper space or a block definition), except for
//! the sub-entities of compound entities: vertices and the closing SEQEND of
//! a polyline, attributes of an insert.

use crate::object::ObjectLinks;
use crate::tables::{Layer, LineType};
use crate::types::{Color, Handle, LineWeight, ObjectRef};

pub mod arc;
pub mod attribute_definition;
pub mod attribute_entity;
pub mod block;
pub mod circle;
pub mod dimension;
pub mod insert;
pub mod line;
pub mod mtext;
pub mod point;
pub mod polyline;
pub mod seqend;
pub mod text;

pub use arc::Arc;
pub use attribute_definition::{AttributeDefinition, AttributeFlags};
pub use attribute_entity::AttributeEntity;
pub use block::{Block, BlockEnd};
pub use circle::Circle;
pub use dimension::{Dimension, DimensionType};
pub use insert::Insert;
pub use line::Line;
pub use mtext::{AttachmentPoint, MText};
pub use point::Point;
pub use polyline::{Polyline, PolylineFlags, Vertex, VertexFlags};
pub use seqend::Seqend;
pub use text::Text;

/// Base trait for all CAD entities
pub trait Entity: ObjectLinks {
    /// Graphical properties shared by all entities
    fn entity(&self) -> &EntityCommon;

    fn entity_mut(&mut self) -> &mut EntityCommon;

    fn layer(&self) -> ObjectRef<Layer> {
        self.entity().layer
    }

    fn set_layer(&mut self, layer: ObjectRef<Layer>) {
        self.entity_mut().layer = layer;
    }

    fn color(&self) -> Color {
        self.entity().color
    }

    fn set_color(&mut self, color: Color) {
        self.entity_mut().color = color;
    }

    fn is_invisible(&self) -> bool {
        self.entity().invisible
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Layer; null until resolved, the document's layer "0" by convention
    pub layer: ObjectRef<Layer>,
    /// Line type; null means the document default
    pub linetype: ObjectRef<LineType>,
    pub color: Color,
    pub line_weight: LineWeight,
    pub linetype_scale: f64,
    /// Visibility flag
    pub invisible: bool,
}

impl EntityCommon {
    /// Create new common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            layer: ObjectRef::NULL,
            linetype: ObjectRef::NULL,
            color: Color::ByLayer,
            line_weight: LineWeight::ByLayer,
            linetype_scale: 1.0,
            invisible: false,
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: ObjectRef<Layer>) -> Self {
        EntityCommon {
            layer,
            ..Self::new()
        }
    }

    pub(crate) fn remap(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.layer.remap(map);
        self.linetype.remap(map);
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

//! Layer table entry

use bitflags::bitflags;

use super::{table_entry, LineType, TableKind};
use crate::object::{ObjectCommon, ObjectLinks};
use crate::types::{Color, Handle, LineWeight, ObjectRef};

bitflags! {
    /// Layer state flags (code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: i16 {
        /// Layer is frozen
        const FROZEN = 1;
        /// Layer is frozen by default in new viewports
        const FROZEN_IN_NEW_VIEWPORTS = 2;
        /// Layer is locked
        const LOCKED = 4;
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub object: ObjectCommon,
    /// Layer name
    pub name: String,
    pub flags: LayerFlags,
    /// Layer is off (stored as a negative color index)
    pub is_off: bool,
    /// Layer color
    pub color: Color,
    /// Line type of entities drawn ByLayer
    pub linetype: ObjectRef<LineType>,
    /// Line weight
    pub line_weight: LineWeight,
    /// Is this layer plottable?
    pub is_plottable: bool,
}

impl Layer {
    /// Name of the layer every document carries
    pub const DEFAULT_NAME: &'static str = "0";
    pub(crate) const STANDARD_NAMES: &'static [&'static str] = &[Self::DEFAULT_NAME];

    /// Create a new layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            object: ObjectCommon::new(),
            name: name.into(),
            flags: LayerFlags::empty(),
            is_off: false,
            color: Color::WHITE,
            linetype: ObjectRef::NULL,
            line_weight: LineWeight::Default,
            is_plottable: true,
        }
    }

    /// Create the standard "0" layer
    pub fn layer_0() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }

    /// Create a layer with a specific color
    pub fn with_color(name: impl Into<String>, color: Color) -> Self {
        Layer {
            color,
            ..Self::new(name)
        }
    }

    pub fn freeze(&mut self) {
        self.flags.insert(LayerFlags::FROZEN);
    }

    pub fn thaw(&mut self) {
        self.flags.remove(LayerFlags::FROZEN);
    }

    pub fn is_frozen(&self) -> bool {
        self.flags.contains(LayerFlags::FROZEN)
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(LayerFlags::LOCKED)
    }

    /// Check if the layer is visible (not off and not frozen)
    pub fn is_visible(&self) -> bool {
        !self.is_off && !self.is_frozen()
    }
}

impl ObjectLinks for Layer {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.linetype.remap(map);
    }
}

table_entry!(Layer, TableKind::Layer);

//! Dimension style table entry

use super::{table_entry, BlockRecord, TableKind, TextStyle};
use crate::object::{ObjectCommon, ObjectLinks};
use crate::types::{Handle, ObjectRef};

/// A dimension style table entry
#[derive(Debug, Clone, PartialEq)]
pub struct DimStyle {
    pub object: ObjectCommon,
    /// Style name
    pub name: String,
    /// Text style of the measurement (DIMTXSTY, code 340)
    pub text_style: ObjectRef<TextStyle>,
    /// Arrow block (DIMBLK, code 342)
    pub arrow_block: ObjectRef<BlockRecord>,
    /// Overall scale factor (DIMSCALE, code 40)
    pub dimscale: f64,
    /// Arrow size (DIMASZ, code 41)
    pub dimasz: f64,
    /// Text height (DIMTXT, code 140)
    pub dimtxt: f64,
    /// Dimension line gap (DIMGAP, code 147)
    pub dimgap: f64,
}

impl DimStyle {
    pub const STANDARD: &'static str = "Standard";
    pub(crate) const STANDARD_NAMES: &'static [&'static str] = &[Self::STANDARD];

    pub fn new(name: impl Into<String>) -> Self {
        DimStyle {
            object: ObjectCommon::new(),
            name: name.into(),
            text_style: ObjectRef::NULL,
            arrow_block: ObjectRef::NULL,
            dimscale: 1.0,
            dimasz: 0.18,
            dimtxt: 0.18,
            dimgap: 0.09,
        }
    }

    pub fn standard() -> Self {
        Self::new(Self::STANDARD)
    }
}

impl ObjectLinks for DimStyle {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.text_style.remap(map);
        self.arrow_block.remap(map);
    }
}

table_entry!(DimStyle, TableKind::DimStyle);

//! Header handles collection.
//!
//! The header of a document records the handles of its well-known objects:
//! table controls, the root dictionary and its standard children, the model
//! and paper space block records, the standard line types and the current
//! settings. A reader fills the collection while decoding the header; the
//! builder uses it to seed its worklist and the document keeps it afterwards.

use indexmap::IndexMap;

use crate::tables::TableKind;
use crate::types::Handle;

/// Collection of named handle references found in a document header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderHandlesCollection {
    handles: IndexMap<String, Handle>,
}

// Getter/setter pair for one named handle.
macro_rules! handle_property {
    ($name:ident, $setter:ident, $key:expr) => {
        pub fn $name(&self) -> Option<Handle> {
            self.get_handle($key)
        }

        pub fn $setter(&mut self, value: Handle) {
            self.set_handle($key, value);
        }
    };
}

impl HeaderHandlesCollection {
    /// Create a new empty handles collection.
    pub fn new() -> Self {
        Self {
            handles: IndexMap::new(),
        }
    }

    /// Get a handle value by name; null handles read as absent.
    pub fn get_handle(&self, name: &str) -> Option<Handle> {
        self.handles.get(name).copied().filter(|h| h.is_valid())
    }

    /// Set a handle value by name.
    pub fn set_handle(&mut self, name: &str, value: Handle) {
        self.handles.insert(name.to_string(), value);
    }

    /// Every non-null handle, in the order they were recorded.
    pub fn valid_handles(&self) -> Vec<Handle> {
        self.handles
            .values()
            .copied()
            .filter(|h| h.is_valid())
            .collect()
    }

    /// Iterate over (name, handle) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Handle)> {
        self.handles.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handle of the control object of a table.
    pub fn table_control(&self, kind: TableKind) -> Option<Handle> {
        self.get_handle(Self::table_key(kind))
    }

    pub fn set_table_control(&mut self, kind: TableKind, value: Handle) {
        self.set_handle(Self::table_key(kind), value);
    }

    fn table_key(kind: TableKind) -> &'static str {
        match kind {
            TableKind::AppId => "APPID_CONTROL_OBJECT",
            TableKind::BlockRecord => "BLOCK_CONTROL_OBJECT",
            TableKind::DimStyle => "DIMSTYLE_CONTROL_OBJECT",
            TableKind::Layer => "LAYER_CONTROL_OBJECT",
            TableKind::LineType => "LINETYPE_CONTROL_OBJECT",
            TableKind::TextStyle => "STYLE_CONTROL_OBJECT",
        }
    }

    /// Rewrite every handle; names mapped to null are kept as null.
    pub(crate) fn remap(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        for handle in self.handles.values_mut() {
            if handle.is_valid() {
                *handle = map(*handle);
            }
        }
    }

    // Current settings
    handle_property!(clayer, set_clayer, "CLAYER");
    handle_property!(textstyle, set_textstyle, "TEXTSTYLE");
    handle_property!(celtype, set_celtype, "CELTYPE");
    handle_property!(dimstyle, set_dimstyle, "DIMSTYLE");

    // Dictionaries
    handle_property!(
        dictionary_named_objects,
        set_dictionary_named_objects,
        "DICTIONARY_NAMED_OBJECTS"
    );
    handle_property!(dictionary_acad_group, set_dictionary_acad_group, "DICTIONARY_ACAD_GROUP");
    handle_property!(dictionary_layouts, set_dictionary_layouts, "DICTIONARY_LAYOUTS");

    // Block records and standard line types
    handle_property!(model_space, set_model_space, "MODEL_SPACE");
    handle_property!(paper_space, set_paper_space, "PAPER_SPACE");
    handle_property!(bylayer, set_bylayer, "BYLAYER");
    handle_property!(byblock, set_byblock, "BYBLOCK");
    handle_property!(continuous, set_continuous, "CONTINUOUS");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collection_is_empty() {
        let handles = HeaderHandlesCollection::new();
        assert!(handles.is_empty());
        assert_eq!(handles.clayer(), None);
    }

    #[test]
    fn test_named_accessors() {
        let mut handles = HeaderHandlesCollection::new();
        handles.set_clayer(Handle::new(0x10));
        handles.set_table_control(TableKind::Layer, Handle::new(0x2));

        assert_eq!(handles.clayer(), Some(Handle::new(0x10)));
        assert_eq!(handles.get_handle("LAYER_CONTROL_OBJECT"), Some(Handle::new(0x2)));
        assert_eq!(handles.table_control(TableKind::Layer), Some(Handle::new(0x2)));
    }

    #[test]
    fn test_null_reads_as_absent() {
        let mut handles = HeaderHandlesCollection::new();
        handles.set_handle("A", Handle::new(1));
        handles.set_handle("B", Handle::NULL);
        handles.set_handle("C", Handle::new(3));

        assert_eq!(handles.get_handle("B"), None);
        assert_eq!(handles.valid_handles(), vec![Handle::new(1), Handle::new(3)]);
    }

    #[test]
    fn test_remap() {
        let mut handles = HeaderHandlesCollection::new();
        handles.set_model_space(Handle::new(0x1F));
        handles.set_bylayer(Handle::new(0x14));
        handles.remap(&mut |h| {
            if h.value() == 0x14 {
                Handle::NULL
            } else {
                Handle::new(h.value() + 1)
            }
        });

        assert_eq!(handles.model_space(), Some(Handle::new(0x20)));
        assert_eq!(handles.bylayer(), None);
    }
}

//! CAD table types and management
//!
//! A table is itself an object of the document (the "table control"); it
//! owns its entries, which are separate objects reached through
//! [`OwnedRef`]s. Entry names are unique within one table, compared
//! case-insensitively, and iteration follows insertion order.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{CadError, Result};
use crate::object::{ObjectCommon, ObjectKind, ObjectLinks};
use crate::types::{Handle, OwnedRef};

macro_rules! table_entry {
    ($ty:ty, $kind:expr) => {
        impl $crate::tables::TableEntry for $ty {
            const KIND: $crate::tables::TableKind = $kind;

            fn name(&self) -> &str {
                &self.name
            }

            fn set_name(&mut self, name: String) {
                self.name = name;
            }

            fn common(&self) -> &$crate::object::ObjectCommon {
                &self.object
            }

            fn common_mut(&mut self) -> &mut $crate::object::ObjectCommon {
                &mut self.object
            }

            fn is_standard(&self) -> bool {
                <$ty>::STANDARD_NAMES
                    .iter()
                    .any(|n| n.eq_ignore_ascii_case(&self.name))
            }
        }
    };
}

pub(crate) use table_entry;

pub mod appid;
pub mod block_record;
pub mod dimstyle;
pub mod layer;
pub mod linetype;
pub mod textstyle;

pub use appid::AppId;
pub use block_record::{BlockFlags, BlockRecord};
pub use dimstyle::DimStyle;
pub use layer::{Layer, LayerFlags};
pub use linetype::{LineType, LineTypeSegment};
pub use textstyle::{TextGenerationFlags, TextStyle};

/// The standard tables of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    AppId,
    BlockRecord,
    DimStyle,
    Layer,
    LineType,
    TextStyle,
}

impl TableKind {
    /// Every table, in the order a document lays them out
    pub const ALL: [TableKind; 6] = [
        TableKind::LineType,
        TableKind::Layer,
        TableKind::TextStyle,
        TableKind::AppId,
        TableKind::DimStyle,
        TableKind::BlockRecord,
    ];

    /// Record name of the entries of this table
    pub fn entry_name(&self) -> &'static str {
        match self {
            TableKind::AppId => AppId::OBJECT_NAME,
            TableKind::BlockRecord => BlockRecord::OBJECT_NAME,
            TableKind::DimStyle => DimStyle::OBJECT_NAME,
            TableKind::Layer => Layer::OBJECT_NAME,
            TableKind::LineType => LineType::OBJECT_NAME,
            TableKind::TextStyle => TextStyle::OBJECT_NAME,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry_name())
    }
}

/// Base trait for all table entries
pub trait TableEntry: ObjectKind {
    /// Table holding entries of this kind
    const KIND: TableKind;

    /// Get the entry's name
    fn name(&self) -> &str;

    /// Set the entry's name
    fn set_name(&mut self, name: String);

    fn common(&self) -> &ObjectCommon;

    fn common_mut(&mut self) -> &mut ObjectCommon;

    /// Check if this is a standard/default entry
    fn is_standard(&self) -> bool {
        false
    }
}

/// Generic table for storing named entries
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    pub object: ObjectCommon,
    /// Entries keyed by upper-case name: (original name, entry)
    entries: IndexMap<String, (String, OwnedRef<T>)>,
}

impl<T: TableEntry> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Table {
            object: ObjectCommon::new(),
            entries: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> TableKind {
        T::KIND
    }

    /// Add an entry to the table
    pub fn add(&mut self, name: &str, entry: OwnedRef<T>) -> Result<()> {
        let key = name.to_uppercase();
        if self.entries.contains_key(&key) {
            return Err(CadError::DuplicateName {
                collection: T::KIND.entry_name(),
                name: name.to_string(),
            });
        }
        self.entries.insert(key, (name.to_string(), entry));
        Ok(())
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<OwnedRef<T>> {
        self.entries.get(&name.to_uppercase()).map(|(_, e)| *e)
    }

    /// Remove an entry by name (case-insensitive); the entry object stays
    /// in the document
    pub(crate) fn remove(&mut self, name: &str) -> Option<OwnedRef<T>> {
        self.entries
            .shift_remove(&name.to_uppercase())
            .map(|(_, e)| e)
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    /// Check if the entry with this handle belongs to the table
    pub fn contains_handle(&self, handle: Handle) -> bool {
        self.entries.values().any(|(_, e)| e.handle() == handle)
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (name, entry) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, OwnedRef<T>)> {
        self.entries.values().map(|(name, e)| (name.as_str(), *e))
    }

    /// Get all entry names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(name, _)| name.as_str())
    }

    /// Handles of all entries in insertion order
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.entries.values().map(|(_, e)| e.handle())
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObjectLinks for Table<T> {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.entries.retain(|_, (_, entry)| entry.remap(map));
    }

    fn owned_links(&self, out: &mut Vec<Handle>) {
        out.extend(self.entries.values().map(|(_, e)| e.handle()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_ref(value: u64) -> OwnedRef<Layer> {
        OwnedRef::new(Handle::new(value))
    }

    #[test]
    fn test_table_add_and_get() {
        let mut table: Table<Layer> = Table::new();
        assert!(table.add("Test", layer_ref(1)).is_ok());
        assert!(table.contains("Test"));
        assert!(table.contains("test"));
        assert_eq!(table.get("TEST"), Some(layer_ref(1)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_duplicate_entry() {
        let mut table: Table<Layer> = Table::new();
        table.add("Test", layer_ref(1)).unwrap();
        let err = table.add("test", layer_ref(2)).unwrap_err();
        assert!(matches!(err, CadError::DuplicateName { collection: "LAYER", .. }));
        assert_eq!(table.get("Test"), Some(layer_ref(1)));
    }

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table: Table<Layer> = Table::new();
        for (i, name) in ["Z", "a", "M"].iter().enumerate() {
            table.add(name, layer_ref(i as u64 + 1)).unwrap();
        }
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["Z", "a", "M"]);
    }

    #[test]
    fn test_remap_drops_removed_entries() {
        let mut table: Table<Layer> = Table::new();
        table.add("A", layer_ref(1)).unwrap();
        table.add("B", layer_ref(2)).unwrap();

        table.remap_links(&mut |h| if h.value() == 1 { Handle::NULL } else { h });

        assert!(!table.contains("A"));
        assert!(table.contains_handle(Handle::new(2)));
        let mut owned = Vec::new();
        table.owned_links(&mut owned);
        assert_eq!(owned, vec![Handle::new(2)]);
    }
}

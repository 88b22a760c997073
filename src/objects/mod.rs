//! Non-graphical objects (OBJECTS section)
//!
//! Objects are non-graphical elements of a document, such as dictionaries,
//! layouts, groups, and other organizational structures. Dictionaries form a
//! tree below the root dictionary; entries are owned by their dictionary.

mod dictionary_variable;
mod group;
mod xrecord;

pub use dictionary_variable::DictionaryVariable;
pub use group::Group;
pub use xrecord::{DictionaryCloningFlags, XRecord, XRecordEntry, XRecordValue};

use indexmap::IndexMap;

use crate::error::{CadError, Result};
use crate::object::{CadObject, ObjectCommon, ObjectLinks};
use crate::tables::BlockRecord;
use crate::types::{Handle, ObjectRef, OwnedRef, Vector3};

/// Ordered, case-insensitive map of dictionary entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictionaryEntries {
    /// Upper-case key: (original key, entry)
    entries: IndexMap<String, (String, OwnedRef)>,
}

impl DictionaryEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; an existing key is left untouched
    pub fn add(&mut self, key: &str, entry: OwnedRef) -> Result<()> {
        let upper = key.to_uppercase();
        if self.entries.contains_key(&upper) {
            return Err(CadError::DuplicateName {
                collection: "DICTIONARY",
                name: key.to_string(),
            });
        }
        self.entries.insert(upper, (key.to_string(), entry));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<OwnedRef> {
        self.entries.get(&key.to_uppercase()).map(|(_, e)| *e)
    }

    pub fn remove(&mut self, key: &str) -> Option<OwnedRef> {
        self.entries
            .shift_remove(&key.to_uppercase())
            .map(|(_, e)| e)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_uppercase())
    }

    /// Key under which the object with this handle is stored
    pub fn key_of(&self, handle: Handle) -> Option<&str> {
        self.entries
            .values()
            .find(|(_, e)| e.handle() == handle)
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (key, entry) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, OwnedRef)> {
        self.entries.values().map(|(k, e)| (k.as_str(), *e))
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.entries.values().map(|(_, e)| e.handle())
    }

    fn remap(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.entries.retain(|_, (_, entry)| entry.remap(map));
    }
}

/// Dictionary object - stores named entries of any kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    pub object: ObjectCommon,
    pub entries: DictionaryEntries,
    /// Hard owner flag (code 280)
    pub hard_owner: bool,
    /// Duplicate record cloning flag (code 281)
    pub cloning: DictionaryCloningFlags,
}

impl Dictionary {
    /// Group dictionary key in the root dictionary
    pub const ACAD_GROUP: &'static str = "ACAD_GROUP";
    /// Layout dictionary key in the root dictionary
    pub const ACAD_LAYOUT: &'static str = "ACAD_LAYOUT";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, key: &str, entry: OwnedRef) -> Result<()> {
        self.entries.add(key, entry)
    }

    pub fn get(&self, key: &str) -> Option<OwnedRef> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OwnedRef> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ObjectLinks for Dictionary {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.entries.remap(map);
    }

    fn owned_links(&self, out: &mut Vec<Handle>) {
        out.extend(self.entries.handles());
    }
}

/// Dictionary returning a default entry when a key is missing
/// (ACDBDICTIONARYWDFLT)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictionaryWithDefault {
    pub object: ObjectCommon,
    pub entries: DictionaryEntries,
    pub cloning: DictionaryCloningFlags,
    /// Default entry (code 340, hard pointer)
    pub default_entry: ObjectRef,
}

impl DictionaryWithDefault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, key: &str, entry: OwnedRef) -> Result<()> {
        self.entries.add(key, entry)
    }

    /// Entry stored under the key, the default entry otherwise
    pub fn lookup(&self, key: &str) -> Option<ObjectRef> {
        match self.entries.get(key) {
            Some(entry) => Some(ObjectRef::new(entry.handle())),
            None if !self.default_entry.is_null() => Some(self.default_entry),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ObjectLinks for DictionaryWithDefault {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.entries.remap(map);
        self.default_entry.remap(map);
    }

    fn owned_links(&self, out: &mut Vec<Handle>) {
        out.extend(self.entries.handles());
    }
}

/// Layout object - represents a layout (model space or paper space)
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub object: ObjectCommon,
    /// Layout name, the key in the ACAD_LAYOUT dictionary
    pub name: String,
    pub flags: i16,
    pub tab_order: i16,
    pub min_limits: (f64, f64),
    pub max_limits: (f64, f64),
    pub insertion_base: Vector3,
    /// Block record holding the layout's entities (code 330)
    pub block_record: ObjectRef<BlockRecord>,
}

impl Layout {
    /// Name of the model space layout
    pub const MODEL: &'static str = "Model";
    /// Name of the default paper space layout
    pub const PAPER: &'static str = "Layout1";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            object: ObjectCommon::new(),
            name: name.into(),
            flags: 0,
            tab_order: 0,
            min_limits: (0.0, 0.0),
            max_limits: (12.0, 9.0),
            insertion_base: Vector3::ZERO,
            block_record: ObjectRef::NULL,
        }
    }

    pub fn is_model(&self) -> bool {
        self.name.eq_ignore_ascii_case(Self::MODEL)
    }
}

impl ObjectLinks for Layout {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.block_record.remap(map);
    }
}

/// Object of a record kind without a dedicated model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnknownObject {
    pub object: ObjectCommon,
    /// Record name as found in the source
    pub record_name: String,
}

impl UnknownObject {
    pub fn new(record_name: impl Into<String>) -> Self {
        Self {
            object: ObjectCommon::new(),
            record_name: record_name.into(),
        }
    }
}

impl ObjectLinks for UnknownObject {}

/// Entries of a dictionary kind, `None` for any other object
pub(crate) fn dictionary_entries_mut(object: &mut CadObject) -> Option<&mut DictionaryEntries> {
    match object {
        CadObject::Dictionary(d) => Some(&mut d.entries),
        CadObject::DictionaryWithDefault(d) => Some(&mut d.entries),
        _ => None,
    }
}

pub(crate) fn dictionary_entries(object: &CadObject) -> Option<&DictionaryEntries> {
    match object {
        CadObject::Dictionary(d) => Some(&d.entries),
        CadObject::DictionaryWithDefault(d) => Some(&d.entries),
        _ => None,
    }
}

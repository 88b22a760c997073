//! XRecord object - Extended record storage for arbitrary data
//!
//! An XRecord stores tagged values the document does not interpret. Values
//! in the handle code ranges are real references: they follow renumbering
//! and are nulled when their target is removed.

use crate::object::{ObjectCommon, ObjectLinks};
use crate::types::{Handle, Vector3};

/// Duplicate record cloning behaviour (code 280/281)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DictionaryCloningFlags {
    NotApplicable = 0,
    /// Keep existing record
    #[default]
    KeepExisting = 1,
    UseClone = 2,
    /// XRef name-based cloning
    XrefName = 3,
    /// Name-based cloning
    Name = 4,
    UnmangleName = 5,
}

impl DictionaryCloningFlags {
    pub fn from_value(value: i16) -> Self {
        match value {
            0 => DictionaryCloningFlags::NotApplicable,
            2 => DictionaryCloningFlags::UseClone,
            3 => DictionaryCloningFlags::XrefName,
            4 => DictionaryCloningFlags::Name,
            5 => DictionaryCloningFlags::UnmangleName,
            _ => DictionaryCloningFlags::KeepExisting,
        }
    }

    pub fn value(&self) -> i16 {
        *self as i16
    }
}

/// XRecord entry value
#[derive(Debug, Clone, PartialEq)]
pub enum XRecordValue {
    String(String),
    Double(f64),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Bool(bool),
    /// Handle/Object reference
    Handle(Handle),
    Point3D(Vector3),
    /// Binary data chunk
    Chunk(Vec<u8>),
}

impl XRecordValue {
    pub fn as_string(&self) -> Option<&str> {
        match self {
            XRecordValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            XRecordValue::Handle(h) => Some(*h),
            _ => None,
        }
    }
}

/// XRecord entry with group code and value
#[derive(Debug, Clone, PartialEq)]
pub struct XRecordEntry {
    /// Group code
    pub code: i32,
    pub value: XRecordValue,
}

impl XRecordEntry {
    pub fn new(code: i32, value: XRecordValue) -> Self {
        Self { code, value }
    }

    /// Whether the group code designates a handle
    pub fn is_reference_code(code: i32) -> bool {
        matches!(code, 320..=369 | 390..=399 | 480..=481 | 1005)
    }
}

/// XRecord object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XRecord {
    pub object: ObjectCommon,
    pub cloning: DictionaryCloningFlags,
    pub entries: Vec<XRecordEntry>,
}

impl XRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: XRecordEntry) {
        self.entries.push(entry);
    }

    pub fn add_string(&mut self, code: i32, value: impl Into<String>) {
        self.add_entry(XRecordEntry::new(code, XRecordValue::String(value.into())));
    }

    pub fn add_handle(&mut self, code: i32, value: Handle) {
        self.add_entry(XRecordEntry::new(code, XRecordValue::Handle(value)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handles stored in the record
    pub fn references(&self) -> Vec<Handle> {
        self.entries
            .iter()
            .filter_map(|e| e.value.as_handle())
            .filter(|h| h.is_valid())
            .collect()
    }
}

impl ObjectLinks for XRecord {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        for entry in self.entries.iter_mut() {
            if let XRecordValue::Handle(h) = &mut entry.value {
                if h.is_valid() {
                    *h = map(*h);
                }
            }
        }
    }
}

//! Decomposed object records.
//!
//! An [`ObjectRecord`] is the flat form of one object: its record name, its
//! handle and owner, a list of coded primitive values and a list of coded
//! outgoing handles tagged with their [`ReferenceType`]. Format writers turn
//! records into bytes; the core never does.

use crate::io::reference_type::ReferenceType;
use crate::types::{Handle, Vector3};

/// A primitive value of a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Double(f64),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Bool(bool),
    Point(Vector3),
    Bytes(Vec<u8>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int16(v) => Some(i64::from(*v)),
            FieldValue::Int32(v) => Some(i64::from(*v)),
            FieldValue::Int64(v) => Some(*v),
            _ => None,
        }
    }
}

/// An outgoing handle of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleReference {
    pub code: i32,
    pub reference_type: ReferenceType,
    pub handle: Handle,
}

/// One object as primitive fields plus outgoing handles
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    /// Record name ("LINE", "LAYER", "DICTIONARY", ...)
    pub type_name: &'static str,
    pub handle: Handle,
    /// Owner handle; null when the document owns the object
    pub owner: Handle,
    pub fields: Vec<(i32, FieldValue)>,
    pub references: Vec<HandleReference>,
}

impl ObjectRecord {
    pub fn new(type_name: &'static str, handle: Handle, owner: Handle) -> Self {
        Self {
            type_name,
            handle,
            owner,
            fields: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn write_string(&mut self, code: i32, value: impl Into<String>) {
        self.fields.push((code, FieldValue::String(value.into())));
    }

    pub fn write_double(&mut self, code: i32, value: f64) {
        self.fields.push((code, FieldValue::Double(value)));
    }

    pub fn write_i16(&mut self, code: i32, value: i16) {
        self.fields.push((code, FieldValue::Int16(value)));
    }

    pub fn write_i32(&mut self, code: i32, value: i32) {
        self.fields.push((code, FieldValue::Int32(value)));
    }

    pub fn write_i64(&mut self, code: i32, value: i64) {
        self.fields.push((code, FieldValue::Int64(value)));
    }

    pub fn write_bool(&mut self, code: i32, value: bool) {
        self.fields.push((code, FieldValue::Bool(value)));
    }

    /// Point stored under its X code (10, 11, ...)
    pub fn write_point(&mut self, code: i32, value: Vector3) {
        self.fields.push((code, FieldValue::Point(value)));
    }

    pub fn write_bytes(&mut self, code: i32, value: Vec<u8>) {
        self.fields.push((code, FieldValue::Bytes(value)));
    }

    /// Record an outgoing handle; null handles are skipped
    pub fn write_reference(&mut self, code: i32, reference_type: ReferenceType, handle: Handle) {
        if handle.is_valid() {
            self.references.push(HandleReference {
                code,
                reference_type,
                handle,
            });
        }
    }

    /// First value stored under a code
    pub fn field(&self, code: i32) -> Option<&FieldValue> {
        self.fields.iter().find(|(c, _)| *c == code).map(|(_, v)| v)
    }

    /// Handles of the objects this record owns, in record order
    pub fn owned_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.references
            .iter()
            .filter(|r| r.reference_type.is_ownership())
            .map(|r| r.handle)
    }

    pub fn references_of(
        &self,
        reference_type: ReferenceType,
    ) -> impl Iterator<Item = Handle> + '_ {
        self.references
            .iter()
            .filter(move |r| r.reference_type == reference_type)
            .map(|r| r.handle)
    }
}

//! Application ID table entry

use super::{table_entry, TableKind};
use crate::object::{ObjectCommon, ObjectLinks};

/// An application ID table entry (keys extended data)
#[derive(Debug, Clone, PartialEq)]
pub struct AppId {
    pub object: ObjectCommon,
    /// Application name
    pub name: String,
    /// Standard flags (code 70)
    pub flags: i16,
}

impl AppId {
    pub const ACAD: &'static str = "ACAD";
    pub(crate) const STANDARD_NAMES: &'static [&'static str] = &[Self::ACAD];

    /// Create a new application ID
    pub fn new(name: impl Into<String>) -> Self {
        AppId {
            object: ObjectCommon::new(),
            name: name.into(),
            flags: 0,
        }
    }

    /// Create the standard "ACAD" application ID
    pub fn acad() -> Self {
        Self::new(Self::ACAD)
    }
}

impl ObjectLinks for AppId {}

table_entry!(AppId, TableKind::AppId);

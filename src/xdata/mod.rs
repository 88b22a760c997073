//! Extended Data (XDATA) support
//!
//! Extended data is application-specific data that can be attached to any
//! object. Each record belongs to one registered application, referenced
//! through its [`AppId`] table entry. Values are opaque to the document,
//! except for handle values which follow renumbering like any other
//! reference.

use indexmap::IndexMap;

use crate::tables::AppId;
use crate::types::{Handle, ObjectRef, Vector3};

/// Extended data value types
#[derive(Debug, Clone, PartialEq)]
pub enum XDataValue {
    /// String value (group code 1000)
    String(String),
    /// Control string (group code 1002) - "{" or "}"
    ControlString(String),
    /// Layer name (group code 1003)
    LayerName(String),
    /// Binary data (group code 1004)
    BinaryData(Vec<u8>),
    /// Database handle (group code 1005)
    Handle(Handle),
    /// 3D point (group codes 1010, 1020, 1030)
    Point3D(Vector3),
    /// Real value (group code 1040)
    Real(f64),
    /// Distance (group code 1041)
    Distance(f64),
    /// Scale factor (group code 1042)
    ScaleFactor(f64),
    /// 16-bit integer (group code 1070)
    Integer16(i16),
    /// 32-bit integer (group code 1071)
    Integer32(i32),
}

impl XDataValue {
    /// Group code of the value
    pub fn code(&self) -> i32 {
        match self {
            XDataValue::String(_) => 1000,
            XDataValue::ControlString(_) => 1002,
            XDataValue::LayerName(_) => 1003,
            XDataValue::BinaryData(_) => 1004,
            XDataValue::Handle(_) => 1005,
            XDataValue::Point3D(_) => 1010,
            XDataValue::Real(_) => 1040,
            XDataValue::Distance(_) => 1041,
            XDataValue::ScaleFactor(_) => 1042,
            XDataValue::Integer16(_) => 1070,
            XDataValue::Integer32(_) => 1071,
        }
    }
}

/// Values attached by a single application
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedDataRecord {
    pub values: Vec<XDataValue>,
}

impl ExtendedDataRecord {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Create a record holding the given values
    pub fn with_values(values: Vec<XDataValue>) -> Self {
        Self { values }
    }

    /// Add a value to the record
    pub fn add_value(&mut self, value: XDataValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extended data of one object, keyed by application
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedData {
    records: IndexMap<ObjectRef<AppId>, ExtendedDataRecord>,
}

impl ExtendedData {
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }

    /// Attach a record; an existing record of the same application is replaced
    pub fn insert(&mut self, app: ObjectRef<AppId>, record: ExtendedDataRecord) {
        self.records.insert(app, record);
    }

    /// Get the record of an application
    pub fn get(&self, app: ObjectRef<AppId>) -> Option<&ExtendedDataRecord> {
        self.records.get(&app)
    }

    /// Iterate over records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectRef<AppId>, &ExtendedDataRecord)> {
        self.records.iter().map(|(app, record)| (*app, record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remap application keys and handle values.
    ///
    /// Records whose application disappears are dropped; handle values that
    /// map to null are kept as null handles.
    pub(crate) fn remap(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        if self.records.is_empty() {
            return;
        }
        let records = std::mem::take(&mut self.records);
        for (mut app, mut record) in records {
            if !app.remap(map) {
                continue;
            }
            for value in record.values.iter_mut() {
                if let XDataValue::Handle(h) = value {
                    if h.is_valid() {
                        *h = map(*h);
                    }
                }
            }
            self.records.insert(app, record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let mut record = ExtendedDataRecord::new();
        assert!(record.is_empty());

        record.add_value(XDataValue::String("test".to_string()));
        assert_eq!(record.len(), 1);
        assert_eq!(record.values[0].code(), 1000);
    }

    #[test]
    fn test_keyed_by_application() {
        let mut xdata = ExtendedData::new();
        let app = ObjectRef::new(Handle::new(0x12));
        xdata.insert(app, ExtendedDataRecord::with_values(vec![XDataValue::Real(2.5)]));
        xdata.insert(app, ExtendedDataRecord::with_values(vec![XDataValue::Integer16(7)]));

        assert_eq!(xdata.len(), 1);
        assert_eq!(xdata.get(app).map(|r| r.values.clone()), Some(vec![XDataValue::Integer16(7)]));
        assert!(xdata.get(ObjectRef::new(Handle::new(0x13))).is_none());
    }

    #[test]
    fn test_remap_drops_removed_application() {
        let mut xdata = ExtendedData::new();
        xdata.insert(
            ObjectRef::new(Handle::new(1)),
            ExtendedDataRecord::with_values(vec![XDataValue::Handle(Handle::new(8))]),
        );
        xdata.insert(ObjectRef::new(Handle::new(2)), ExtendedDataRecord::new());

        xdata.remap(&mut |h| match h.value() {
            1 => Handle::new(10),
            2 => Handle::NULL,
            8 => Handle::new(80),
            _ => h,
        });

        assert_eq!(xdata.len(), 1);
        let record = xdata.get(ObjectRef::new(Handle::new(10)));
        assert_eq!(
            record.map(|r| r.values.clone()),
            Some(vec![XDataValue::Handle(Handle::new(80))])
        );
    }
}

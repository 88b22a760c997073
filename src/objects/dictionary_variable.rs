//! DictionaryVariable object implementation.
//!
//! A simple object that stores a named value in a dictionary; the name is
//! the dictionary key.

use crate::object::{ObjectCommon, ObjectLinks};

/// Dictionary variable object (DICTIONARYVAR).
///
/// - 280: Object schema number
/// - 1: Value string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictionaryVariable {
    pub object: ObjectCommon,
    /// Object schema number
    pub schema_number: i16,
    /// The variable value
    pub value: String,
}

impl DictionaryVariable {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            object: ObjectCommon::new(),
            schema_number: 0,
            value: value.into(),
        }
    }

    /// Value parsed as integer
    pub fn as_i64(&self) -> Option<i64> {
        self.value.trim().parse().ok()
    }

    /// Value parsed as float
    pub fn as_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }
}

impl ObjectLinks for DictionaryVariable {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(DictionaryVariable::new(" 42 ").as_i64(), Some(42));
        assert_eq!(DictionaryVariable::new("0.5").as_f64(), Some(0.5));
        assert_eq!(DictionaryVariable::new("Model").as_i64(), None);
    }
}

//! Group object - Named collection of entities

use crate::object::{ObjectCommon, ObjectLinks};
use crate::types::{Handle, ObjectRef};

/// Group object - a named selection of entities
///
/// Groups do not own their members; removing an entity only drops it from
/// the group.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub object: ObjectCommon,
    /// Group name, the key in the ACAD_GROUP dictionary
    pub name: String,
    /// Group description (code 300)
    pub description: String,
    /// Members (code 340, hard pointer)
    pub entities: Vec<ObjectRef>,
    /// Group is selectable (code 71)
    pub selectable: bool,
}

impl Group {
    /// Create a new named group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            object: ObjectCommon::new(),
            name: name.into(),
            description: String::new(),
            entities: Vec::new(),
            selectable: true,
        }
    }

    /// Check if the group is unnamed (name starts with "*")
    pub fn is_unnamed(&self) -> bool {
        self.name.starts_with('*')
    }

    /// Add an entity; duplicates are ignored
    pub fn add_entity(&mut self, entity: ObjectRef) {
        if !entity.is_null() && !self.entities.contains(&entity) {
            self.entities.push(entity);
        }
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.entities.iter().any(|e| e.handle() == handle)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl ObjectLinks for Group {
    fn remap_links(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        crate::types::reference::remap_all(&mut self.entities, |e| e.remap(map));
    }
}

//! CAD document structure
//!
//! A [`CadDocument`] owns the handle registry holding every object, the
//! header handles pointing at its well-known objects, and the notifications
//! collected while it was built.

use crate::entities::Entity;
use crate::error::{CadError, Result};
use crate::io::HeaderHandlesCollection;
use crate::notification::NotificationCollection;
use crate::object::{CadObject, ObjectKind};
use crate::objects::{dictionary_entries, dictionary_entries_mut, Dictionary, Layout};
use crate::registry::HandleRegistry;
use crate::tables::*;
use crate::types::{DocumentId, Handle, ObjectRef, OwnedRef};

/// A CAD document
#[derive(Debug, Clone)]
pub struct CadDocument {
    registry: HandleRegistry,
    header: HeaderHandlesCollection,
    notifications: NotificationCollection,
}

impl CadDocument {
    /// Create a document with the standard tables, entries and dictionaries
    pub fn new() -> Self {
        let mut doc = Self::empty();
        // Cannot fail on an empty registry
        doc.initialize_defaults().ok();
        doc
    }

    /// A document without any object, filled by the builder
    pub(crate) fn empty() -> Self {
        CadDocument {
            registry: HandleRegistry::new(),
            header: HeaderHandlesCollection::new(),
            notifications: NotificationCollection::new(),
        }
    }

    fn initialize_defaults(&mut self) -> Result<()> {
        for kind in TableKind::ALL {
            self.create_table(kind)?;
        }

        self.add_entry(AppId::acad())?;

        let by_block = self.add_entry(LineType::by_block())?;
        let by_layer = self.add_entry(LineType::by_layer())?;
        let continuous = self.add_entry(LineType::continuous())?;
        self.header.set_byblock(by_block);
        self.header.set_bylayer(by_layer);
        self.header.set_continuous(continuous);
        self.header.set_celtype(by_layer);

        let mut layer0 = Layer::layer_0();
        layer0.linetype = ObjectRef::new(continuous);
        let layer0 = self.add_entry(layer0)?;
        self.header.set_clayer(layer0);

        let standard_style = self.add_entry(TextStyle::standard())?;
        self.header.set_textstyle(standard_style);

        let mut standard_dimstyle = DimStyle::standard();
        standard_dimstyle.text_style = ObjectRef::new(standard_style);
        let standard_dimstyle = self.add_entry(standard_dimstyle)?;
        self.header.set_dimstyle(standard_dimstyle);

        let model_space = self.add_entry(BlockRecord::model_space())?;
        let paper_space = self.add_entry(BlockRecord::paper_space())?;
        self.header.set_model_space(model_space);
        self.header.set_paper_space(paper_space);

        let root = self.registry.insert(Dictionary::new())?;
        self.header.set_dictionary_named_objects(root);
        let groups = self.add_dictionary_entry(root, Dictionary::ACAD_GROUP, Dictionary::new())?;
        self.header.set_dictionary_acad_group(groups);
        let layouts = self.add_dictionary_entry(root, Dictionary::ACAD_LAYOUT, Dictionary::new())?;
        self.header.set_dictionary_layouts(layouts);

        for (name, record) in [(Layout::MODEL, model_space), (Layout::PAPER, paper_space)] {
            let mut layout = Layout::new(name);
            layout.block_record = ObjectRef::new(record);
            let layout = self.add_dictionary_entry(layouts, name, layout)?;
            if let Some(r) = self.registry.try_lookup_mut::<BlockRecord>(record) {
                r.layout = ObjectRef::new(layout);
            }
        }
        Ok(())
    }

    /// Insert an empty table of the given kind and record it in the header
    pub(crate) fn create_table(&mut self, kind: TableKind) -> Result<Handle> {
        let table: CadObject = match kind {
            TableKind::AppId => Table::<AppId>::new().into(),
            TableKind::BlockRecord => Table::<BlockRecord>::new().into(),
            TableKind::DimStyle => Table::<DimStyle>::new().into(),
            TableKind::Layer => Table::<Layer>::new().into(),
            TableKind::LineType => Table::<LineType>::new().into(),
            TableKind::TextStyle => Table::<TextStyle>::new().into(),
        };
        let handle = self.registry.insert(table)?;
        self.header.set_table_control(kind, handle);
        Ok(handle)
    }

    /// Identity of this document
    pub fn id(&self) -> DocumentId {
        self.registry.document_id()
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut HandleRegistry {
        &mut self.registry
    }

    pub fn header(&self) -> &HeaderHandlesCollection {
        &self.header
    }

    pub(crate) fn header_mut(&mut self) -> &mut HeaderHandlesCollection {
        &mut self.header
    }

    /// Notifications collected while the document was built
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    pub(crate) fn set_notifications(&mut self, notifications: NotificationCollection) {
        self.notifications = notifications;
    }

    /// Iterate over every object of the document
    pub fn objects(&self) -> impl Iterator<Item = &CadObject> {
        self.registry.iter()
    }

    pub fn get(&self, handle: Handle) -> Option<&CadObject> {
        self.registry.get(handle)
    }

    pub fn try_lookup<T: ObjectKind>(&self, handle: Handle) -> Option<&T> {
        self.registry.try_lookup(handle)
    }

    pub fn try_lookup_mut<T: ObjectKind>(&mut self, handle: Handle) -> Option<&mut T> {
        self.registry.try_lookup_mut(handle)
    }

    /// The table holding entries of kind `T`
    pub fn table<T: TableEntry>(&self) -> Option<&Table<T>>
    where
        Table<T>: ObjectKind,
    {
        let handle = self.header.table_control(T::KIND)?;
        self.registry.try_lookup::<Table<T>>(handle)
    }

    /// Table entry by name (case-insensitive)
    pub fn get_entry<T: TableEntry>(&self, name: &str) -> Option<&T>
    where
        Table<T>: ObjectKind,
    {
        let entry = self.table::<T>()?.get(name)?;
        self.registry.try_lookup::<T>(entry.handle())
    }

    /// Add an entry to its table; the entry's name must be unused
    pub fn add_entry<T: TableEntry>(&mut self, mut entry: T) -> Result<Handle>
    where
        Table<T>: ObjectKind,
    {
        let table = self.header.table_control(T::KIND).ok_or_else(|| {
            CadError::StructuralViolation(format!("document has no {} table", T::KIND))
        })?;
        let name = entry.name().to_string();
        if self.registry.expect_kind::<Table<T>>(table)?.contains(&name) {
            return Err(CadError::DuplicateName {
                collection: T::KIND.entry_name(),
                name,
            });
        }

        entry.common_mut().owner = ObjectRef::new(table);
        let handle = self.registry.insert(entry.into_object())?;
        if let Some(t) = self.registry.try_lookup_mut::<Table<T>>(table) {
            t.add(&name, OwnedRef::new(handle))?;
        }
        Ok(handle)
    }

    pub fn model_space_handle(&self) -> Option<Handle> {
        self.header.model_space()
    }

    pub fn model_space(&self) -> Option<&BlockRecord> {
        self.registry.try_lookup(self.header.model_space()?)
    }

    /// Add an entity to model space
    pub fn add_entity<E: Entity + ObjectKind>(&mut self, entity: E) -> Result<Handle> {
        let model_space = self.header.model_space().ok_or_else(|| {
            CadError::StructuralViolation("document has no model space".to_string())
        })?;
        self.add_entity_to_block(model_space, entity)
    }

    /// Add an entity to a block record; an unset layer defaults to the current layer
    pub fn add_entity_to_block<E: Entity + ObjectKind>(
        &mut self,
        block_record: Handle,
        mut entity: E,
    ) -> Result<Handle> {
        self.registry.expect_kind::<BlockRecord>(block_record)?;

        if entity.layer().is_null() {
            if let Some(layer) = self.header.clayer() {
                entity.set_layer(ObjectRef::new(layer));
            }
        }
        let mut object = entity.into_object();
        object.common_mut().owner = ObjectRef::new(block_record);

        let handle = self.registry.insert(object)?;
        if let Some(record) = self.registry.try_lookup_mut::<BlockRecord>(block_record) {
            record.add_entity(OwnedRef::new(handle));
        }
        Ok(handle)
    }

    pub fn root_dictionary_handle(&self) -> Option<Handle> {
        self.header.dictionary_named_objects()
    }

    pub fn root_dictionary(&self) -> Option<&Dictionary> {
        self.registry.try_lookup(self.header.dictionary_named_objects()?)
    }

    /// Add an object to a dictionary under `key`.
    ///
    /// A named object without a name takes the key as its name.
    pub fn add_dictionary_entry(
        &mut self,
        dictionary: Handle,
        key: &str,
        object: impl Into<CadObject>,
    ) -> Result<Handle> {
        let dict = self
            .registry
            .get(dictionary)
            .ok_or(CadError::ObjectNotFound(dictionary))?;
        let entries = dictionary_entries(dict).ok_or(CadError::TypeMismatch {
            handle: dictionary,
            expected: Dictionary::OBJECT_NAME,
            found: dict.object_name(),
        })?;
        if entries.contains(key) {
            return Err(CadError::DuplicateName {
                collection: Dictionary::OBJECT_NAME,
                name: key.to_string(),
            });
        }

        let mut object = object.into();
        if object.entry_name() == Some("") {
            object.set_entry_name(key);
        }
        object.common_mut().owner = ObjectRef::new(dictionary);

        let handle = self.registry.insert(object)?;
        if let Some(entries) = self.registry.get_mut(dictionary).and_then(dictionary_entries_mut) {
            entries.add(key, OwnedRef::new(handle))?;
        }
        Ok(handle)
    }

    /// Entry of a dictionary by key; dictionaries with a default entry fall
    /// back to it
    pub fn dictionary_lookup(&self, dictionary: Handle, key: &str) -> Option<&CadObject> {
        let target = match self.registry.get(dictionary)? {
            CadObject::Dictionary(d) => d.get(key)?.handle(),
            CadObject::DictionaryWithDefault(d) => d.lookup(key)?.handle(),
            _ => return None,
        };
        self.registry.get(target)
    }

    /// Extended dictionary of an object, created on first use
    pub fn create_extended_dictionary(&mut self, handle: Handle) -> Result<Handle> {
        let object = self
            .registry
            .get(handle)
            .ok_or(CadError::ObjectNotFound(handle))?;
        if let Some(xdict) = object.common().xdictionary {
            if self.registry.contains(xdict.handle()) {
                return Ok(xdict.handle());
            }
        }

        let mut xdict = Dictionary::new();
        xdict.object.owner = ObjectRef::new(handle);
        xdict.hard_owner = true;
        let xdict = self.registry.insert(xdict)?;
        if let Some(object) = self.registry.get_mut(handle) {
            object.common_mut().xdictionary = Some(OwnedRef::new(xdict));
        }
        Ok(xdict)
    }

    /// Register `reactor` as a listener of `target`
    pub fn add_reactor(&mut self, target: Handle, reactor: Handle) -> Result<bool> {
        if !self.registry.contains(reactor) {
            return Err(CadError::ObjectNotFound(reactor));
        }
        let object = self
            .registry
            .get_mut(target)
            .ok_or(CadError::ObjectNotFound(target))?;
        Ok(object.common_mut().add_reactor(ObjectRef::new(reactor)))
    }

    /// Remove an object with everything it owns.
    ///
    /// References held by other objects and by the header become null;
    /// collections drop the removed members.
    pub fn remove(&mut self, handle: Handle) -> Option<CadObject> {
        let (object, removed) = self.registry.detach(handle)?;
        self.header
            .remap(&mut |h| if removed.contains(&h) { Handle::NULL } else { h });
        Some(object)
    }

    /// Remove a table entry by name (case-insensitive) with the same cascade
    /// as [`CadDocument::remove`]
    pub fn remove_entry<T: TableEntry>(&mut self, name: &str) -> Option<CadObject>
    where
        Table<T>: ObjectKind,
    {
        let handle = self.table::<T>()?.get(name)?.handle();
        self.remove(handle)
    }

    /// Renumber every handle from `max(seed, 1)`, keeping relative order
    pub fn restore_handles(&mut self, seed: u64) -> Result<()> {
        let mapping = self.registry.restore_handles(seed)?;
        self.header
            .remap(&mut |h| mapping.get(&h).copied().unwrap_or(Handle::NULL));
        Ok(())
    }
}

impl Default for CadDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Block, Line};
    use crate::objects::DictionaryWithDefault;
    use crate::types::Vector3;

    #[test]
    fn test_default_skeleton() {
        let doc = CadDocument::new();
        for kind in TableKind::ALL {
            assert!(doc.header().table_control(kind).is_some(), "{kind} table");
        }
        assert!(doc.get_entry::<Layer>("0").is_some());
        assert!(doc.get_entry::<LineType>("bylayer").is_some());
        assert!(doc.get_entry::<LineType>("CONTINUOUS").is_some());
        assert!(doc.get_entry::<TextStyle>("Standard").is_some());
        assert!(doc.get_entry::<DimStyle>("Standard").is_some());
        assert!(doc.get_entry::<AppId>("ACAD").is_some());

        let model = doc.model_space().unwrap();
        assert!(doc.try_lookup::<Block>(model.block.handle()).is_some());
        assert!(!model.layout.is_null());

        let root = doc.root_dictionary().unwrap();
        assert!(root.contains(Dictionary::ACAD_GROUP));
        assert!(root.contains(Dictionary::ACAD_LAYOUT));
        assert!(doc.notifications().is_empty());
    }

    #[test]
    fn test_layer_zero_uses_continuous() {
        let doc = CadDocument::new();
        let layer = doc.get_entry::<Layer>("0").unwrap();
        assert_eq!(Some(layer.linetype.handle()), doc.header().continuous());
    }

    #[test]
    fn test_add_entry_rejects_duplicate() {
        let mut doc = CadDocument::new();
        doc.add_entry(Layer::new("Walls")).unwrap();
        let err = doc.add_entry(Layer::new("WALLS")).unwrap_err();
        assert!(matches!(err, CadError::DuplicateName { collection: "LAYER", .. }));
        assert_eq!(doc.table::<Layer>().unwrap().len(), 2);
    }

    #[test]
    fn test_add_entity_links_model_space() {
        let mut doc = CadDocument::new();
        let line = doc
            .add_entity(Line::from_points(Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0)))
            .unwrap();

        let model = doc.model_space().unwrap();
        assert!(model.entities.contains(&OwnedRef::new(line)));
        let line = doc.try_lookup::<Line>(line).unwrap();
        assert_eq!(Some(line.object.owner.handle()), doc.model_space_handle());
        assert_eq!(Some(line.common.layer.handle()), doc.header().clayer());
    }

    #[test]
    fn test_remove_entry_nulls_references() {
        let mut doc = CadDocument::new();
        let walls = doc.add_entry(Layer::new("Walls")).unwrap();
        let mut a = Line::new();
        a.common.layer = ObjectRef::new(walls);
        let mut b = Line::new();
        b.common.layer = ObjectRef::new(walls);
        let a = doc.add_entity(a).unwrap();
        let b = doc.add_entity(b).unwrap();

        assert!(doc.remove(walls).is_some());
        assert!(doc.try_lookup::<Line>(a).unwrap().common.layer.is_null());
        assert!(doc.try_lookup::<Line>(b).unwrap().common.layer.is_null());
        assert!(doc.get_entry::<Layer>("Walls").is_none());

        doc.add_entry(Layer::new("Walls")).unwrap();
        assert!(doc.try_lookup::<Line>(a).unwrap().common.layer.is_null());
    }

    #[test]
    fn test_remove_entry_by_name_cascades() {
        let mut doc = CadDocument::new();
        let walls = doc.add_entry(Layer::new("Walls")).unwrap();
        let mut line = Line::new();
        line.common.layer = ObjectRef::new(walls);
        let line = doc.add_entity(line).unwrap();

        let removed = doc.remove_entry::<Layer>("WALLS").unwrap();
        assert_eq!(removed.handle(), walls);
        assert!(doc.get(walls).is_none());
        assert!(doc.get_entry::<Layer>("Walls").is_none());
        assert!(doc.try_lookup::<Line>(line).unwrap().common.layer.is_null());
        assert!(doc.remove_entry::<Layer>("Walls").is_none());
    }

    #[test]
    fn test_remove_current_layer_clears_header() {
        let mut doc = CadDocument::new();
        let layer0 = doc.header().clayer().unwrap();
        doc.remove(layer0);
        assert_eq!(doc.header().clayer(), None);
    }

    #[test]
    fn test_dictionary_entry_takes_key_as_name() {
        let mut doc = CadDocument::new();
        let layouts = doc.header().dictionary_layouts().unwrap();
        let layout = doc.add_dictionary_entry(layouts, "Sheet2", Layout::new("")).unwrap();
        assert_eq!(doc.try_lookup::<Layout>(layout).unwrap().name, "Sheet2");
        assert!(doc.add_dictionary_entry(layouts, "SHEET2", Layout::new("")).is_err());
    }

    #[test]
    fn test_dictionary_lookup_with_default() {
        let mut doc = CadDocument::new();
        let root = doc.root_dictionary_handle().unwrap();
        let styles = doc
            .add_dictionary_entry(root, "ACAD_PLOTSTYLENAME", DictionaryWithDefault::new())
            .unwrap();
        let normal = doc.add_dictionary_entry(styles, "Normal", Dictionary::new()).unwrap();
        let bold = doc.add_dictionary_entry(styles, "Bold", Dictionary::new()).unwrap();
        doc.try_lookup_mut::<DictionaryWithDefault>(styles).unwrap().default_entry =
            ObjectRef::new(normal);

        assert_eq!(doc.dictionary_lookup(styles, "bold").map(|o| o.handle()), Some(bold));
        assert_eq!(doc.dictionary_lookup(styles, "missing").map(|o| o.handle()), Some(normal));
        assert!(doc.dictionary_lookup(root, "missing").is_none());
    }

    #[test]
    fn test_extended_dictionary_created_once() {
        let mut doc = CadDocument::new();
        let line = doc.add_entity(Line::new()).unwrap();
        let xdict = doc.create_extended_dictionary(line).unwrap();
        assert_eq!(doc.create_extended_dictionary(line).unwrap(), xdict);

        doc.remove(line);
        assert!(doc.get(xdict).is_none());
    }

    #[test]
    fn test_reactor_nulled_on_removal() {
        let mut doc = CadDocument::new();
        let a = doc.add_entity(Line::new()).unwrap();
        let b = doc.add_entity(Line::new()).unwrap();
        assert!(doc.add_reactor(a, b).unwrap());
        assert!(!doc.add_reactor(a, b).unwrap());

        doc.remove(b);
        assert!(doc.get(a).unwrap().common().reactors.is_empty());
    }

    #[test]
    fn test_restore_handles_remaps_header() {
        let mut doc = CadDocument::new();
        let layer0 = doc.header().clayer().unwrap();
        let name = doc.get(layer0).unwrap().entry_name().map(str::to_string);

        doc.restore_handles(0x100).unwrap();

        let layer0 = doc.header().clayer().unwrap();
        assert!(layer0.value() >= 0x100);
        assert_eq!(doc.get(layer0).unwrap().entry_name().map(str::to_string), name);
        assert!(doc.get_entry::<Layer>("0").is_some());
        assert_eq!(doc.registry().seed(), 0x100 + doc.registry().len() as u64);
    }
}

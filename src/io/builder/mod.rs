//! Document builder: resolves templates into a final [`CadDocument`].
//!
//! A format reader stores every object it decodes as a [`CadTemplate`]
//! holding raw handle values rather than resolved references. Once every
//! template has been collected the builder runs the resolution phases:
//!
//! 1. **Assign missing handles**: templates with handle 0, or with a handle
//!    already taken, get fresh handles above the highest one in use.
//! 2. **Resolve reachable templates**: a FIFO worklist is seeded from the
//!    header handles; resolving a template enqueues the objects it owns.
//! 3. **Sweep**: every template not reached is resolved in handle order.
//! 4. **Rebuild block records** from their BLOCK markers.
//! 5. **Register** every object into the document, pruning references to
//!    objects that were not kept.
//! 6. **Link the document**: root dictionary, tables, orphan entries and
//!    entities, standard entries and header handles.
//!
//! Resolution never fails: anything that cannot be resolved is reported
//! through the notification channel and left at its default. Only
//! structural violations abort the build.

use std::any::TypeId;
use std::collections::VecDeque;
use std::error::Error;

use ahash::{AHashMap, AHashSet};

use crate::document::CadDocument;
use crate::entities::Block;
use crate::error::{CadError, Result};
use crate::io::header_handles::HeaderHandlesCollection;
use crate::io::templates::{
    CadTemplate, LineTypeFlag, LinkedRange, NamedReference, Referrer, TemplateData,
};
use crate::notification::{NotificationCollection, NotificationHandler, NotificationType, Notifier};
use crate::object::{CadObject, ObjectKind};
use crate::objects::{dictionary_entries, Dictionary};
use crate::tables::*;
use crate::types::{Handle, ObjectRef, OwnedRef};

/// Builder options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuilderConfiguration {
    /// Keep objects of unsupported record kinds as [`CadObject::Unknown`]
    pub keep_unknown_objects: bool,
    /// Highest handle seed the target format can store; exceeding it makes
    /// the builder renumber the document
    pub max_handle_seed: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
struct KindInfo {
    kind: TypeId,
    name: &'static str,
    entity: bool,
}

/// Collects templates and assembles them into a document.
pub struct DocumentBuilder {
    config: BuilderConfiguration,
    header_handles: HeaderHandlesCollection,

    /// All templates by handle
    templates: AHashMap<Handle, CadTemplate>,
    /// Kind of every template, kept while a template is out for resolution
    kinds: AHashMap<Handle, KindInfo>,
    /// Table entries by (table, upper-case name); the lowest handle wins
    names: AHashMap<(TableKind, String), Handle>,
    /// Entries listed by the table of their kind; the first listed wins
    listed: AHashMap<(TableKind, String), Handle>,
    /// Templates with a null or repeated handle
    pending: Vec<CadTemplate>,

    queue: VecDeque<Handle>,
    queued: AHashSet<Handle>,

    notifier: Notifier,
}

impl DocumentBuilder {
    pub fn new(header_handles: HeaderHandlesCollection) -> Self {
        Self::with_configuration(header_handles, BuilderConfiguration::default())
    }

    pub fn with_configuration(
        header_handles: HeaderHandlesCollection,
        config: BuilderConfiguration,
    ) -> Self {
        DocumentBuilder {
            config,
            header_handles,
            templates: AHashMap::new(),
            kinds: AHashMap::new(),
            names: AHashMap::new(),
            listed: AHashMap::new(),
            pending: Vec::new(),
            queue: VecDeque::new(),
            queued: AHashSet::new(),
            notifier: Notifier::new(),
        }
    }

    pub fn configuration(&self) -> &BuilderConfiguration {
        &self.config
    }

    pub fn header_handles(&self) -> &HeaderHandlesCollection {
        &self.header_handles
    }

    pub fn header_handles_mut(&mut self) -> &mut HeaderHandlesCollection {
        &mut self.header_handles
    }

    /// Install a callback receiving every notification as it is reported
    pub fn set_notification_handler(&mut self, handler: NotificationHandler) {
        self.notifier.set_handler(handler);
    }

    pub fn notifications(&self) -> &NotificationCollection {
        self.notifier.notifications()
    }

    /// Number of templates collected so far
    pub fn len(&self) -> usize {
        self.templates.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ------------------------------------------------------------------
    // Template registration
    // ------------------------------------------------------------------

    /// Register a template.
    ///
    /// A template whose handle is already taken is kept and given a new
    /// handle when the build starts.
    pub fn add_template(&mut self, template: CadTemplate) {
        let handle = template.handle();

        if handle.is_null() {
            self.pending.push(template);
            return;
        }

        if self.templates.contains_key(&handle) {
            self.notify(
                NotificationType::Warning,
                format!("Repeated handle found {}", handle),
            );
            self.pending.push(template);
            return;
        }

        self.register_template(template);
    }

    /// Register a batch of templates
    pub fn add_templates(&mut self, templates: impl IntoIterator<Item = CadTemplate>) {
        for template in templates {
            self.add_template(template);
        }
    }

    fn register_template(&mut self, template: CadTemplate) {
        let handle = template.handle();
        let object = &template.object;
        self.kinds.insert(
            handle,
            KindInfo {
                kind: object.kind_id(),
                name: object.object_name(),
                entity: object.is_entity(),
            },
        );

        if let (Some(kind), Some(name)) = (object.table_kind(), object.entry_name()) {
            if !name.is_empty() {
                let key = (kind, name.to_uppercase());
                match self.names.get(&key) {
                    Some(&existing) if existing < handle => {}
                    _ => {
                        self.names.insert(key, handle);
                    }
                }
            }
        }

        self.templates.insert(handle, template);
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Object of kind `T` stored under `handle`, resolved or not
    pub fn try_lookup_typed<T: ObjectKind>(&self, handle: Handle) -> Option<&T> {
        self.templates.get(&handle).and_then(|t| T::cast(&t.object))
    }

    /// Whether a template of kind `T` exists under `handle`
    pub fn contains_typed<T: ObjectKind>(&self, handle: Handle) -> bool {
        self.kinds
            .get(&handle)
            .map_or(false, |info| T::accepts(info.kind))
    }

    pub(crate) fn is_entity(&self, handle: Handle) -> bool {
        self.kinds.get(&handle).map_or(false, |info| info.entity)
    }

    /// Table entry of kind `T` by name, case-insensitive.
    ///
    /// Entries listed by the table win over entries the table does not list.
    pub fn try_lookup_by_name<T: TableEntry>(&self, name: &str) -> Option<ObjectRef<T>> {
        let key = (T::KIND, name.to_uppercase());
        self.listed
            .get(&key)
            .or_else(|| self.names.get(&key))
            .map(|&handle| ObjectRef::new(handle))
    }

    /// Table template of the given kind: the header's table control, else the
    /// lowest table of that kind
    fn table_template(&self, kind: TableKind) -> Option<&CadTemplate> {
        let is_table = |t: &&CadTemplate| t.object.table_object_kind() == Some(kind);
        self.header_handles
            .table_control(kind)
            .and_then(|h| self.templates.get(&h))
            .filter(is_table)
            .or_else(|| {
                self.templates
                    .values()
                    .filter(is_table)
                    .min_by_key(|t| t.handle())
            })
    }

    fn index_listed_entries(&mut self) {
        let mut listed = AHashMap::new();
        for kind in TableKind::ALL {
            let Some(TemplateData::Table(data)) = self.table_template(kind).map(|t| &t.data) else {
                continue;
            };
            for handle in &data.entries {
                let Some(template) = self.templates.get(handle) else {
                    continue;
                };
                if template.object.table_kind() != Some(kind) {
                    continue;
                }
                if let Some(name) = template.object.entry_name().filter(|n| !n.is_empty()) {
                    listed.entry((kind, name.to_uppercase())).or_insert(*handle);
                }
            }
        }
        self.listed = listed;
    }

    /// Template of an object of kind `T`
    pub fn get_object_template<T: ObjectKind>(&self, handle: Handle) -> Option<&CadTemplate> {
        self.templates
            .get(&handle)
            .filter(|t| T::accepts(t.object.kind_id()))
    }

    pub(crate) fn template_object_mut(&mut self, handle: Handle) -> Option<&mut CadObject> {
        self.templates.get_mut(&handle).map(|t| &mut t.object)
    }

    /// Collection name of the object stored under `handle`
    pub(crate) fn entry_name(&self, handle: Handle) -> Option<String> {
        self.templates
            .get(&handle)
            .and_then(|t| t.object.entry_name())
            .map(str::to_string)
    }

    /// Queue a template for resolution; unknown and already queued handles
    /// are ignored
    pub(crate) fn enqueue(&mut self, handle: Handle) {
        if handle.is_valid() && self.kinds.contains_key(&handle) && self.queued.insert(handle) {
            self.queue.push_back(handle);
        }
    }

    // ------------------------------------------------------------------
    // Reference resolution
    // ------------------------------------------------------------------

    /// Resolve a reference encoded as a handle.
    ///
    /// A null handle resolves silently to a null reference; a missing target
    /// or one of the wrong kind is reported once.
    pub(crate) fn resolve_handle<T: ObjectKind>(
        &mut self,
        handle: Handle,
        referrer: Referrer,
        field: &str,
    ) -> ObjectRef<T> {
        if handle.is_null() {
            return ObjectRef::NULL;
        }
        match self.kinds.get(&handle).copied() {
            Some(info) if T::accepts(info.kind) => ObjectRef::new(handle),
            Some(info) => {
                self.notify(
                    NotificationType::Warning,
                    format!(
                        "The {} {} of {} is a {}, expected {}",
                        field,
                        handle,
                        referrer,
                        info.name,
                        T::OBJECT_NAME
                    ),
                );
                ObjectRef::NULL
            }
            None => {
                self.notify(
                    NotificationType::Warning,
                    format!("The {} {} of {} was not found", field, handle, referrer),
                );
                ObjectRef::NULL
            }
        }
    }

    /// Resolve a table entry reference encoded by handle, name, or both.
    ///
    /// The handle wins over the name. When neither resolves but something
    /// was encoded a single warning is reported.
    pub(crate) fn resolve_named<T: TableEntry>(
        &mut self,
        reference: &NamedReference,
        referrer: Referrer,
        field: &str,
    ) -> ObjectRef<T> {
        let mut mismatch = None;
        if reference.handle.is_valid() {
            match self.kinds.get(&reference.handle) {
                Some(info) if T::accepts(info.kind) => return ObjectRef::new(reference.handle),
                Some(info) => mismatch = Some(info.name),
                None => {}
            }
        }

        if !reference.name.is_empty() {
            if let Some(found) = self.try_lookup_by_name::<T>(&reference.name) {
                return found;
            }
        }

        if reference.is_encoded() {
            let mut message = format!("The {} of {} was not found", field, referrer);
            if reference.handle.is_valid() {
                message.push_str(&format!(", handle {}", reference.handle));
                if let Some(found) = mismatch {
                    message.push_str(&format!(" is a {}, expected {}", found, T::OBJECT_NAME));
                }
            }
            if !reference.name.is_empty() {
                message.push_str(&format!(", name '{}'", reference.name));
            }
            self.notify(NotificationType::Warning, message);
        }
        ObjectRef::NULL
    }

    /// Resolve a ByLayer/ByBlock/Continuous flag to its line type
    pub(crate) fn well_known_linetype(
        &mut self,
        flag: LineTypeFlag,
        referrer: Referrer,
    ) -> ObjectRef<LineType> {
        let header = match flag {
            LineTypeFlag::ByLayer => self.header_handles.bylayer(),
            LineTypeFlag::ByBlock => self.header_handles.byblock(),
            LineTypeFlag::Continuous => self.header_handles.continuous(),
            LineTypeFlag::Handle => None,
        };
        if let Some(handle) = header.filter(|&h| self.contains_typed::<LineType>(h)) {
            return ObjectRef::new(handle);
        }

        let Some(name) = flag.well_known_name() else {
            return ObjectRef::NULL;
        };
        if let Some(found) = self.try_lookup_by_name::<LineType>(name) {
            return found;
        }
        self.notify(
            NotificationType::Warning,
            format!("Line type {} of {} was not found", name, referrer),
        );
        ObjectRef::NULL
    }

    /// Children of a linked entity range, in chain order.
    ///
    /// An explicit child list is used as is. Otherwise the chain is walked
    /// from `first` through each child's next handle, falling back to the
    /// following handle when the range has a valid `last`. The walk stops at
    /// `last`, at a handle without template, or when it loops.
    pub(crate) fn walk_chain(&mut self, range: &LinkedRange, referrer: Referrer) -> Vec<Handle> {
        if !range.owned.is_empty() {
            return range.owned.iter().copied().filter(|h| h.is_valid()).collect();
        }

        let mut children = Vec::new();
        let mut visited = AHashSet::new();
        let mut current = range.first;
        let mut looped = false;

        while current.is_valid() {
            if !visited.insert(current) {
                looped = true;
                break;
            }
            let Some(template) = self.get_object_template::<CadObject>(current) else {
                break;
            };
            children.push(current);
            if current == range.last {
                return children;
            }

            let next = template
                .entity_data()
                .map(|e| e.next_entity)
                .unwrap_or(Handle::NULL);
            current = if next.is_valid() {
                next
            } else if range.last.is_valid() {
                current.checked_next().unwrap_or(Handle::NULL)
            } else {
                Handle::NULL
            };
        }

        if looped {
            self.notify(
                NotificationType::Warning,
                format!("Entity chain of {} loops at {}", referrer, current),
            );
        } else if range.last.is_valid() {
            self.notify(
                NotificationType::Warning,
                format!("Entity chain of {} ends before {}", referrer, range.last),
            );
        }
        children
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub(crate) fn notify(
        &mut self,
        notification_type: NotificationType,
        message: impl Into<String>,
    ) {
        self.notifier.notify(notification_type, message, None);
    }

    pub(crate) fn notify_with_cause(
        &mut self,
        notification_type: NotificationType,
        message: impl Into<String>,
        cause: &dyn Error,
    ) {
        self.notifier.notify(notification_type, message, Some(cause));
    }

    // ------------------------------------------------------------------
    // Building
    // ------------------------------------------------------------------

    /// Resolve every template and assemble the document.
    pub fn build(mut self) -> Result<CadDocument> {
        self.assign_missing_handles()?;
        self.index_listed_entries();
        tracing::debug!(templates = self.templates.len(), "building document");

        for handle in self.header_handles.valid_handles() {
            self.enqueue(handle);
        }
        let mut reached = 0usize;
        while let Some(handle) = self.queue.pop_front() {
            if self.resolve_template(handle) {
                reached += 1;
            }
        }
        tracing::debug!(reached, "reachable templates resolved");

        let handles = self.sorted_handles();
        let swept = handles
            .iter()
            .filter(|&&handle| self.resolve_template(handle))
            .count();
        tracing::debug!(swept, "unreached templates resolved");

        self.rebuild_block_records(&handles);

        let mut document = self.register(&handles)?;
        self.renumber_exhausted(&mut document)?;
        self.link_root_dictionary(&mut document)?;
        self.link_tables(&mut document)?;
        self.link_orphan_entries(&mut document);
        self.ensure_standard_entries(&mut document)?;
        self.link_orphan_entities(&mut document);
        self.check_handle_limit(&mut document)?;

        document.set_notifications(self.notifier.take());
        tracing::debug!(objects = document.registry().len(), "document built");
        Ok(document)
    }

    fn assign_missing_handles(&mut self) -> Result<()> {
        let mut next = self
            .templates
            .keys()
            .map(|h| h.value())
            .max()
            .unwrap_or(0);
        for mut template in std::mem::take(&mut self.pending) {
            let handle = match next.checked_add(1) {
                Some(value) => {
                    next = value;
                    Handle::new(value)
                }
                // Above the last handle: reuse the lowest free one
                None => (1..u64::MAX)
                    .map(Handle::new)
                    .find(|h| !self.templates.contains_key(h))
                    .ok_or(CadError::HandleLimitExceeded {
                        seed: next,
                        limit: u64::MAX,
                    })?,
            };
            template.set_handle(handle);
            self.register_template(template);
        }
        Ok(())
    }

    fn sorted_handles(&self) -> Vec<Handle> {
        let mut handles: Vec<Handle> = self.templates.keys().copied().collect();
        handles.sort_unstable();
        handles
    }

    /// Take a template out, resolve it and put it back
    fn resolve_template(&mut self, handle: Handle) -> bool {
        let Some(mut template) = self.templates.remove(&handle) else {
            return false;
        };
        let resolved = template.resolve(self);
        self.templates.insert(handle, template);
        resolved
    }

    /// Copy name, base point, description and flags from each BLOCK marker
    /// to its record and make the record own both markers
    fn rebuild_block_records(&mut self, handles: &[Handle]) {
        for &handle in handles {
            let Some(record) = self.try_lookup_typed::<BlockRecord>(handle) else {
                continue;
            };
            let block = record.block.handle();
            let block_end = record.block_end.handle();
            let old_name = record.name.clone();

            let marker = self
                .try_lookup_typed::<Block>(block)
                .map(|b| (b.name.clone(), b.base_point, b.description.clone(), b.flags));
            if let Some((name, base_point, description, flags)) = marker {
                if let Some(record) = self
                    .template_object_mut(handle)
                    .and_then(|o| o.cast_mut::<BlockRecord>())
                {
                    if !name.is_empty() {
                        record.name = name.clone();
                    }
                    record.base_point = base_point;
                    record.description = description;
                    record.flags = flags;
                }
                if !name.is_empty() && name != old_name {
                    self.rekey_block_record(handle, &old_name, &name);
                }
            }

            for marker in [block, block_end] {
                if let Some(object) = self.template_object_mut(marker) {
                    object.common_mut().owner = ObjectRef::new(handle);
                }
            }
        }
    }

    fn rekey_block_record(&mut self, record: Handle, old_name: &str, new_name: &str) {
        let mut failures = Vec::new();
        for template in self.templates.values_mut() {
            if let CadObject::BlockRecordTable(table) = &mut template.object {
                if table.get(old_name).map(|e| e.handle()) == Some(record) {
                    table.remove(old_name);
                    if let Err(e) = table.add(new_name, OwnedRef::new(record)) {
                        failures.push(e);
                    }
                }
            }
        }
        for e in failures {
            self.notify_with_cause(
                NotificationType::Warning,
                format!("Block record {} renamed to '{}'", record, new_name),
                &e,
            );
        }
    }

    /// Move every kept object into a new document
    fn register(&mut self, handles: &[Handle]) -> Result<CadDocument> {
        let mut document = CadDocument::empty();
        *document.header_mut() = std::mem::take(&mut self.header_handles);
        if let Some(max) = handles.last() {
            document.registry_mut().advance_seed(max.value().saturating_add(1));
        }

        for handle in handles {
            let Some(template) = self.templates.remove(handle) else {
                continue;
            };
            if matches!(template.object, CadObject::Unknown(_))
                && !self.config.keep_unknown_objects
            {
                continue;
            }
            document.registry_mut().insert(template.object)?;
        }

        let registered: AHashSet<Handle> = document.registry().handles().collect();
        let mut prune = |h: Handle| if registered.contains(&h) { h } else { Handle::NULL };
        for object in document.registry_mut().iter_mut() {
            object.remap_references(&mut prune);
        }
        document.header_mut().remap(&mut prune);

        tracing::debug!(registered = registered.len(), "objects registered");
        Ok(document)
    }

    /// The header handle wins; otherwise the lowest dictionary owned by the
    /// document becomes the root
    fn link_root_dictionary(&mut self, document: &mut CadDocument) -> Result<()> {
        let from_header = document
            .header()
            .dictionary_named_objects()
            .filter(|&h| document.try_lookup::<Dictionary>(h).is_some());
        let from_owner = document
            .objects()
            .filter(|o| matches!(o, CadObject::Dictionary(_)) && o.owner().is_null())
            .map(|o| o.handle())
            .min();

        let root = match (from_header, from_owner) {
            (Some(header), Some(owner)) if header != owner => {
                self.notify(
                    NotificationType::Warning,
                    format!(
                        "Root dictionary {} of the header differs from unowned dictionary {}",
                        header, owner
                    ),
                );
                header
            }
            (Some(header), _) => header,
            (None, Some(owner)) => owner,
            (None, None) => {
                self.notify(
                    NotificationType::Warning,
                    "Root dictionary not found, a new one is created",
                );
                document.registry_mut().insert(Dictionary::new())?
            }
        };
        document.header_mut().set_dictionary_named_objects(root);
        Ok(())
    }

    fn link_tables(&mut self, document: &mut CadDocument) -> Result<()> {
        for kind in TableKind::ALL {
            let current = document
                .header()
                .table_control(kind)
                .filter(|&h| document.get(h).and_then(|o| o.table_object_kind()) == Some(kind));
            if current.is_some() {
                continue;
            }

            let existing = document
                .objects()
                .filter(|o| o.table_object_kind() == Some(kind))
                .map(|o| o.handle())
                .min();
            match existing {
                Some(handle) => document.header_mut().set_table_control(kind, handle),
                None => {
                    document.create_table(kind)?;
                }
            }
        }
        Ok(())
    }

    /// Add table entries their table does not list, and give owned objects
    /// without owner their container as owner
    fn link_orphan_entries(&mut self, document: &mut CadDocument) {
        let mut owners = Vec::new();
        let mut entries = Vec::new();
        for object in document.objects() {
            for child in object.owned_handles() {
                owners.push((child, object.handle()));
            }
            if let (Some(kind), Some(name)) = (object.table_kind(), object.entry_name()) {
                entries.push((kind, object.handle(), name.to_string()));
            }
        }

        for (child, owner) in owners {
            if let Some(object) = document.registry_mut().get_mut(child) {
                if object.owner().is_null() {
                    object.common_mut().owner = ObjectRef::new(owner);
                }
            }
        }

        for (kind, handle, name) in entries {
            let Some(table) = document.header().table_control(kind) else {
                continue;
            };
            let Some(table_object) = document.registry_mut().get_mut(table) else {
                continue;
            };
            if table_object.owned_handles().contains(&handle) {
                continue;
            }

            match add_to_table(table_object, &name, handle) {
                Ok(()) => {
                    if let Some(entry) = document.registry_mut().get_mut(handle) {
                        entry.common_mut().owner = ObjectRef::new(table);
                    }
                }
                Err(e) => self.notify_with_cause(
                    NotificationType::Warning,
                    format!("{} {} is not listed by its table", kind, handle),
                    &e,
                ),
            }
        }
    }

    /// Fill the header handles of the standard entries, creating the
    /// entries that do not exist
    fn ensure_standard_entries(&mut self, document: &mut CadDocument) -> Result<()> {
        let header = document.header().clone();

        let model_space = ensure_entry(
            document,
            header.model_space(),
            BlockRecord::MODEL_SPACE,
            BlockRecord::model_space,
        )?;
        let paper_space = ensure_entry(
            document,
            header.paper_space(),
            BlockRecord::PAPER_SPACE,
            BlockRecord::paper_space,
        )?;
        let by_layer =
            ensure_entry(document, header.bylayer(), LineType::BY_LAYER, LineType::by_layer)?;
        let by_block =
            ensure_entry(document, header.byblock(), LineType::BY_BLOCK, LineType::by_block)?;
        let continuous = ensure_entry(
            document,
            header.continuous(),
            LineType::CONTINUOUS,
            LineType::continuous,
        )?;
        let layer_0 = ensure_entry(document, None, Layer::DEFAULT_NAME, || Layer {
            linetype: ObjectRef::new(continuous),
            ..Layer::layer_0()
        })?;
        let clayer = header
            .clayer()
            .filter(|&h| document.try_lookup::<Layer>(h).is_some())
            .unwrap_or(layer_0);
        let text_style = ensure_entry(
            document,
            header.textstyle(),
            TextStyle::STANDARD,
            TextStyle::standard,
        )?;
        let dim_style = ensure_entry(document, header.dimstyle(), DimStyle::STANDARD, || DimStyle {
            text_style: ObjectRef::new(text_style),
            ..DimStyle::standard()
        })?;
        let celtype = header
            .celtype()
            .filter(|&h| document.try_lookup::<LineType>(h).is_some())
            .unwrap_or(by_layer);
        ensure_entry(document, None, AppId::ACAD, AppId::acad)?;

        let header = document.header_mut();
        header.set_model_space(model_space);
        header.set_paper_space(paper_space);
        header.set_bylayer(by_layer);
        header.set_byblock(by_block);
        header.set_continuous(continuous);
        header.set_clayer(clayer);
        header.set_textstyle(text_style);
        header.set_dimstyle(dim_style);
        header.set_celtype(celtype);

        let groups = self.ensure_root_entry(document, Dictionary::ACAD_GROUP)?;
        document.header_mut().set_dictionary_acad_group(groups);
        let layouts = self.ensure_root_entry(document, Dictionary::ACAD_LAYOUT)?;
        document.header_mut().set_dictionary_layouts(layouts);
        Ok(())
    }

    /// Dictionary stored under `key` in the root dictionary
    fn ensure_root_entry(&mut self, document: &mut CadDocument, key: &str) -> Result<Handle> {
        let current = if key == Dictionary::ACAD_GROUP {
            document.header().dictionary_acad_group()
        } else {
            document.header().dictionary_layouts()
        };
        if let Some(handle) = current.filter(|&h| document.try_lookup::<Dictionary>(h).is_some()) {
            return Ok(handle);
        }

        let root = document
            .root_dictionary_handle()
            .ok_or_else(|| {
                CadError::StructuralViolation("document has no root dictionary".to_string())
            })?;
        let existing = document
            .get(root)
            .and_then(dictionary_entries)
            .and_then(|entries| entries.get(key))
            .map(|e| e.handle())
            .filter(|&h| document.try_lookup::<Dictionary>(h).is_some());
        match existing {
            Some(handle) => Ok(handle),
            None => document.add_dictionary_entry(root, key, Dictionary::new()),
        }
    }

    /// Attach entities no container owns: to the block record named as their
    /// owner, to model space otherwise
    fn link_orphan_entities(&mut self, document: &mut CadDocument) {
        let owned: AHashSet<Handle> = document
            .objects()
            .flat_map(|o| o.owned_handles())
            .collect();
        let orphans: Vec<(Handle, Handle, Option<&'static str>)> = document
            .objects()
            .filter(|o| o.is_entity() && !owned.contains(&o.handle()))
            .map(|o| {
                let sub_entity = (!is_standalone_entity(o)).then(|| o.object_name());
                (o.handle(), o.owner().handle(), sub_entity)
            })
            .collect();
        let Some(model_space) = document.model_space_handle() else {
            return;
        };

        for (handle, owner, sub_entity) in orphans {
            if let Some(name) = sub_entity {
                self.notify(
                    NotificationType::Warning,
                    format!("{} {} has no container", name, handle),
                );
                continue;
            }
            let record = if document.try_lookup::<BlockRecord>(owner).is_some() {
                owner
            } else {
                model_space
            };
            if let Some(r) = document.try_lookup_mut::<BlockRecord>(record) {
                r.add_entity(OwnedRef::new(handle));
            }
            if let Some(entity) = document.registry_mut().get_mut(handle) {
                entity.common_mut().owner = ObjectRef::new(record);
            }
        }
    }

    /// Renumber a document using the last handle so the linking phases can
    /// still create objects
    fn renumber_exhausted(&mut self, document: &mut CadDocument) -> Result<()> {
        if !document.registry().is_exhausted() {
            return Ok(());
        }
        self.notify(
            NotificationType::Warning,
            format!("Handle {} is in use, handles are renumbered", Handle::new(u64::MAX)),
        );
        document.restore_handles(1)
    }

    fn check_handle_limit(&mut self, document: &mut CadDocument) -> Result<()> {
        let Some(limit) = self.config.max_handle_seed else {
            return Ok(());
        };
        let seed = document.registry().seed();
        if seed <= limit {
            return Ok(());
        }

        self.notify(
            NotificationType::Warning,
            format!("Handle seed {:#X} exceeds {:#X}, handles are renumbered", seed, limit),
        );
        document.restore_handles(1)?;
        let seed = document.registry().seed();
        if seed > limit {
            return Err(CadError::HandleLimitExceeded { seed, limit });
        }
        Ok(())
    }
}

/// Existing entry of kind `T` (the current handle first, then the name), or
/// a new one
fn ensure_entry<T: TableEntry>(
    document: &mut CadDocument,
    current: Option<Handle>,
    name: &str,
    create: impl FnOnce() -> T,
) -> Result<Handle>
where
    Table<T>: ObjectKind,
{
    if let Some(handle) = current.filter(|&h| document.try_lookup::<T>(h).is_some()) {
        return Ok(handle);
    }
    if let Some(entry) = document.table::<T>().and_then(|t| t.get(name)) {
        return Ok(entry.handle());
    }
    document.add_entry(create())
}

fn add_to_table(table: &mut CadObject, name: &str, handle: Handle) -> Result<()> {
    match table {
        CadObject::AppIdTable(t) => t.add(name, OwnedRef::new(handle)),
        CadObject::BlockRecordTable(t) => t.add(name, OwnedRef::new(handle)),
        CadObject::DimStyleTable(t) => t.add(name, OwnedRef::new(handle)),
        CadObject::LayerTable(t) => t.add(name, OwnedRef::new(handle)),
        CadObject::LineTypeTable(t) => t.add(name, OwnedRef::new(handle)),
        CadObject::TextStyleTable(t) => t.add(name, OwnedRef::new(handle)),
        other => Err(CadError::TypeMismatch {
            handle: other.handle(),
            expected: "TABLE",
            found: other.object_name(),
        }),
    }
}

/// Sub-entities only exist inside their compound entity or block record
fn is_standalone_entity(object: &CadObject) -> bool {
    !matches!(
        object,
        CadObject::Vertex(_)
            | CadObject::AttributeEntity(_)
            | CadObject::Seqend(_)
            | CadObject::Block(_)
            | CadObject::BlockEnd(_)
    )
}

//! Object templates: intermediate structures holding raw handle values
//! before resolution.
//!
//! A format reader creates one [`CadTemplate`] for every record it decodes.
//! The template owns the object in its decoded state, with every field that
//! points at another object still empty, plus the raw handles and names those
//! fields were encoded with. After every template has been handed to the
//! [`DocumentBuilder`], the builder resolves them (in any order, each exactly
//! once) and registers the finished objects into a [`CadDocument`].
//!
//! [`CadDocument`]: crate::CadDocument

mod entities;
mod objects;
mod tables;

use std::fmt;

use indexmap::IndexMap;

pub use entities::{
    DimensionTemplateData, EntityKindData, EntityTemplateData, InsertTemplateData, LineTypeFlag,
    PolylineTemplateData,
};
pub use objects::{DictionaryTemplateData, GroupTemplateData, LayoutTemplateData};
pub use tables::{
    BlockRecordTemplateData, DimStyleTemplateData, LayerTemplateData, LineTypeTemplateData,
    TableTemplateData,
};

use crate::io::builder::DocumentBuilder;
use crate::notification::NotificationType;
use crate::object::CadObject;
use crate::objects::Dictionary;
use crate::tables::AppId;
use crate::types::{Handle, ObjectRef, OwnedRef};
use crate::xdata::ExtendedDataRecord;

/// A reference encoded as a handle, a name, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedReference {
    pub handle: Handle,
    /// Entry name; empty when not encoded
    pub name: String,
}

impl NamedReference {
    pub fn by_handle(handle: Handle) -> Self {
        Self {
            handle,
            name: String::new(),
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            handle: Handle::NULL,
            name: name.into(),
        }
    }

    pub fn new(handle: Handle, name: impl Into<String>) -> Self {
        Self {
            handle,
            name: name.into(),
        }
    }

    /// Whether the source recorded anything for this reference
    pub fn is_encoded(&self) -> bool {
        self.handle.is_valid() || !self.name.is_empty()
    }
}

/// Children stored as a linked list of entities.
///
/// When `owned` is filled it is used as is; otherwise the chain is walked
/// from `first` following each child's next handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedRange {
    pub first: Handle,
    pub last: Handle,
    pub owned: Vec<Handle>,
}

impl LinkedRange {
    pub fn chain(first: Handle, last: Handle) -> Self {
        Self {
            first,
            last,
            owned: Vec::new(),
        }
    }

    pub fn owned(handles: Vec<Handle>) -> Self {
        Self {
            first: Handle::NULL,
            last: Handle::NULL,
            owned: handles,
        }
    }
}

/// Object being resolved, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Referrer {
    pub object_name: &'static str,
    pub handle: Handle,
}

impl Referrer {
    pub fn of(object: &CadObject) -> Self {
        Self {
            object_name: object.object_name(),
            handle: object.handle(),
        }
    }
}

impl fmt::Display for Referrer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object_name, self.handle)
    }
}

/// Unresolved references shared by every kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateCommon {
    /// Owner handle (soft pointer); null means the document
    pub owner_handle: Handle,
    /// Extended dictionary handle (hard owner)
    pub xdict_handle: Option<Handle>,
    /// Reactor handles (soft pointer)
    pub reactor_handles: Vec<Handle>,
    /// Extended data keyed by application id handle
    pub edata_by_handle: IndexMap<Handle, ExtendedDataRecord>,
    /// Extended data keyed by application name
    pub edata_by_name: IndexMap<String, ExtendedDataRecord>,
}

/// Build state of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    Unresolved,
    Resolved,
}

/// Kind-specific unresolved fields
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateData {
    /// Nothing beyond the common references
    Plain,
    Table(TableTemplateData),
    Layer(LayerTemplateData),
    LineType(LineTypeTemplateData),
    DimStyle(DimStyleTemplateData),
    BlockRecord(BlockRecordTemplateData),
    Entity(EntityTemplateData),
    Dictionary(DictionaryTemplateData),
    Group(GroupTemplateData),
    Layout(LayoutTemplateData),
}

impl TemplateData {
    /// Empty data matching the kind of the object
    pub fn for_object(object: &CadObject) -> Self {
        if object.table_object_kind().is_some() {
            return TemplateData::Table(TableTemplateData::default());
        }
        if object.is_entity() {
            return TemplateData::Entity(EntityTemplateData::for_object(object));
        }
        match object {
            CadObject::Layer(_) => TemplateData::Layer(LayerTemplateData::default()),
            CadObject::LineType(_) => TemplateData::LineType(LineTypeTemplateData::default()),
            CadObject::DimStyle(_) => TemplateData::DimStyle(DimStyleTemplateData::default()),
            CadObject::BlockRecord(_) => {
                TemplateData::BlockRecord(BlockRecordTemplateData::default())
            }
            CadObject::Dictionary(_) | CadObject::DictionaryWithDefault(_) => {
                TemplateData::Dictionary(DictionaryTemplateData::default())
            }
            CadObject::Group(_) => TemplateData::Group(GroupTemplateData::default()),
            CadObject::Layout(_) => TemplateData::Layout(LayoutTemplateData::default()),
            _ => TemplateData::Plain,
        }
    }
}

/// A decoded object waiting for its references to be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CadTemplate {
    /// The object in its decoded state; its handle is the template's handle
    pub object: CadObject,
    pub common: TemplateCommon,
    pub data: TemplateData,
    state: BuildState,
}

impl CadTemplate {
    /// Template for an object, with empty kind data matching its kind
    pub fn new(object: impl Into<CadObject>) -> Self {
        let object = object.into();
        let data = TemplateData::for_object(&object);
        Self::with_data(object, data)
    }

    pub fn with_data(object: impl Into<CadObject>, data: TemplateData) -> Self {
        CadTemplate {
            object: object.into(),
            common: TemplateCommon::default(),
            data,
            state: BuildState::Unresolved,
        }
    }

    /// The handle of the object that this template represents.
    pub fn handle(&self) -> Handle {
        self.object.handle()
    }

    pub(crate) fn set_handle(&mut self, handle: Handle) {
        self.object.common_mut().handle = handle;
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state == BuildState::Resolved
    }

    /// Set the encoded handle of the object
    pub fn at(mut self, handle: Handle) -> Self {
        self.set_handle(handle);
        self
    }

    pub fn owned_by(mut self, owner: Handle) -> Self {
        self.common.owner_handle = owner;
        self
    }

    pub fn with_xdictionary(mut self, xdict: Handle) -> Self {
        self.common.xdict_handle = Some(xdict);
        self
    }

    pub fn with_reactor(mut self, reactor: Handle) -> Self {
        self.common.reactor_handles.push(reactor);
        self
    }

    pub fn with_extended_data(mut self, app: Handle, record: ExtendedDataRecord) -> Self {
        self.common.edata_by_handle.insert(app, record);
        self
    }

    pub fn with_extended_data_named(
        mut self,
        app: impl Into<String>,
        record: ExtendedDataRecord,
    ) -> Self {
        self.common.edata_by_name.insert(app.into(), record);
        self
    }

    pub fn entity_data(&self) -> Option<&EntityTemplateData> {
        match &self.data {
            TemplateData::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn entity_data_mut(&mut self) -> Option<&mut EntityTemplateData> {
        match &mut self.data {
            TemplateData::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Resolve every encoded reference against the builder.
    ///
    /// Returns `true` only for the call that performed the resolution; later
    /// calls leave the object untouched.
    pub fn resolve(&mut self, builder: &mut DocumentBuilder) -> bool {
        if self.state == BuildState::Resolved {
            return false;
        }
        self.state = BuildState::Resolved;

        let referrer = Referrer::of(&self.object);
        self.resolve_common(builder, referrer);

        match &self.data {
            TemplateData::Plain => {}
            TemplateData::Table(data) => {
                tables::resolve_table(&mut self.object, data, builder, referrer)
            }
            TemplateData::Layer(data) => {
                tables::resolve_layer(&mut self.object, data, builder, referrer)
            }
            TemplateData::LineType(data) => {
                tables::resolve_linetype(&mut self.object, data, builder, referrer)
            }
            TemplateData::DimStyle(data) => {
                tables::resolve_dimstyle(&mut self.object, data, builder, referrer)
            }
            TemplateData::BlockRecord(data) => {
                tables::resolve_block_record(&mut self.object, data, builder, referrer)
            }
            TemplateData::Entity(data) => {
                entities::resolve_entity(&mut self.object, data, builder, referrer)
            }
            TemplateData::Dictionary(data) => {
                objects::resolve_dictionary(&mut self.object, data, builder, referrer)
            }
            TemplateData::Group(data) => {
                objects::resolve_group(&mut self.object, data, builder, referrer)
            }
            TemplateData::Layout(data) => {
                objects::resolve_layout(&mut self.object, data, builder, referrer)
            }
        }

        if let CadObject::Unknown(unknown) = &self.object {
            builder.notify(
                NotificationType::NotImplemented,
                format!(
                    "Record kind {} ({}) is not supported",
                    unknown.record_name, referrer.handle
                ),
            );
        }
        true
    }

    fn resolve_common(&mut self, builder: &mut DocumentBuilder, referrer: Referrer) {
        let owner =
            builder.resolve_handle::<CadObject>(self.common.owner_handle, referrer, "owner");

        let xdictionary = self.common.xdict_handle.and_then(|h| {
            let xdict = builder.resolve_handle::<Dictionary>(h, referrer, "extended dictionary");
            builder.enqueue(xdict.handle());
            (!xdict.is_null()).then(|| OwnedRef::new(xdict.handle()))
        });

        let common = self.object.common_mut();
        common.owner = owner;
        common.xdictionary = xdictionary;

        for &reactor in &self.common.reactor_handles {
            let reactor = builder.resolve_handle::<CadObject>(reactor, referrer, "reactor");
            self.object.common_mut().add_reactor(reactor);
        }

        for (&app, record) in &self.common.edata_by_handle {
            let app: ObjectRef<AppId> = builder.resolve_handle(app, referrer, "application id");
            if !app.is_null() {
                self.object.common_mut().extended_data.insert(app, record.clone());
            }
        }

        for (name, record) in &self.common.edata_by_name {
            match builder.try_lookup_by_name::<AppId>(name) {
                Some(app) => self.object.common_mut().extended_data.insert(app, record.clone()),
                None => builder.notify(
                    NotificationType::Warning,
                    format!("Application '{}' of {} not found", name, referrer),
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Line;
    use crate::tables::Layer;

    #[test]
    fn test_data_matches_kind() {
        assert!(matches!(CadTemplate::new(Layer::new("A")).data, TemplateData::Layer(_)));
        assert!(matches!(CadTemplate::new(Line::new()).data, TemplateData::Entity(_)));
        assert!(matches!(CadTemplate::new(Dictionary::new()).data, TemplateData::Dictionary(_)));
        assert!(matches!(
            CadTemplate::new(crate::objects::XRecord::new()).data,
            TemplateData::Plain
        ));
    }

    #[test]
    fn test_named_reference_encoding() {
        assert!(!NamedReference::default().is_encoded());
        assert!(NamedReference::by_name("Walls").is_encoded());
        assert!(NamedReference::by_handle(Handle::new(3)).is_encoded());
    }

    #[test]
    fn test_builder_style_setters() {
        let template = CadTemplate::new(Line::new())
            .at(Handle::new(0x30))
            .owned_by(Handle::new(0x1F))
            .with_reactor(Handle::new(0x40));
        assert_eq!(template.handle(), Handle::new(0x30));
        assert_eq!(template.common.owner_handle, Handle::new(0x1F));
        assert_eq!(template.state(), BuildState::Unresolved);
    }
}

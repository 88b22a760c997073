//! The closed set of object kinds a document can hold.
//!
//! Every object stored in a [`HandleRegistry`](crate::registry::HandleRegistry)
//! is a [`CadObject`]. All kinds carry an [`ObjectCommon`] block (handle,
//! owner, extended dictionary, reactors, extended data); graphical kinds carry
//! an [`EntityCommon`] block as well.
//!
//! Cross-object links are handles ([`ObjectRef`] / [`OwnedRef`]); the two
//! graph walks every other component relies on live here:
//!
//! - [`CadObject::owned_handles`] lists the objects this one exclusively owns
//!   (used by cascading removal and by the writer worklist).
//! - [`CadObject::remap_references`] rewrites every handle this object holds
//!   (used by removal to null dangling references and by renumbering).

use std::any::TypeId;

use crate::entities::*;
use crate::objects::*;
use crate::tables::*;
use crate::types::{DocumentId, Handle, ObjectRef, OwnedRef};
use crate::xdata::ExtendedData;

/// Data shared by every object kind
#[derive(Debug, Clone, Default)]
pub struct ObjectCommon {
    /// Unique handle; null until the object is registered
    pub handle: Handle,
    /// Containing object, null when owned by the document itself
    pub owner: ObjectRef,
    /// Extended dictionary, exclusively owned
    pub xdictionary: Option<OwnedRef<Dictionary>>,
    /// Objects listening to this one, in insertion order without duplicates
    pub reactors: Vec<ObjectRef>,
    /// Application data keyed by app id
    pub extended_data: ExtendedData,
    pub(crate) document: Option<DocumentId>,
}

impl ObjectCommon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document this object is registered in
    pub fn document(&self) -> Option<DocumentId> {
        self.document
    }

    /// Add a reactor; returns `false` if it was already present
    pub fn add_reactor(&mut self, reactor: ObjectRef) -> bool {
        if reactor.is_null() || self.reactors.contains(&reactor) {
            return false;
        }
        self.reactors.push(reactor);
        true
    }

    fn remap(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.owner.remap(map);
        if let Some(xdict) = self.xdictionary.as_mut() {
            if !xdict.remap(map) {
                self.xdictionary = None;
            }
        }
        crate::types::reference::remap_all(&mut self.reactors, |r| r.remap(map));
        self.extended_data.remap(map);
    }
}

// The document id is bookkeeping, not content: two documents built from the
// same records compare equal object by object.
impl PartialEq for ObjectCommon {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
            && self.owner == other.owner
            && self.xdictionary == other.xdictionary
            && self.reactors == other.reactors
            && self.extended_data == other.extended_data
    }
}

/// Kind-specific links of an object.
///
/// Implemented by every kind; kinds without links use the empty defaults.
pub trait ObjectLinks {
    /// Rewrite every handle held by kind-specific fields.
    ///
    /// Collections drop members whose handle became null.
    fn remap_links(&mut self, _map: &mut dyn FnMut(Handle) -> Handle) {}

    /// Push the handles this object exclusively owns through kind-specific fields
    fn owned_links(&self, _out: &mut Vec<Handle>) {}
}

/// Static view of one variant of [`CadObject`]
pub trait ObjectKind: Sized + 'static {
    /// Record name of the kind ("LAYER", "LINE", "DICTIONARY", ...)
    const OBJECT_NAME: &'static str;

    fn cast(object: &CadObject) -> Option<&Self>;

    fn cast_mut(object: &mut CadObject) -> Option<&mut Self>;

    fn into_object(self) -> CadObject;

    /// Whether an object with the given kind id can be viewed as `Self`
    fn accepts(kind: TypeId) -> bool {
        kind == TypeId::of::<Self>()
    }
}

/// Result of a registry lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LookupResult<'a> {
    /// Handle 0: the document itself
    Document,
    Object(&'a CadObject),
}

impl<'a> LookupResult<'a> {
    pub fn object(self) -> Option<&'a CadObject> {
        match self {
            LookupResult::Document => None,
            LookupResult::Object(o) => Some(o),
        }
    }
}

macro_rules! cad_objects {
    (
        objects { $( $(#[$ometa:meta])* $ovar:ident($oty:ty) => $oname:literal, )* }
        entities { $( $(#[$emeta:meta])* $evar:ident($ety:ty) => $ename:literal, )* }
    ) => {
        /// Any object a document can hold
        #[derive(Debug, Clone, PartialEq)]
        pub enum CadObject {
            $( $(#[$ometa])* $ovar($oty), )*
            $( $(#[$emeta])* $evar($ety), )*
        }

        impl CadObject {
            /// Shared object data
            pub fn common(&self) -> &ObjectCommon {
                match self {
                    $( CadObject::$ovar(o) => &o.object, )*
                    $( CadObject::$evar(o) => &o.object, )*
                }
            }

            /// Shared object data, mutable
            pub fn common_mut(&mut self) -> &mut ObjectCommon {
                match self {
                    $( CadObject::$ovar(o) => &mut o.object, )*
                    $( CadObject::$evar(o) => &mut o.object, )*
                }
            }

            /// Record name of this object's kind
            pub fn object_name(&self) -> &'static str {
                match self {
                    $( CadObject::$ovar(_) => $oname, )*
                    $( CadObject::$evar(_) => $ename, )*
                }
            }

            /// Identity of the concrete kind
            pub fn kind_id(&self) -> TypeId {
                match self {
                    $( CadObject::$ovar(_) => TypeId::of::<$oty>(), )*
                    $( CadObject::$evar(_) => TypeId::of::<$ety>(), )*
                }
            }

            /// Graphical data, for entity kinds
            pub fn entity(&self) -> Option<&EntityCommon> {
                match self {
                    $( CadObject::$evar(o) => Some(&o.common), )*
                    _ => None,
                }
            }

            pub fn entity_mut(&mut self) -> Option<&mut EntityCommon> {
                match self {
                    $( CadObject::$evar(o) => Some(&mut o.common), )*
                    _ => None,
                }
            }

            fn links(&self) -> &dyn ObjectLinks {
                match self {
                    $( CadObject::$ovar(o) => o, )*
                    $( CadObject::$evar(o) => o, )*
                }
            }

            fn links_mut(&mut self) -> &mut dyn ObjectLinks {
                match self {
                    $( CadObject::$ovar(o) => o, )*
                    $( CadObject::$evar(o) => o, )*
                }
            }
        }

        $(
            impl ObjectKind for $oty {
                const OBJECT_NAME: &'static str = $oname;

                fn cast(object: &CadObject) -> Option<&Self> {
                    match object {
                        CadObject::$ovar(o) => Some(o),
                        _ => None,
                    }
                }

                fn cast_mut(object: &mut CadObject) -> Option<&mut Self> {
                    match object {
                        CadObject::$ovar(o) => Some(o),
                        _ => None,
                    }
                }

                fn into_object(self) -> CadObject {
                    CadObject::$ovar(self)
                }
            }

            impl From<$oty> for CadObject {
                fn from(value: $oty) -> Self {
                    CadObject::$ovar(value)
                }
            }
        )*

        $(
            impl ObjectKind for $ety {
                const OBJECT_NAME: &'static str = $ename;

                fn cast(object: &CadObject) -> Option<&Self> {
                    match object {
                        CadObject::$evar(o) => Some(o),
                        _ => None,
                    }
                }

                fn cast_mut(object: &mut CadObject) -> Option<&mut Self> {
                    match object {
                        CadObject::$evar(o) => Some(o),
                        _ => None,
                    }
                }

                fn into_object(self) -> CadObject {
                    CadObject::$evar(self)
                }
            }

            impl From<$ety> for CadObject {
                fn from(value: $ety) -> Self {
                    CadObject::$evar(value)
                }
            }

            impl Entity for $ety {
                fn entity(&self) -> &EntityCommon {
                    &self.common
                }

                fn entity_mut(&mut self) -> &mut EntityCommon {
                    &mut self.common
                }
            }
        )*
    };
}

cad_objects! {
    objects {
        /// Application id table
        AppIdTable(Table<AppId>) => "TABLE",
        /// Block record table
        BlockRecordTable(Table<BlockRecord>) => "TABLE",
        /// Dimension style table
        DimStyleTable(Table<DimStyle>) => "TABLE",
        /// Layer table
        LayerTable(Table<Layer>) => "TABLE",
        /// Line type table
        LineTypeTable(Table<LineType>) => "TABLE",
        /// Text style table
        TextStyleTable(Table<TextStyle>) => "TABLE",
        AppId(AppId) => "APPID",
        BlockRecord(BlockRecord) => "BLOCK_RECORD",
        DimStyle(DimStyle) => "DIMSTYLE",
        Layer(Layer) => "LAYER",
        LineType(LineType) => "LTYPE",
        TextStyle(TextStyle) => "STYLE",
        Dictionary(Dictionary) => "DICTIONARY",
        DictionaryWithDefault(DictionaryWithDefault) => "ACDBDICTIONARYWDFLT",
        DictionaryVariable(DictionaryVariable) => "DICTIONARYVAR",
        XRecord(XRecord) => "XRECORD",
        Group(Group) => "GROUP",
        Layout(Layout) => "LAYOUT",
        /// Record kind without a dedicated model, kept only on request
        Unknown(UnknownObject) => "UNKNOWN",
    }
    entities {
        Point(Point) => "POINT",
        Line(Line) => "LINE",
        Circle(Circle) => "CIRCLE",
        Arc(Arc) => "ARC",
        Text(Text) => "TEXT",
        MText(MText) => "MTEXT",
        AttributeDefinition(AttributeDefinition) => "ATTDEF",
        AttributeEntity(AttributeEntity) => "ATTRIB",
        Insert(Insert) => "INSERT",
        Polyline(Polyline) => "POLYLINE",
        Vertex(Vertex) => "VERTEX",
        Seqend(Seqend) => "SEQEND",
        /// Begin marker of a block definition
        Block(Block) => "BLOCK",
        /// End marker of a block definition
        BlockEnd(BlockEnd) => "ENDBLK",
        Dimension(Dimension) => "DIMENSION",
    }
}

impl ObjectKind for CadObject {
    const OBJECT_NAME: &'static str = "OBJECT";

    fn cast(object: &CadObject) -> Option<&Self> {
        Some(object)
    }

    fn cast_mut(object: &mut CadObject) -> Option<&mut Self> {
        Some(object)
    }

    fn into_object(self) -> CadObject {
        self
    }

    fn accepts(_kind: TypeId) -> bool {
        true
    }
}

impl CadObject {
    pub fn handle(&self) -> Handle {
        self.common().handle
    }

    pub fn owner(&self) -> ObjectRef {
        self.common().owner
    }

    pub fn is_entity(&self) -> bool {
        self.entity().is_some()
    }

    /// Typed view of this object
    pub fn cast<T: ObjectKind>(&self) -> Option<&T> {
        T::cast(self)
    }

    pub fn cast_mut<T: ObjectKind>(&mut self) -> Option<&mut T> {
        T::cast_mut(self)
    }

    /// Name under which a named collection stores this object, if the kind
    /// carries one
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            CadObject::AppId(e) => Some(&e.name),
            CadObject::BlockRecord(e) => Some(&e.name),
            CadObject::DimStyle(e) => Some(&e.name),
            CadObject::Layer(e) => Some(&e.name),
            CadObject::LineType(e) => Some(&e.name),
            CadObject::TextStyle(e) => Some(&e.name),
            CadObject::Group(g) => Some(&g.name),
            CadObject::Layout(l) => Some(&l.name),
            _ => None,
        }
    }

    /// Set the collection name; returns `false` for kinds without a name
    pub fn set_entry_name(&mut self, name: &str) -> bool {
        let slot = match self {
            CadObject::AppId(e) => &mut e.name,
            CadObject::BlockRecord(e) => &mut e.name,
            CadObject::DimStyle(e) => &mut e.name,
            CadObject::Layer(e) => &mut e.name,
            CadObject::LineType(e) => &mut e.name,
            CadObject::TextStyle(e) => &mut e.name,
            CadObject::Group(g) => &mut g.name,
            CadObject::Layout(l) => &mut l.name,
            _ => return false,
        };
        *slot = name.to_string();
        true
    }

    /// Whether this object is a table entry (lives in a [`Table`])
    pub fn table_kind(&self) -> Option<TableKind> {
        match self {
            CadObject::AppId(_) => Some(TableKind::AppId),
            CadObject::BlockRecord(_) => Some(TableKind::BlockRecord),
            CadObject::DimStyle(_) => Some(TableKind::DimStyle),
            CadObject::Layer(_) => Some(TableKind::Layer),
            CadObject::LineType(_) => Some(TableKind::LineType),
            CadObject::TextStyle(_) => Some(TableKind::TextStyle),
            _ => None,
        }
    }

    /// Kind of table, for table objects
    pub fn table_object_kind(&self) -> Option<TableKind> {
        match self {
            CadObject::AppIdTable(_) => Some(TableKind::AppId),
            CadObject::BlockRecordTable(_) => Some(TableKind::BlockRecord),
            CadObject::DimStyleTable(_) => Some(TableKind::DimStyle),
            CadObject::LayerTable(_) => Some(TableKind::Layer),
            CadObject::LineTypeTable(_) => Some(TableKind::LineType),
            CadObject::TextStyleTable(_) => Some(TableKind::TextStyle),
            _ => None,
        }
    }

    /// Handles of every object this one exclusively owns
    pub fn owned_handles(&self) -> Vec<Handle> {
        let mut out = Vec::new();
        if let Some(xdict) = self.common().xdictionary {
            if xdict.handle().is_valid() {
                out.push(xdict.handle());
            }
        }
        self.links().owned_links(&mut out);
        out.retain(|h| h.is_valid());
        out
    }

    /// Rewrite every handle this object holds, its own handle excluded.
    ///
    /// Mapping a handle to null clears single references and drops the
    /// member from collections.
    pub fn remap_references(&mut self, map: &mut dyn FnMut(Handle) -> Handle) {
        self.common_mut().remap(map);
        if let Some(entity) = self.entity_mut() {
            entity.remap(map);
        }
        self.links_mut().remap_links(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_by_kind() {
        let object: CadObject = Layer::new("Walls").into();
        assert_eq!(object.object_name(), "LAYER");
        assert!(object.cast::<Layer>().is_some());
        assert!(object.cast::<Line>().is_none());
        assert!(object.cast::<CadObject>().is_some());
        assert_eq!(object.entry_name(), Some("Walls"));
        assert!(!object.is_entity());
    }

    #[test]
    fn test_kind_acceptance() {
        let object: CadObject = Line::new().into();
        assert!(Line::accepts(object.kind_id()));
        assert!(!Circle::accepts(object.kind_id()));
        assert!(CadObject::accepts(object.kind_id()));
    }

    #[test]
    fn test_tables_share_record_name() {
        let layers: CadObject = Table::<Layer>::new().into();
        let styles: CadObject = Table::<TextStyle>::new().into();
        assert_eq!(layers.object_name(), styles.object_name());
        assert_ne!(layers.kind_id(), styles.kind_id());
        assert_eq!(layers.table_object_kind(), Some(TableKind::Layer));
    }

    #[test]
    fn test_remap_clears_common_links() {
        let mut object: CadObject = Line::new().into();
        {
            let common = object.common_mut();
            common.owner = ObjectRef::new(Handle::new(3));
            common.xdictionary = Some(OwnedRef::new(Handle::new(4)));
            common.add_reactor(ObjectRef::new(Handle::new(5)));
            common.add_reactor(ObjectRef::new(Handle::new(6)));
        }
        if let Some(entity) = object.entity_mut() {
            entity.layer = ObjectRef::new(Handle::new(5));
        }

        object.remap_references(&mut |h| if h == Handle::new(5) { Handle::NULL } else { h });

        let common = object.common();
        assert_eq!(common.owner.handle(), Handle::new(3));
        assert_eq!(common.reactors, vec![ObjectRef::new(Handle::new(6))]);
        assert!(object.entity().map(|e| e.layer.is_null()).unwrap_or(false));
        assert_eq!(object.owned_handles(), vec![Handle::new(4)]);
    }

    #[test]
    fn test_reactors_are_a_set() {
        let mut common = ObjectCommon::new();
        assert!(common.add_reactor(ObjectRef::new(Handle::new(9))));
        assert!(!common.add_reactor(ObjectRef::new(Handle::new(9))));
        assert!(!common.add_reactor(ObjectRef::NULL));
        assert_eq!(common.reactors.len(), 1);
    }

    #[test]
    fn test_set_entry_name() {
        let mut object: CadObject = Layout::new("").into();
        assert!(object.set_entry_name("Layout1"));
        assert_eq!(object.entry_name(), Some("Layout1"));

        let mut xrecord: CadObject = XRecord::new().into();
        assert!(!xrecord.set_entry_name("DATA"));
    }
}

//! Entity templates

use super::{LinkedRange, NamedReference, Referrer};
use crate::entities::{AttributeEntity, Seqend, Vertex};
use crate::io::builder::DocumentBuilder;
use crate::notification::NotificationType;
use crate::object::CadObject;
use crate::tables::{BlockRecord, DimStyle, Layer, LineType, TextStyle};
use crate::types::{Handle, ObjectRef, OwnedRef};

/// Line type flag of an entity.
///
/// The well-known values take priority over any encoded handle or name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTypeFlag {
    ByLayer,
    ByBlock,
    Continuous,
    /// The line type is given by handle or name
    Handle,
}

impl LineTypeFlag {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LineTypeFlag::ByLayer),
            1 => Some(LineTypeFlag::ByBlock),
            2 => Some(LineTypeFlag::Continuous),
            3 => Some(LineTypeFlag::Handle),
            _ => None,
        }
    }

    /// Name of the line type the flag stands for
    pub fn well_known_name(&self) -> Option<&'static str> {
        match self {
            LineTypeFlag::ByLayer => Some(LineType::BY_LAYER),
            LineTypeFlag::ByBlock => Some(LineType::BY_BLOCK),
            LineTypeFlag::Continuous => Some(LineType::CONTINUOUS),
            LineTypeFlag::Handle => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertTemplateData {
    pub block: NamedReference,
    /// ATTRIB chain
    pub attributes: LinkedRange,
    pub seqend: Handle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylineTemplateData {
    /// VERTEX chain
    pub vertices: LinkedRange,
    pub seqend: Handle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionTemplateData {
    pub style: NamedReference,
    pub block: NamedReference,
}

/// References specific to one entity kind
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EntityKindData {
    #[default]
    None,
    /// Text style of TEXT, MTEXT, ATTDEF and ATTRIB
    Text { style: NamedReference },
    Insert(InsertTemplateData),
    Polyline(PolylineTemplateData),
    Dimension(DimensionTemplateData),
}

/// Unresolved fields of an entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityTemplateData {
    pub layer: NamedReference,
    pub linetype_flag: Option<LineTypeFlag>,
    pub linetype: NamedReference,
    /// Next entity of the chain this entity belongs to
    pub next_entity: Handle,
    pub kind: EntityKindData,
}

impl EntityTemplateData {
    pub fn for_object(object: &CadObject) -> Self {
        let kind = match object {
            CadObject::Text(_)
            | CadObject::MText(_)
            | CadObject::AttributeDefinition(_)
            | CadObject::AttributeEntity(_) => EntityKindData::Text {
                style: NamedReference::default(),
            },
            CadObject::Insert(_) => EntityKindData::Insert(InsertTemplateData::default()),
            CadObject::Polyline(_) => EntityKindData::Polyline(PolylineTemplateData::default()),
            CadObject::Dimension(_) => EntityKindData::Dimension(DimensionTemplateData::default()),
            _ => EntityKindData::None,
        };
        EntityTemplateData {
            kind,
            ..Default::default()
        }
    }
}

pub(super) fn resolve_entity(
    object: &mut CadObject,
    data: &EntityTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    let layer = builder.resolve_named::<Layer>(&data.layer, referrer, "layer");
    let linetype = match data.linetype_flag {
        Some(flag) if flag != LineTypeFlag::Handle => builder.well_known_linetype(flag, referrer),
        _ => builder.resolve_named::<LineType>(&data.linetype, referrer, "line type"),
    };
    if let Some(entity) = object.entity_mut() {
        entity.layer = layer;
        entity.linetype = linetype;
    }

    match &data.kind {
        EntityKindData::None => {}
        EntityKindData::Text { style } => {
            let style = builder.resolve_named::<TextStyle>(style, referrer, "text style");
            if let Some(slot) = text_style_slot(object) {
                *slot = style;
            }
        }
        EntityKindData::Insert(insert) => resolve_insert(object, insert, builder, referrer),
        EntityKindData::Polyline(polyline) => {
            let vertices = owned_chain::<Vertex>(builder, &polyline.vertices, referrer);
            let seqend = builder.resolve_handle::<Seqend>(polyline.seqend, referrer, "seqend");
            builder.enqueue(seqend.handle());
            if let CadObject::Polyline(p) = object {
                p.vertices = vertices;
                p.seqend = OwnedRef::new(seqend.handle());
            }
        }
        EntityKindData::Dimension(dimension) => {
            let style =
                builder.resolve_named::<DimStyle>(&dimension.style, referrer, "dimension style");
            let block = builder.resolve_named::<BlockRecord>(&dimension.block, referrer, "block");
            if let CadObject::Dimension(d) = object {
                d.style = style;
                d.block = block;
            }
        }
    }
}

fn resolve_insert(
    object: &mut CadObject,
    data: &InsertTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    let block = builder.resolve_named::<BlockRecord>(&data.block, referrer, "block");
    let attributes = owned_chain::<AttributeEntity>(builder, &data.attributes, referrer);
    let seqend = builder.resolve_handle::<Seqend>(data.seqend, referrer, "seqend");
    builder.enqueue(seqend.handle());

    if let CadObject::Insert(insert) = object {
        insert.block = block;
        insert.attributes = attributes;
        insert.seqend = OwnedRef::new(seqend.handle());
    }
}

/// Walk a sub-entity chain, keeping only children of kind `T`
fn owned_chain<T: crate::object::ObjectKind>(
    builder: &mut DocumentBuilder,
    range: &LinkedRange,
    referrer: Referrer,
) -> Vec<OwnedRef<T>> {
    let mut children = Vec::new();
    for handle in builder.walk_chain(range, referrer) {
        if builder.contains_typed::<T>(handle) {
            builder.enqueue(handle);
            children.push(OwnedRef::new(handle));
        } else {
            builder.notify(
                NotificationType::Warning,
                format!("{} of {} is not a {}", handle, referrer, T::OBJECT_NAME),
            );
        }
    }
    children
}

fn text_style_slot(object: &mut CadObject) -> Option<&mut ObjectRef<TextStyle>> {
    match object {
        CadObject::Text(t) => Some(&mut t.style),
        CadObject::MText(t) => Some(&mut t.style),
        CadObject::AttributeDefinition(t) => Some(&mut t.style),
        CadObject::AttributeEntity(t) => Some(&mut t.style),
        _ => None,
    }
}

//! Shared template factories for acadlink integration tests.
//!
//! Every test crate imports this via `mod common;`. The factories mimic what
//! a format reader hands to the builder: objects in their decoded state plus
//! the raw handles and names of their references.

#![allow(dead_code)]

use acadlink::entities::{Block, BlockEnd, Circle, Line};
use acadlink::io::templates::{
    BlockRecordTemplateData, DictionaryTemplateData, GroupTemplateData, LayerTemplateData,
    LayoutTemplateData, LineTypeFlag, TableTemplateData,
};
use acadlink::io::{
    CadTemplate, DocumentBuilder, HeaderHandlesCollection, LinkedRange, NamedReference,
    TemplateData,
};
use acadlink::objects::{Dictionary, Group, Layout};
use acadlink::tables::{BlockRecord, Layer, LineType, Table, TableEntry, TableKind};
use acadlink::CadObject;
use acadlink::types::{Handle, Vector3};

// ===========================================================================
// Handles of the sample drawing
// ===========================================================================

pub const BLOCK_RECORD_TABLE: u64 = 0x1;
pub const LAYER_TABLE: u64 = 0x2;
pub const LINETYPE_TABLE: u64 = 0x5;
pub const ROOT_DICTIONARY: u64 = 0xC;
pub const GROUP_DICTIONARY: u64 = 0xD;
pub const LAYOUT_DICTIONARY: u64 = 0xE;
pub const LAYER_0: u64 = 0x10;
pub const LAYER_WALLS: u64 = 0x11;
pub const BYLAYER: u64 = 0x14;
pub const BYBLOCK: u64 = 0x15;
pub const CONTINUOUS: u64 = 0x16;
pub const MODEL_SPACE: u64 = 0x1F;
pub const MODEL_BLOCK: u64 = 0x20;
pub const MODEL_BLOCK_END: u64 = 0x21;
pub const MODEL_LAYOUT: u64 = 0x22;
pub const FIRST_LINE: u64 = 0x30;
pub const SECOND_LINE: u64 = 0x31;
pub const CIRCLE: u64 = 0x32;
pub const GROUP: u64 = 0x40;

pub fn h(value: u64) -> Handle {
    Handle::new(value)
}

// ===========================================================================
// Template factories
// ===========================================================================

pub fn table<T: TableEntry>(handle: u64, entries: &[u64]) -> CadTemplate
where
    Table<T>: Into<CadObject>,
{
    CadTemplate::with_data(
        Table::<T>::new(),
        TemplateData::Table(TableTemplateData {
            entries: entries.iter().copied().map(h).collect(),
        }),
    )
    .at(h(handle))
}

pub fn layer(handle: u64, name: &str, linetype: NamedReference) -> CadTemplate {
    CadTemplate::with_data(Layer::new(name), TemplateData::Layer(LayerTemplateData { linetype }))
        .at(h(handle))
        .owned_by(h(LAYER_TABLE))
}

pub fn linetype(handle: u64, linetype: LineType) -> CadTemplate {
    CadTemplate::new(linetype).at(h(handle)).owned_by(h(LINETYPE_TABLE))
}

pub fn dictionary(handle: u64, owner: u64, entries: &[(&str, u64)]) -> CadTemplate {
    CadTemplate::with_data(
        Dictionary::new(),
        TemplateData::Dictionary(DictionaryTemplateData {
            entries: entries.iter().map(|(k, v)| (k.to_string(), h(*v))).collect(),
            default_entry: Handle::NULL,
        }),
    )
    .at(h(handle))
    .owned_by(h(owner))
}

pub fn block_record(
    handle: u64,
    name: &str,
    block: u64,
    block_end: u64,
    entities: LinkedRange,
) -> CadTemplate {
    CadTemplate::with_data(
        BlockRecord::new(name),
        TemplateData::BlockRecord(BlockRecordTemplateData {
            block: h(block),
            block_end: h(block_end),
            entities,
            layout: Handle::NULL,
        }),
    )
    .at(h(handle))
    .owned_by(h(BLOCK_RECORD_TABLE))
}

/// A line on a layer given by reference, chained to `next`
pub fn line(handle: u64, layer: NamedReference, next: u64) -> CadTemplate {
    let segment = Line::from_points(Vector3::ZERO, Vector3::new(1.0, 1.0, 0.0));
    let mut template = CadTemplate::new(segment).at(h(handle));
    if let Some(data) = template.entity_data_mut() {
        data.layer = layer;
        data.next_entity = h(next);
    }
    template
}

// ===========================================================================
// Sample drawing
// ===========================================================================

/// Header of the sample drawing
pub fn sample_header() -> HeaderHandlesCollection {
    let mut header = HeaderHandlesCollection::new();
    header.set_table_control(TableKind::BlockRecord, h(BLOCK_RECORD_TABLE));
    header.set_table_control(TableKind::Layer, h(LAYER_TABLE));
    header.set_table_control(TableKind::LineType, h(LINETYPE_TABLE));
    header.set_dictionary_named_objects(h(ROOT_DICTIONARY));
    header.set_model_space(h(MODEL_SPACE));
    header.set_bylayer(h(BYLAYER));
    header.set_byblock(h(BYBLOCK));
    header.set_continuous(h(CONTINUOUS));
    header.set_clayer(h(LAYER_0));
    header
}

/// Templates of a small drawing: three tables, two layers, the model space
/// with a chain of three entities, a group and a layout.
///
/// References mix every encoding a reader produces: plain handles, names
/// only, well-known line type flags and a chain with an implicit next handle.
pub fn sample_templates() -> Vec<CadTemplate> {
    let mut circle =
        CadTemplate::new(Circle::from_center_radius(Vector3::ZERO, 2.5)).at(h(CIRCLE));
    if let Some(data) = circle.entity_data_mut() {
        data.layer = NamedReference::by_name("0");
        data.linetype_flag = Some(LineTypeFlag::ByLayer);
    }

    let mut model_space = block_record(
        MODEL_SPACE,
        BlockRecord::MODEL_SPACE,
        MODEL_BLOCK,
        MODEL_BLOCK_END,
        LinkedRange::chain(h(FIRST_LINE), h(CIRCLE)),
    );
    if let TemplateData::BlockRecord(data) = &mut model_space.data {
        data.layout = h(MODEL_LAYOUT);
    }

    vec![
        table::<BlockRecord>(BLOCK_RECORD_TABLE, &[MODEL_SPACE]),
        table::<Layer>(LAYER_TABLE, &[LAYER_0, LAYER_WALLS]),
        table::<LineType>(LINETYPE_TABLE, &[BYLAYER, BYBLOCK, CONTINUOUS]),
        dictionary(
            ROOT_DICTIONARY,
            0,
            &[
                (Dictionary::ACAD_GROUP, GROUP_DICTIONARY),
                (Dictionary::ACAD_LAYOUT, LAYOUT_DICTIONARY),
            ],
        ),
        dictionary(GROUP_DICTIONARY, ROOT_DICTIONARY, &[("*A1", GROUP)]),
        dictionary(LAYOUT_DICTIONARY, ROOT_DICTIONARY, &[(Layout::MODEL, MODEL_LAYOUT)]),
        layer(LAYER_0, Layer::DEFAULT_NAME, NamedReference::by_handle(h(CONTINUOUS))),
        layer(LAYER_WALLS, "Walls", NamedReference::by_name("continuous")),
        linetype(BYLAYER, LineType::by_layer()),
        linetype(BYBLOCK, LineType::by_block()),
        linetype(CONTINUOUS, LineType::continuous()),
        model_space,
        CadTemplate::new(Block::new(BlockRecord::MODEL_SPACE, Vector3::ZERO))
            .at(h(MODEL_BLOCK))
            .owned_by(h(MODEL_SPACE)),
        CadTemplate::new(BlockEnd::new())
            .at(h(MODEL_BLOCK_END))
            .owned_by(h(MODEL_SPACE)),
        // Layout without a name: the dictionary key names it
        CadTemplate::with_data(
            Layout::new(""),
            TemplateData::Layout(LayoutTemplateData {
                block_record: h(MODEL_SPACE),
            }),
        )
        .at(h(MODEL_LAYOUT))
        .owned_by(h(LAYOUT_DICTIONARY)),
        line(FIRST_LINE, NamedReference::by_handle(h(LAYER_WALLS)), SECOND_LINE),
        // No next handle: the chain continues with the following handle
        line(SECOND_LINE, NamedReference::by_name("walls"), 0),
        circle,
        CadTemplate::with_data(
            Group::new("*A1"),
            TemplateData::Group(GroupTemplateData {
                entities: vec![h(FIRST_LINE), h(CIRCLE)],
            }),
        )
        .at(h(GROUP))
        .owned_by(h(GROUP_DICTIONARY)),
    ]
}

/// Builder loaded with the sample drawing
pub fn sample_builder() -> DocumentBuilder {
    let mut builder = DocumentBuilder::new(sample_header());
    builder.add_templates(sample_templates());
    builder
}

//! Table and table entry templates

use super::{LinkedRange, NamedReference, Referrer};
use crate::entities::{Block, BlockEnd};
use crate::io::builder::DocumentBuilder;
use crate::notification::NotificationType;
use crate::object::CadObject;
use crate::objects::Layout;
use crate::tables::{BlockRecord, LineType, Table, TableEntry, TextStyle};
use crate::types::{Handle, OwnedRef};

/// Entries of a table, as listed by the table record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableTemplateData {
    pub entries: Vec<Handle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerTemplateData {
    pub linetype: NamedReference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineTypeTemplateData {
    /// Text style handle of a segment, by segment index
    pub segment_styles: Vec<(usize, Handle)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimStyleTemplateData {
    pub text_style: NamedReference,
    pub arrow_block: NamedReference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockRecordTemplateData {
    pub block: Handle,
    pub block_end: Handle,
    pub entities: LinkedRange,
    pub layout: Handle,
}

pub(super) fn resolve_table(
    object: &mut CadObject,
    data: &TableTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    match object {
        CadObject::AppIdTable(t) => fill_table(t, data, builder, referrer),
        CadObject::BlockRecordTable(t) => fill_table(t, data, builder, referrer),
        CadObject::DimStyleTable(t) => fill_table(t, data, builder, referrer),
        CadObject::LayerTable(t) => fill_table(t, data, builder, referrer),
        CadObject::LineTypeTable(t) => fill_table(t, data, builder, referrer),
        CadObject::TextStyleTable(t) => fill_table(t, data, builder, referrer),
        _ => {}
    }
}

fn fill_table<T: TableEntry>(
    table: &mut Table<T>,
    data: &TableTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    for &handle in &data.entries {
        let entry = builder.resolve_handle::<T>(handle, referrer, "entry");
        if entry.is_null() {
            continue;
        }
        let name = builder.entry_name(handle).unwrap_or_default();
        match table.add(&name, OwnedRef::new(handle)) {
            Ok(()) => builder.enqueue(handle),
            Err(e) => builder.notify_with_cause(
                NotificationType::Warning,
                format!("Entry {} of {} ignored", handle, referrer),
                &e,
            ),
        }
    }
}

pub(super) fn resolve_layer(
    object: &mut CadObject,
    data: &LayerTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    let linetype = builder.resolve_named::<LineType>(&data.linetype, referrer, "line type");
    if let CadObject::Layer(layer) = object {
        layer.linetype = linetype;
    }
}

pub(super) fn resolve_linetype(
    object: &mut CadObject,
    data: &LineTypeTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    let CadObject::LineType(linetype) = object else {
        return;
    };
    for &(index, handle) in &data.segment_styles {
        let style = builder.resolve_handle::<TextStyle>(handle, referrer, "segment style");
        match linetype.segments.get_mut(index) {
            Some(segment) => segment.style = style,
            None => builder.notify(
                NotificationType::Warning,
                format!("Segment {} of {} does not exist", index, referrer),
            ),
        }
    }
}

pub(super) fn resolve_dimstyle(
    object: &mut CadObject,
    data: &DimStyleTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    let text_style = builder.resolve_named::<TextStyle>(&data.text_style, referrer, "text style");
    let arrow_block =
        builder.resolve_named::<BlockRecord>(&data.arrow_block, referrer, "arrow block");
    if let CadObject::DimStyle(style) = object {
        style.text_style = text_style;
        style.arrow_block = arrow_block;
    }
}

pub(super) fn resolve_block_record(
    object: &mut CadObject,
    data: &BlockRecordTemplateData,
    builder: &mut DocumentBuilder,
    referrer: Referrer,
) {
    let block = builder.resolve_handle::<Block>(data.block, referrer, "block");
    let block_end = builder.resolve_handle::<BlockEnd>(data.block_end, referrer, "block end");
    let layout = builder.resolve_handle::<Layout>(data.layout, referrer, "layout");
    builder.enqueue(block.handle());
    builder.enqueue(block_end.handle());

    let mut entities = Vec::new();
    for handle in builder.walk_chain(&data.entities, referrer) {
        if builder.is_entity(handle) {
            builder.enqueue(handle);
            entities.push(OwnedRef::new(handle));
        } else {
            builder.notify(
                NotificationType::Warning,
                format!("{} owned by {} is not an entity", handle, referrer),
            );
        }
    }

    if let CadObject::BlockRecord(record) = object {
        record.block = OwnedRef::new(block.handle());
        record.block_end = OwnedRef::new(block_end.handle());
        record.layout = layout;
        for entity in entities {
            record.add_entity(entity);
        }
    }
}

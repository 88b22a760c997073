//! Per-kind decomposition of objects into records

use super::record::ObjectRecord;
use crate::entities::*;
use crate::error::{CadError, Result};
use crate::io::reference_type::ReferenceType;
use crate::object::{CadObject, ObjectCommon};
use crate::objects::{DictionaryEntries, DictionaryVariable, Group, Layout, XRecord, XRecordValue};
use crate::tables::*;
use crate::types::Vector3;
use crate::xdata::XDataValue;

/// Decompose an object into primitive fields and outgoing handles.
///
/// Ownership references are listed in the order the owned objects should
/// be visited. Unknown record kinds cannot be decomposed.
pub fn decompose(object: &CadObject) -> Result<ObjectRecord> {
    let mut record =
        ObjectRecord::new(object.object_name(), object.handle(), object.owner().handle());
    write_common(&mut record, object.common());
    if let Some(entity) = object.entity() {
        write_entity_common(&mut record, entity);
    }

    match object {
        CadObject::AppIdTable(t) => write_table(&mut record, t),
        CadObject::BlockRecordTable(t) => write_table(&mut record, t),
        CadObject::DimStyleTable(t) => write_table(&mut record, t),
        CadObject::LayerTable(t) => write_table(&mut record, t),
        CadObject::LineTypeTable(t) => write_table(&mut record, t),
        CadObject::TextStyleTable(t) => write_table(&mut record, t),

        CadObject::AppId(app) => {
            record.write_string(2, app.name.as_str());
            record.write_i16(70, app.flags);
        }
        CadObject::BlockRecord(r) => write_block_record(&mut record, r),
        CadObject::DimStyle(style) => write_dimstyle(&mut record, style),
        CadObject::Layer(layer) => write_layer(&mut record, layer),
        CadObject::LineType(linetype) => write_linetype(&mut record, linetype),
        CadObject::TextStyle(style) => write_textstyle(&mut record, style),

        CadObject::Dictionary(d) => {
            record.write_bool(280, d.hard_owner);
            record.write_i16(281, d.cloning.value());
            write_dictionary_entries(&mut record, &d.entries);
        }
        CadObject::DictionaryWithDefault(d) => {
            record.write_i16(281, d.cloning.value());
            write_dictionary_entries(&mut record, &d.entries);
            record.write_reference(340, ReferenceType::HardPointer, d.default_entry.handle());
        }
        CadObject::DictionaryVariable(v) => write_dictionary_variable(&mut record, v),
        CadObject::XRecord(x) => write_xrecord(&mut record, x),
        CadObject::Group(g) => write_group(&mut record, g),
        CadObject::Layout(l) => write_layout(&mut record, l),
        CadObject::Unknown(unknown) => {
            return Err(CadError::UnsupportedKind(unknown.record_name.clone()));
        }

        CadObject::Point(p) => {
            record.write_point(10, p.location);
            record.write_double(39, p.thickness);
            record.write_point(210, p.normal);
        }
        CadObject::Line(line) => {
            record.write_point(10, line.start);
            record.write_point(11, line.end);
            record.write_double(39, line.thickness);
            record.write_point(210, line.normal);
        }
        CadObject::Circle(c) => {
            record.write_point(10, c.center);
            record.write_double(40, c.radius);
            record.write_double(39, c.thickness);
            record.write_point(210, c.normal);
        }
        CadObject::Arc(arc) => {
            record.write_point(10, arc.center);
            record.write_double(40, arc.radius);
            record.write_double(50, arc.start_angle);
            record.write_double(51, arc.end_angle);
            record.write_double(39, arc.thickness);
            record.write_point(210, arc.normal);
        }
        CadObject::Text(text) => write_text(&mut record, text),
        CadObject::MText(mtext) => write_mtext(&mut record, mtext),
        CadObject::AttributeDefinition(attdef) => {
            record.write_string(2, attdef.tag.as_str());
            record.write_string(3, attdef.prompt.as_str());
            record.write_string(1, attdef.default_value.as_str());
            record.write_point(10, attdef.insertion_point);
            record.write_double(40, attdef.height);
            record.write_double(50, attdef.rotation);
            record.write_i16(70, attdef.flags.bits());
            record.write_reference(7, ReferenceType::HardPointer, attdef.style.handle());
        }
        CadObject::AttributeEntity(attrib) => {
            record.write_string(2, attrib.tag.as_str());
            record.write_string(1, attrib.value.as_str());
            record.write_point(10, attrib.insertion_point);
            record.write_double(40, attrib.height);
            record.write_double(50, attrib.rotation);
            record.write_i16(70, attrib.flags.bits());
            record.write_reference(7, ReferenceType::HardPointer, attrib.style.handle());
        }
        CadObject::Insert(insert) => write_insert(&mut record, insert),
        CadObject::Polyline(polyline) => write_polyline(&mut record, polyline),
        CadObject::Vertex(vertex) => {
            record.write_point(10, vertex.location);
            record.write_double(40, vertex.start_width);
            record.write_double(41, vertex.end_width);
            record.write_double(42, vertex.bulge);
            record.write_i16(70, vertex.flags.bits());
        }
        CadObject::Seqend(_) | CadObject::BlockEnd(_) => {}
        CadObject::Block(block) => {
            record.write_string(2, block.name.as_str());
            record.write_point(10, block.base_point);
            record.write_i16(70, block.flags.bits());
            record.write_string(4, block.description.as_str());
            record.write_string(1, block.xref_path.as_str());
        }
        CadObject::Dimension(dimension) => write_dimension(&mut record, dimension),
    }
    Ok(record)
}

fn write_common(record: &mut ObjectRecord, common: &ObjectCommon) {
    record.write_reference(330, ReferenceType::SoftPointer, common.owner.handle());
    for reactor in &common.reactors {
        record.write_reference(330, ReferenceType::SoftPointer, reactor.handle());
    }
    if let Some(xdict) = common.xdictionary {
        record.write_reference(360, ReferenceType::HardOwnership, xdict.handle());
    }

    for (app, data) in common.extended_data.iter() {
        record.write_reference(1001, ReferenceType::HardPointer, app.handle());
        for value in &data.values {
            match value {
                XDataValue::String(s) | XDataValue::ControlString(s) | XDataValue::LayerName(s) => {
                    record.write_string(value.code(), s.as_str())
                }
                XDataValue::BinaryData(bytes) => record.write_bytes(value.code(), bytes.clone()),
                XDataValue::Handle(h) => {
                    record.write_reference(value.code(), ReferenceType::SoftPointer, *h)
                }
                XDataValue::Point3D(p) => record.write_point(value.code(), *p),
                XDataValue::Real(v) | XDataValue::Distance(v) | XDataValue::ScaleFactor(v) => {
                    record.write_double(value.code(), *v)
                }
                XDataValue::Integer16(v) => record.write_i16(value.code(), *v),
                XDataValue::Integer32(v) => record.write_i32(value.code(), *v),
            }
        }
    }
}

fn write_entity_common(record: &mut ObjectRecord, entity: &EntityCommon) {
    record.write_reference(8, ReferenceType::HardPointer, entity.layer.handle());
    record.write_reference(6, ReferenceType::HardPointer, entity.linetype.handle());
    record.write_i16(62, entity.color.index_code());
    if let Some(true_color) = entity.color.true_color() {
        record.write_i32(420, true_color);
    }
    record.write_i16(370, entity.line_weight.value());
    record.write_double(48, entity.linetype_scale);
    record.write_bool(60, entity.invisible);
}

fn write_table<T: TableEntry>(record: &mut ObjectRecord, table: &Table<T>) {
    record.write_string(2, T::KIND.entry_name());
    record.write_i16(70, i16::try_from(table.len()).unwrap_or(i16::MAX));
    for handle in table.handles() {
        record.write_reference(350, ReferenceType::SoftOwnership, handle);
    }
}

fn write_block_record(record: &mut ObjectRecord, block_record: &BlockRecord) {
    record.write_string(2, block_record.name.as_str());
    record.write_i16(70, block_record.flags.bits());
    record.write_point(10, block_record.base_point);
    record.write_string(4, block_record.description.as_str());
    record.write_reference(340, ReferenceType::SoftPointer, block_record.layout.handle());

    record.write_reference(360, ReferenceType::HardOwnership, block_record.block.handle());
    for entity in &block_record.entities {
        record.write_reference(360, ReferenceType::HardOwnership, entity.handle());
    }
    record.write_reference(360, ReferenceType::HardOwnership, block_record.block_end.handle());
}

fn write_dimstyle(record: &mut ObjectRecord, style: &DimStyle) {
    record.write_string(2, style.name.as_str());
    record.write_double(40, style.dimscale);
    record.write_double(41, style.dimasz);
    record.write_double(140, style.dimtxt);
    record.write_double(147, style.dimgap);
    record.write_reference(340, ReferenceType::HardPointer, style.text_style.handle());
    record.write_reference(342, ReferenceType::HardPointer, style.arrow_block.handle());
}

fn write_layer(record: &mut ObjectRecord, layer: &Layer) {
    record.write_string(2, layer.name.as_str());
    record.write_i16(70, layer.flags.bits());
    // Negative color index: layer is off
    let color = layer.color.index_code();
    record.write_i16(62, if layer.is_off { -color.abs() } else { color });
    if let Some(true_color) = layer.color.true_color() {
        record.write_i32(420, true_color);
    }
    record.write_reference(6, ReferenceType::HardPointer, layer.linetype.handle());
    record.write_i16(370, layer.line_weight.value());
    record.write_bool(290, layer.is_plottable);
}

fn write_linetype(record: &mut ObjectRecord, linetype: &LineType) {
    record.write_string(2, linetype.name.as_str());
    record.write_string(3, linetype.description.as_str());
    record.write_i16(72, linetype.alignment as u8 as i16);
    record.write_i16(73, i16::try_from(linetype.segments.len()).unwrap_or(i16::MAX));
    record.write_double(40, linetype.pattern_length);
    for segment in &linetype.segments {
        record.write_double(49, segment.length);
        record.write_i16(75, segment.shape_number);
        record.write_reference(340, ReferenceType::HardPointer, segment.style.handle());
        record.write_double(46, segment.scale);
        record.write_double(50, segment.rotation);
        record.write_point(44, segment.offset);
        record.write_string(9, segment.text.as_str());
    }
}

fn write_textstyle(record: &mut ObjectRecord, style: &TextStyle) {
    record.write_string(2, style.name.as_str());
    record.write_i16(70, style.flags.bits());
    record.write_double(40, style.height);
    record.write_double(41, style.width_factor);
    record.write_double(50, style.oblique_angle);
    record.write_string(3, style.font_file.as_str());
    record.write_string(4, style.big_font_file.as_str());
}

fn write_dictionary_entries(record: &mut ObjectRecord, entries: &DictionaryEntries) {
    for (key, entry) in entries.iter() {
        record.write_string(3, key);
        record.write_reference(350, ReferenceType::SoftOwnership, entry.handle());
    }
}

fn write_dictionary_variable(record: &mut ObjectRecord, variable: &DictionaryVariable) {
    record.write_i16(280, variable.schema_number);
    record.write_string(1, variable.value.as_str());
}

/// Raw handles of an xrecord are pointers by code range; the xrecord owns
/// nothing
fn xrecord_reference_type(code: i32) -> ReferenceType {
    match code {
        340..=349 | 360..=369 => ReferenceType::HardPointer,
        _ => ReferenceType::SoftPointer,
    }
}

fn write_xrecord(record: &mut ObjectRecord, xrecord: &XRecord) {
    record.write_i16(280, xrecord.cloning.value());
    for entry in &xrecord.entries {
        let code = entry.code;
        match &entry.value {
            XRecordValue::String(s) => record.write_string(code, s.as_str()),
            XRecordValue::Double(v) => record.write_double(code, *v),
            XRecordValue::Int16(v) => record.write_i16(code, *v),
            XRecordValue::Int32(v) => record.write_i32(code, *v),
            XRecordValue::Int64(v) => record.write_i64(code, *v),
            XRecordValue::Bool(v) => record.write_bool(code, *v),
            XRecordValue::Handle(h) => {
                record.write_reference(code, xrecord_reference_type(code), *h)
            }
            XRecordValue::Point3D(p) => record.write_point(code, *p),
            XRecordValue::Chunk(bytes) => record.write_bytes(code, bytes.clone()),
        }
    }
}

fn write_group(record: &mut ObjectRecord, group: &Group) {
    record.write_string(300, group.description.as_str());
    record.write_bool(70, group.is_unnamed());
    record.write_bool(71, group.selectable);
    for entity in &group.entities {
        record.write_reference(340, ReferenceType::HardPointer, entity.handle());
    }
}

fn write_layout(record: &mut ObjectRecord, layout: &Layout) {
    record.write_string(1, layout.name.as_str());
    record.write_i16(70, layout.flags);
    record.write_i16(71, layout.tab_order);
    record.write_point(10, Vector3::new(layout.min_limits.0, layout.min_limits.1, 0.0));
    record.write_point(11, Vector3::new(layout.max_limits.0, layout.max_limits.1, 0.0));
    record.write_point(12, layout.insertion_base);
    record.write_reference(340, ReferenceType::HardPointer, layout.block_record.handle());
}

fn write_text(record: &mut ObjectRecord, text: &Text) {
    record.write_string(1, text.value.as_str());
    record.write_point(10, text.insertion_point);
    if let Some(alignment) = text.alignment_point {
        record.write_point(11, alignment);
    }
    record.write_double(40, text.height);
    record.write_double(50, text.rotation);
    record.write_double(41, text.width_factor);
    record.write_double(51, text.oblique_angle);
    record.write_reference(7, ReferenceType::HardPointer, text.style.handle());
    record.write_point(210, text.normal);
}

fn write_mtext(record: &mut ObjectRecord, mtext: &MText) {
    record.write_string(1, mtext.value.as_str());
    record.write_point(10, mtext.insertion_point);
    record.write_double(40, mtext.height);
    record.write_double(41, mtext.rectangle_width);
    record.write_double(50, mtext.rotation);
    record.write_i16(71, mtext.attachment_point.value());
    record.write_reference(7, ReferenceType::HardPointer, mtext.style.handle());
    record.write_point(210, mtext.normal);
}

fn write_insert(record: &mut ObjectRecord, insert: &Insert) {
    record.write_reference(2, ReferenceType::HardPointer, insert.block.handle());
    record.write_point(10, insert.insert_point);
    record.write_point(41, insert.scale);
    record.write_double(50, insert.rotation);
    record.write_point(210, insert.normal);
    record.write_bool(66, insert.has_attributes());
    for attribute in &insert.attributes {
        record.write_reference(360, ReferenceType::HardOwnership, attribute.handle());
    }
    record.write_reference(360, ReferenceType::HardOwnership, insert.seqend.handle());
}

fn write_polyline(record: &mut ObjectRecord, polyline: &Polyline) {
    record.write_i16(70, polyline.flags.bits());
    record.write_double(30, polyline.elevation);
    record.write_double(40, polyline.default_start_width);
    record.write_double(41, polyline.default_end_width);
    record.write_point(210, polyline.normal);
    for vertex in &polyline.vertices {
        record.write_reference(360, ReferenceType::HardOwnership, vertex.handle());
    }
    record.write_reference(360, ReferenceType::HardOwnership, polyline.seqend.handle());
}

fn write_dimension(record: &mut ObjectRecord, dimension: &Dimension) {
    record.write_i16(70, dimension.dimension_type.value());
    record.write_point(10, dimension.definition_point);
    record.write_point(11, dimension.text_middle_point);
    record.write_string(1, dimension.text.as_str());
    record.write_double(42, dimension.measurement);
    record.write_reference(3, ReferenceType::HardPointer, dimension.style.handle());
    record.write_reference(2, ReferenceType::HardPointer, dimension.block.handle());
    record.write_point(210, dimension.normal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Dictionary, UnknownObject};
    use crate::types::{Handle, ObjectRef, OwnedRef};

    #[test]
    fn test_line_record() {
        let mut line = Line::from_points(Vector3::ZERO, Vector3::new(1.0, 2.0, 0.0));
        line.object.handle = Handle::new(0x30);
        line.object.owner = ObjectRef::new(Handle::new(0x1F));
        line.common.layer = ObjectRef::new(Handle::new(0x10));

        let record = decompose(&line.into()).unwrap();
        assert_eq!(record.type_name, "LINE");
        assert_eq!(record.owner, Handle::new(0x1F));
        assert_eq!(
            record.references_of(ReferenceType::HardPointer).collect::<Vec<_>>(),
            vec![Handle::new(0x10)]
        );
        assert_eq!(record.owned_handles().count(), 0);
    }

    #[test]
    fn test_polyline_owns_vertices_then_seqend() {
        let mut polyline = Polyline::new();
        polyline.vertices = vec![
            OwnedRef::new(Handle::new(0x21)),
            OwnedRef::new(Handle::new(0x22)),
        ];
        polyline.seqend = OwnedRef::new(Handle::new(0x23));
        polyline.object.xdictionary = Some(OwnedRef::new(Handle::new(0x40)));

        let record = decompose(&polyline.into()).unwrap();
        let owned: Vec<u64> = record.owned_handles().map(|h| h.value()).collect();
        assert_eq!(owned, vec![0x40, 0x21, 0x22, 0x23]);
    }

    #[test]
    fn test_dictionary_entries_are_soft_owned() {
        let mut dictionary = Dictionary::new();
        dictionary.add_entry("ACAD_GROUP", OwnedRef::new(Handle::new(0xD))).unwrap();

        let record = decompose(&dictionary.into()).unwrap();
        assert_eq!(
            record.references_of(ReferenceType::SoftOwnership).collect::<Vec<_>>(),
            vec![Handle::new(0xD)]
        );
        assert_eq!(record.field(3).and_then(|v| v.as_str()), Some("ACAD_GROUP"));
    }

    #[test]
    fn test_xrecord_handles_are_pointers() {
        let mut xrecord = XRecord::new();
        xrecord.add_handle(360, Handle::new(0x50));
        xrecord.add_handle(330, Handle::new(0x51));

        let record = decompose(&xrecord.into()).unwrap();
        assert_eq!(record.owned_handles().count(), 0);
        assert_eq!(record.references_of(ReferenceType::HardPointer).count(), 1);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let unknown = UnknownObject::new("ACAD_PROXY_OBJECT");
        let err = decompose(&unknown.into()).unwrap_err();
        assert!(matches!(err, CadError::UnsupportedKind(name) if name == "ACAD_PROXY_OBJECT"));
    }
}

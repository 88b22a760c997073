//! Document writer integration tests: traversal order, coverage and record
//! contents of a built document.

mod common;

use acadlink::error::CadError;
use acadlink::io::writer::FieldValue;
use acadlink::io::{DocumentWriter, ObjectRecord, RecordSink, ReferenceType};
use acadlink::xdata::{ExtendedDataRecord, XDataValue};
use acadlink::{CadDocument, Line};
use ahash::AHashMap;
use common::*;

fn write_all(document: &CadDocument) -> anyhow::Result<Vec<ObjectRecord>> {
    let mut records = Vec::new();
    let mut writer = DocumentWriter::new(document);
    writer.write(&mut records)?;
    anyhow::ensure!(
        writer.notifications().is_empty(),
        "unexpected notifications: {:?}",
        writer.notifications()
    );
    Ok(records)
}

#[test]
fn test_every_object_written_once() -> anyhow::Result<()> {
    let document = sample_builder().build()?;
    let records = write_all(&document)?;

    assert_eq!(records.len(), document.registry().len());
    let mut seen = AHashMap::new();
    for record in &records {
        assert!(seen.insert(record.handle, record.type_name).is_none(), "{} twice", record.handle);
    }
    Ok(())
}

#[test]
fn test_roots_come_first() -> anyhow::Result<()> {
    let document = sample_builder().build()?;
    let records = write_all(&document)?;

    let tables: Vec<&str> = records[..6]
        .iter()
        .filter_map(|r| r.field(2).and_then(FieldValue::as_str))
        .collect();
    assert_eq!(tables, vec!["LTYPE", "LAYER", "STYLE", "APPID", "DIMSTYLE", "BLOCK_RECORD"]);
    assert_eq!(records[6].type_name, "DICTIONARY");
    assert_eq!(records[6].handle, h(ROOT_DICTIONARY));
    Ok(())
}

#[test]
fn test_owner_written_before_owned() -> anyhow::Result<()> {
    let document = sample_builder().build()?;
    let records = write_all(&document)?;

    let position: AHashMap<_, _> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.handle, i))
        .collect();
    for (i, record) in records.iter().enumerate() {
        for owned in record.owned_handles() {
            assert!(position[&owned] > i, "{} written before its owner {}", owned, record.handle);
        }
    }
    Ok(())
}

#[test]
fn test_model_space_owns_markers_and_entities_in_order() -> anyhow::Result<()> {
    let document = sample_builder().build()?;
    let records = write_all(&document)?;

    let model = records
        .iter()
        .find(|r| r.handle == h(MODEL_SPACE))
        .expect("model space record");
    let owned: Vec<_> = model.owned_handles().collect();
    assert_eq!(
        owned,
        vec![h(MODEL_BLOCK), h(FIRST_LINE), h(SECOND_LINE), h(CIRCLE), h(MODEL_BLOCK_END)]
    );
    Ok(())
}

#[test]
fn test_entity_record_carries_layer_pointer() -> anyhow::Result<()> {
    let document = sample_builder().build()?;
    let records = write_all(&document)?;

    let line = records
        .iter()
        .find(|r| r.handle == h(FIRST_LINE))
        .expect("line record");
    assert_eq!(line.type_name, "LINE");
    assert_eq!(line.owner, h(MODEL_SPACE));
    let layer: Vec<_> = line.references_of(ReferenceType::HardPointer).collect();
    assert!(layer.contains(&h(LAYER_WALLS)));
    assert!(line.references_of(ReferenceType::SoftPointer).any(|r| r == h(MODEL_SPACE)));
    Ok(())
}

#[test]
fn test_extended_data_handles_are_soft_pointers() -> anyhow::Result<()> {
    let mut document = CadDocument::new();
    let acad = document
        .table::<acadlink::AppId>()
        .and_then(|t| t.get("ACAD"))
        .expect("ACAD app id");
    let target = document.add_entity(Line::new())?;
    let line = document.add_entity(Line::new())?;

    let mut data = ExtendedDataRecord::new();
    data.add_value(XDataValue::String("note".to_string()));
    data.add_value(XDataValue::Handle(target));
    document
        .try_lookup_mut::<Line>(line)
        .expect("line")
        .object
        .extended_data
        .insert(acadlink::ObjectRef::new(acad.handle()), data);

    let records = write_all(&document)?;
    let record = records.iter().find(|r| r.handle == line).expect("line record");
    assert!(record.references_of(ReferenceType::HardPointer).any(|h| h == acad.handle()));
    assert!(record.references_of(ReferenceType::SoftPointer).any(|h| h == target));
    assert_eq!(record.field(1000).and_then(FieldValue::as_str), Some("note"));
    Ok(())
}

struct LimitedSink {
    records: Vec<ObjectRecord>,
    capacity: usize,
}

impl RecordSink for LimitedSink {
    fn write_record(&mut self, record: ObjectRecord) -> acadlink::Result<()> {
        if self.records.len() == self.capacity {
            return Err(CadError::Custom("sink full".to_string()));
        }
        self.records.push(record);
        Ok(())
    }
}

#[test]
fn test_sink_error_stops_writing() -> anyhow::Result<()> {
    let document = sample_builder().build()?;
    let mut sink = LimitedSink {
        records: Vec::new(),
        capacity: 4,
    };

    let err = DocumentWriter::new(&document).write(&mut sink).unwrap_err();
    assert!(matches!(err, CadError::Custom(ref m) if m == "sink full"));
    assert_eq!(sink.records.len(), 4);
    Ok(())
}

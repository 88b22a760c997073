//! Build and write throughput for a drawing of chained lines.

use acadlink::entities::{Block, BlockEnd, Line};
use acadlink::io::templates::{BlockRecordTemplateData, TableTemplateData};
use acadlink::io::{
    CadTemplate, DocumentBuilder, DocumentWriter, HeaderHandlesCollection, LinkedRange,
    NamedReference, ObjectRecord, TemplateData,
};
use acadlink::tables::{BlockRecord, Layer, Table, TableKind};
use acadlink::{Handle, Vector3};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const LAYERS: u64 = 16;
const FIRST_ENTITY: u64 = 0x1000;

fn drawing(entities: u64) -> (HeaderHandlesCollection, Vec<CadTemplate>) {
    let mut header = HeaderHandlesCollection::new();
    header.set_table_control(TableKind::Layer, Handle::new(0x2));
    header.set_table_control(TableKind::BlockRecord, Handle::new(0x1));
    header.set_model_space(Handle::new(0x1F));

    let mut templates = vec![
        CadTemplate::with_data(
            Table::<Layer>::new(),
            TemplateData::Table(TableTemplateData {
                entries: (0..LAYERS).map(|i| Handle::new(0x100 + i)).collect(),
            }),
        )
        .at(Handle::new(0x2)),
        CadTemplate::with_data(
            Table::<BlockRecord>::new(),
            TemplateData::Table(TableTemplateData {
                entries: vec![Handle::new(0x1F)],
            }),
        )
        .at(Handle::new(0x1)),
        CadTemplate::with_data(
            BlockRecord::model_space(),
            TemplateData::BlockRecord(BlockRecordTemplateData {
                block: Handle::new(0x20),
                block_end: Handle::new(0x21),
                entities: LinkedRange::chain(
                    Handle::new(FIRST_ENTITY),
                    Handle::new(FIRST_ENTITY + entities - 1),
                ),
                layout: Handle::NULL,
            }),
        )
        .at(Handle::new(0x1F)),
        CadTemplate::new(Block::new(BlockRecord::MODEL_SPACE, Vector3::ZERO)).at(Handle::new(0x20)),
        CadTemplate::new(BlockEnd::new()).at(Handle::new(0x21)),
    ];

    for i in 0..LAYERS {
        templates.push(CadTemplate::new(Layer::new(format!("L{i}"))).at(Handle::new(0x100 + i)));
    }

    for i in 0..entities {
        let start = Vector3::new(i as f64, 0.0, 0.0);
        let mut line = CadTemplate::new(Line::from_points(start, Vector3::new(i as f64, 1.0, 0.0)))
            .at(Handle::new(FIRST_ENTITY + i));
        if let Some(data) = line.entity_data_mut() {
            // Alternate both encodings of the layer reference
            data.layer = if i % 2 == 0 {
                NamedReference::by_handle(Handle::new(0x100 + i % LAYERS))
            } else {
                NamedReference::by_name(format!("l{}", i % LAYERS))
            };
        }
        templates.push(line);
    }

    (header, templates)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for entities in [100u64, 1_000, 10_000] {
        let (header, templates) = drawing(entities);
        group.throughput(Throughput::Elements(entities));
        group.bench_with_input(BenchmarkId::from_parameter(entities), &entities, |b, _| {
            b.iter(|| {
                let mut builder = DocumentBuilder::new(header.clone());
                builder.add_templates(templates.iter().cloned());
                black_box(builder.build().expect("drawing builds"))
            })
        });
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    for entities in [1_000u64, 10_000] {
        let (header, templates) = drawing(entities);
        let mut builder = DocumentBuilder::new(header);
        builder.add_templates(templates);
        let document = builder.build().expect("drawing builds");

        group.throughput(Throughput::Elements(entities));
        group.bench_with_input(BenchmarkId::from_parameter(entities), &document, |b, document| {
            b.iter(|| {
                let mut records: Vec<ObjectRecord> = Vec::new();
                DocumentWriter::new(document)
                    .write(&mut records)
                    .expect("document writes");
                black_box(records)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_write);
criterion_main!(benches);

//! Performance benchmarks for BoM parsing and serialization.
//!
//! Run with: cargo bench --bench roundtrip

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use granta_bom::model::common::{MaterialQuantity, UnittedValue};
use granta_bom::model::eco2301::{BillOfMaterials, Material, Part};
use granta_bom::reference::{RecordIdentity, RecordReference};
use granta_bom::{Bom, BomHandler};
use std::hint::black_box;

/// Generate a flat BoM with the specified number of parts, two materials
/// each, referenced by record history identity.
fn generate_bom(part_count: usize) -> Bom {
    let mut components = Vec::with_capacity(part_count);
    for i in 0..part_count {
        let mut part = Part::new(format!("PN-{i:06}"));
        part.quantity = Some(UnittedValue::new(1.0 + i as f64, "Each"));
        for j in 0..2 {
            let reference = RecordReference {
                database_key: Some("MI_Restricted_Substances".to_string()),
                identity: Some(RecordIdentity {
                    record_history_identity: (i * 2 + j) as i64,
                    version: None,
                }),
                ..Default::default()
            };
            let mut material = Material::new(reference);
            material.quantity = Some(MaterialQuantity::Percentage(50.0));
            part.materials.push(material);
        }
        components.push(part);
    }
    Bom::from(BillOfMaterials::new(components))
}

fn benchmark_serialize(c: &mut Criterion) {
    let handler = BomHandler::new();
    let mut group = c.benchmark_group("serialize");
    for size in [10, 100, 1000] {
        let bom = generate_bom(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bom, |b, bom| {
            b.iter(|| handler.dump_bom(black_box(bom)));
        });
    }
    group.finish();
}

fn benchmark_parse(c: &mut Criterion) {
    let handler = BomHandler::new();
    let mut group = c.benchmark_group("parse");
    for size in [10, 100, 1000] {
        let text = handler
            .dump_bom(&generate_bom(size))
            .expect("serialization of a generated BoM");
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| handler.load_bom_from_text(black_box(text)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_serialize, benchmark_parse);
criterion_main!(benches);

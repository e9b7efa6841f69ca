//! Property-based tests for the BoM codec.
//!
//! Generates randomized 23/01 trees and checks that a dump/load cycle in
//! strict mode reproduces the tree exactly, and that reference resolution
//! never panics on arbitrary field combinations.

use granta_bom::model::common::{MaterialQuantity, RecycleContent, UnittedValue};
use granta_bom::model::eco2301::{BillOfMaterials, BomDetails, Material, Part};
use granta_bom::reference::{RecordIdentity, RecordReference};
use granta_bom::{Bom, BomHandler, ReadMode};
use proptest::prelude::*;

/// XML text content, without leading or trailing whitespace (insignificant
/// whitespace around text nodes is not preserved by design).
fn text_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.&<-]{1,20}"
}

fn finite_value() -> impl Strategy<Value = f64> {
    0.0..1.0e9f64
}

fn record_reference() -> impl Strategy<Value = RecordReference> {
    (
        prop::option::of(text_value()),
        prop::option::of((any::<i64>(), prop::option::of(any::<u32>()))),
        prop::option::of(text_value()),
        prop::option::of(text_value()),
        prop::option::of(text_value()),
    )
        .prop_map(
            |(database_key, identity, record_guid, record_history_guid, record_uid)| {
                RecordReference {
                    database_key,
                    identity: identity.map(|(record_history_identity, version)| RecordIdentity {
                        record_history_identity,
                        version,
                    }),
                    record_guid,
                    record_history_guid,
                    lookup_value: None,
                    record_uid,
                }
            },
        )
}

fn unitted_value() -> impl Strategy<Value = UnittedValue> {
    (finite_value(), prop::option::of(text_value()))
        .prop_map(|(value, unit)| UnittedValue { value, unit })
}

fn material() -> impl Strategy<Value = Material> {
    (
        record_reference(),
        prop::option::of(prop_oneof![
            (0.0..100.0f64).prop_map(MaterialQuantity::Percentage),
            unitted_value().prop_map(MaterialQuantity::Mass),
        ]),
        prop::option::of(prop_oneof![
            any::<bool>().prop_map(RecycleContent::Typical),
            (0.0..100.0f64).prop_map(RecycleContent::Percentage),
        ]),
        prop::option::of(text_value()),
    )
        .prop_map(|(reference, quantity, recycle_content, name)| {
            let mut material = Material::new(reference);
            material.quantity = quantity;
            material.recycle_content = recycle_content;
            material.name = name;
            material
        })
}

fn part() -> impl Strategy<Value = Part> {
    (
        text_value(),
        prop::option::of(unitted_value()),
        prop::option::of(record_reference()),
        prop::collection::vec(material(), 0..3),
        prop::collection::vec(text_value(), 0..3),
    )
        .prop_map(|(part_number, quantity, reference, materials, rohs_exemptions)| {
            let mut part = Part::new(part_number);
            part.quantity = quantity;
            part.mi_part_reference = reference;
            part.materials = materials;
            part.rohs_exemptions = rohs_exemptions;
            part
        })
}

fn bill_of_materials() -> impl Strategy<Value = BillOfMaterials> {
    (
        prop::collection::vec(part(), 0..4),
        prop::option::of(prop::option::of(text_value()).prop_map(|notes| BomDetails {
            notes,
            picture_url: None,
            product_name: None,
        })),
        prop::option::of(text_value()),
    )
        .prop_map(|(components, notes, internal_id)| {
            let mut bom = BillOfMaterials::new(components);
            bom.notes = notes;
            bom.internal_id = internal_id;
            bom
        })
}

proptest! {
    // Codec round trips dominate runtime, so fewer cases than a pure
    // type-invariant suite.
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn dump_then_load_reproduces_tree(tree in bill_of_materials()) {
        let handler = BomHandler::with_mode(ReadMode::Strict);
        let bom = Bom::from(tree);
        let text = handler.dump_bom(&bom).unwrap();
        let reloaded = handler.load_bom_from_text(&text).unwrap();
        prop_assert_eq!(reloaded, bom);
    }

    #[test]
    fn reference_resolution_never_panics(reference in record_reference()) {
        let resolved = reference.resolve();
        prop_assert_eq!(resolved.is_none(), reference.is_empty());
        // Stable across repeated calls.
        prop_assert_eq!(
            format!("{:?}", reference.resolve()),
            format!("{:?}", resolved)
        );
    }

    #[test]
    fn load_of_arbitrary_text_never_panics(text in "\\PC{0,300}") {
        let _ = BomHandler::new().load_bom_from_text(&text);
    }
}

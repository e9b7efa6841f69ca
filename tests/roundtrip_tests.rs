//! End-to-end load/dump tests across all supported schema versions.
//!
//! Exercises the full handler path: version detection, namespace handling,
//! lenient/strict reading, choice-group enforcement, and file IO.

use granta_bom::model::common::{
    DimensionType, MaterialQuantity, ProcessAmount, RecycleContent, UnittedValue,
};
use granta_bom::model::{eco2301, eco2412, eco2505};
use granta_bom::reference::{RecordIdentity, RecordReference, ResolvedReference};
use granta_bom::{Bom, BomError, BomHandler, BomVersion, ReadMode};

const ECO2301_NS: &str = "http://www.grantadesign.com/23/01/BillOfMaterialsEco";

fn identity_reference(identity: i64) -> RecordReference {
    RecordReference {
        database_key: Some("MI_Restricted_Substances".to_owned()),
        identity: Some(RecordIdentity {
            record_history_identity: identity,
            version: None,
        }),
        ..Default::default()
    }
}

fn sample_eco2301() -> eco2301::BillOfMaterials {
    let mut material = eco2301::Material::new(identity_reference(12345));
    material.quantity = Some(MaterialQuantity::Mass(UnittedValue::new(0.5, "kg")));
    material.recycle_content = Some(RecycleContent::Percentage(35.0));
    material.end_of_life_fates.push(eco2301::EndOfLifeFate {
        mi_end_of_life_reference: identity_reference(99),
        fraction: 0.8,
    });

    let mut process = eco2301::Process::new(
        identity_reference(321),
        DimensionType::Mass,
        ProcessAmount::Percentage(100.0),
    );
    process.name = Some("Casting".to_owned());

    let mut child = eco2301::Part::new("CHILD-01");
    child.quantity = Some(UnittedValue::new(4.0, "Each"));
    child.materials.push(material);
    child.processes.push(process);

    let mut root_part = eco2301::Part::new("ASSY-01");
    root_part.name = Some("Top-level assembly".to_owned());
    root_part.components.push(child);
    root_part.rohs_exemptions.push("6(c)".to_owned());

    let mut bom = eco2301::BillOfMaterials::new(vec![root_part]);
    bom.internal_id = Some("bom-1".to_owned());
    bom.transport_phase.push(eco2301::TransportStage::new(
        "Factory to port",
        identity_reference(777),
        UnittedValue::new(125.0, "km"),
    ));
    bom.use_phase = Some(eco2301::UsePhase::new(eco2301::ProductLifeSpan::new(10.0)));
    bom.notes = Some(eco2301::BomDetails {
        notes: Some("Integration fixture".to_owned()),
        picture_url: None,
        product_name: Some("Widget".to_owned()),
    });
    bom
}

#[test]
fn eco2301_roundtrip_through_text() {
    let handler = BomHandler::new();
    let bom = Bom::from(sample_eco2301());
    let text = handler.dump_bom(&bom).unwrap();
    let reloaded = handler.load_bom_from_text(&text).unwrap();
    assert_eq!(reloaded, bom);
}

#[test]
fn eco2412_roundtrip_preserves_part_transport() {
    let mut part = eco2412::Part::new("PN-2412");
    part.transport_phase.push(eco2412::TransportStage::new(
        "Supplier to line",
        identity_reference(1),
        UnittedValue::new(18.0, "km"),
    ));
    part.location = Some(eco2412::Location {
        name: Some("Plant 4".to_owned()),
        ..Default::default()
    });
    let bom = Bom::from(eco2412::BillOfMaterials::new(vec![part]));

    let handler = BomHandler::new();
    let text = handler.dump_bom(&bom).unwrap();
    assert!(text.contains("24/12/BillOfMaterialsEco"));
    assert_eq!(handler.load_bom_from_text(&text).unwrap(), bom);
}

#[test]
fn eco2505_roundtrip_preserves_equivalent_references() {
    let reference = eco2505::ExtendedRecordReference {
        reference: identity_reference(10),
        equivalent_references: vec![identity_reference(20), identity_reference(30)],
    };
    let mut part = eco2505::Part::new("PN-2505");
    part.mi_part_reference = Some(reference);
    let bom = Bom::from(eco2505::BillOfMaterials::new(vec![part]));

    let handler = BomHandler::new();
    let text = handler.dump_bom(&bom).unwrap();
    assert!(text.contains("EquivalentReferences"));
    assert_eq!(handler.load_bom_from_text(&text).unwrap(), bom);
}

#[test]
fn file_roundtrip_with_tempfile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assembly.xml");

    let handler = BomHandler::new();
    let bom = Bom::from(sample_eco2301());
    handler.dump_bom_to_file(&bom, &path).unwrap();
    let reloaded = handler.load_bom_from_file(&path).unwrap();
    assert_eq!(reloaded, bom);
}

#[test]
fn material_reference_fragment_parses_and_reserializes() {
    let text = format!(
        r#"<PartsEco xmlns="{ECO2301_NS}" xmlns:gbt="http://www.grantadesign.com/12/05/GrantaBaseTypes">
  <Components>
    <Part>
      <PartNumber>P1</PartNumber>
      <Materials>
        <Material>
          <MIMaterialReference>
            <gbt:dbKey>MI_Restricted_Substances</gbt:dbKey>
            <gbt:recordGUID>2086f56a-4f4d-4850-9891-3d6ad155d1f9</gbt:recordGUID>
          </MIMaterialReference>
        </Material>
      </Materials>
    </Part>
  </Components>
</PartsEco>"#
    );

    let handler = BomHandler::with_mode(ReadMode::Strict);
    let bom = handler.load_bom_from_text(&text).unwrap();
    let Bom::Eco2301(tree) = &bom else {
        panic!("expected a 23/01 BoM");
    };
    let reference = &tree.components[0].materials[0].mi_material_reference;
    assert_eq!(reference.database_key.as_deref(), Some("MI_Restricted_Substances"));
    assert_eq!(
        reference.record_guid.as_deref(),
        Some("2086f56a-4f4d-4850-9891-3d6ad155d1f9")
    );
    assert!(reference.identity.is_none());
    assert!(reference.record_history_guid.is_none());
    assert!(reference.lookup_value.is_none());

    let dumped = handler.dump_bom(&bom).unwrap();
    assert!(dumped.contains("<gbt:dbKey>MI_Restricted_Substances</gbt:dbKey>"));
    assert!(dumped.contains("<gbt:recordGUID>2086f56a-4f4d-4850-9891-3d6ad155d1f9</gbt:recordGUID>"));
}

#[test]
fn multiply_specified_reference_resolves_by_priority_and_roundtrips() {
    let text = format!(
        r#"<PartsEco xmlns="{ECO2301_NS}" xmlns:gbt="http://www.grantadesign.com/12/05/GrantaBaseTypes">
  <Components>
    <Part>
      <PartNumber>P1</PartNumber>
      <MIPartReference>
        <gbt:identity><gbt:recordHistoryIdentity>42</gbt:recordHistoryIdentity></gbt:identity>
        <gbt:recordGUID>0a0a0a0a-0000-0000-0000-000000000000</gbt:recordGUID>
      </MIPartReference>
    </Part>
  </Components>
</PartsEco>"#
    );

    let handler = BomHandler::with_mode(ReadMode::Strict);
    let bom = handler.load_bom_from_text(&text).unwrap();
    let Bom::Eco2301(tree) = &bom else {
        panic!("expected a 23/01 BoM");
    };
    let reference = tree.components[0].mi_part_reference.as_ref().unwrap();

    // Identity wins, but the non-chosen GUID survives and is re-emitted.
    match reference.resolve() {
        Some(ResolvedReference::Identity(identity)) => {
            assert_eq!(identity.record_history_identity, 42);
        }
        other => panic!("expected identity resolution, got {other:?}"),
    }
    let dumped = handler.dump_bom(&bom).unwrap();
    assert!(dumped.contains("recordHistoryIdentity"));
    assert!(dumped.contains("0a0a0a0a-0000-0000-0000-000000000000"));
}

#[test]
fn annotations_are_skipped_in_lenient_mode_and_rejected_in_strict() {
    let text = format!(
        r#"<PartsEco xmlns="{ECO2301_NS}">
  <Components/>
  <Annotations><Annotation targetId="x">note</Annotation></Annotations>
</PartsEco>"#
    );

    let bom = BomHandler::new().load_bom_from_text(&text).unwrap();
    let Bom::Eco2301(tree) = &bom else {
        panic!("expected a 23/01 BoM");
    };
    assert!(tree.components.is_empty());

    // Skipped content does not survive a round trip.
    let dumped = BomHandler::new().dump_bom(&bom).unwrap();
    assert!(!dumped.contains("Annotations"));

    match BomHandler::with_mode(ReadMode::Strict).load_bom_from_text(&text) {
        Err(BomError::Deserialization { path, .. }) => {
            assert_eq!(path, "PartsEco/Annotations");
        }
        other => panic!("expected deserialization error, got {other:?}"),
    }
}

#[test]
fn unknown_attribute_is_skipped_in_lenient_mode_and_rejected_in_strict() {
    let text = format!(
        r#"<PartsEco xmlns="{ECO2301_NS}">
  <Components>
    <Part mystery="annotation-target">
      <PartNumber>P1</PartNumber>
    </Part>
  </Components>
</PartsEco>"#
    );

    let bom = BomHandler::new().load_bom_from_text(&text).unwrap();
    let Bom::Eco2301(tree) = &bom else {
        panic!("expected a 23/01 BoM");
    };
    assert_eq!(tree.components[0].part_number, "P1");
    // Unrecognised attributes are dropped, never silently re-emitted.
    let dumped = BomHandler::new().dump_bom(&bom).unwrap();
    assert!(!dumped.contains("mystery"));

    match BomHandler::with_mode(ReadMode::Strict).load_bom_from_text(&text) {
        Err(BomError::Deserialization { path, .. }) => {
            assert_eq!(path, "PartsEco/Components/Part/@mystery");
        }
        other => panic!("expected deserialization error, got {other:?}"),
    }
}

#[test]
fn empty_notes_element_roundtrips_as_empty_string() {
    let text = format!(
        r#"<PartsEco xmlns="{ECO2301_NS}">
  <Components/>
  <Notes><Notes></Notes></Notes>
</PartsEco>"#
    );

    let handler = BomHandler::with_mode(ReadMode::Strict);
    let bom = handler.load_bom_from_text(&text).unwrap();
    let Bom::Eco2301(tree) = &bom else {
        panic!("expected a 23/01 BoM");
    };
    assert_eq!(tree.notes.as_ref().unwrap().notes.as_deref(), Some(""));

    let dumped = handler.dump_bom(&bom).unwrap();
    let reloaded = handler.load_bom_from_text(&dumped).unwrap();
    assert_eq!(reloaded, bom);
}

#[test]
fn unsupported_schema_version_is_rejected() {
    let text = r#"<PartsEco xmlns="http://www.grantadesign.com/17/11/BillOfMaterialsEco"><Components/></PartsEco>"#;
    match BomHandler::new().load_bom_from_text(text) {
        Err(BomError::UnsupportedSchema { namespace, element }) => {
            assert_eq!(element, "PartsEco");
            assert!(namespace.contains("17/11"));
        }
        other => panic!("expected unsupported schema error, got {other:?}"),
    }
}

#[test]
fn doctype_documents_are_rejected_outright() {
    let attack = r#"<?xml version="1.0"?>
<!DOCTYPE lolz [
  <!ENTITY lol "lol">
  <!ENTITY lol2 "&lol;&lol;&lol;&lol;&lol;&lol;&lol;&lol;&lol;&lol;">
]>
<PartsEco xmlns="http://www.grantadesign.com/23/01/BillOfMaterialsEco"><Components/></PartsEco>"#;
    assert!(matches!(
        BomHandler::new().load_bom_from_text(attack),
        Err(BomError::MalformedXml(_))
    ));
}

#[test]
fn malformed_xml_is_rejected() {
    for text in ["", "not xml at all", "<PartsEco><Components></PartsEco>"] {
        assert!(matches!(
            BomHandler::new().load_bom_from_text(text),
            Err(BomError::MalformedXml(_))
        ));
    }
}

#[test]
fn material_quantity_choice_violation_in_document() {
    let text = format!(
        r#"<PartsEco xmlns="{ECO2301_NS}">
  <Components>
    <Part>
      <PartNumber>P1</PartNumber>
      <Materials>
        <Material>
          <MIMaterialReference/>
          <Percentage>40</Percentage>
          <Mass Unit="kg">2.5</Mass>
        </Material>
      </Materials>
    </Part>
  </Components>
</PartsEco>"#
    );
    // The violation is structural and reported even in lenient mode.
    match BomHandler::new().load_bom_from_text(&text) {
        Err(BomError::ChoiceGroupViolation { path, .. }) => {
            assert_eq!(path, "PartsEco/Components/Part/Materials/Material");
        }
        other => panic!("expected choice group violation, got {other:?}"),
    }
}

#[test]
fn process_without_amount_is_a_choice_violation() {
    let text = format!(
        r#"<PartsEco xmlns="{ECO2301_NS}">
  <Components>
    <Part>
      <PartNumber>P1</PartNumber>
      <Processes>
        <Process>
          <MIProcessReference/>
          <DimensionType>Mass</DimensionType>
        </Process>
      </Processes>
    </Part>
  </Components>
</PartsEco>"#
    );
    assert!(matches!(
        BomHandler::new().load_bom_from_text(&text),
        Err(BomError::ChoiceGroupViolation { .. })
    ));
}

#[test]
fn unqualified_fragment_is_accepted() {
    // Hand-written documents frequently omit namespace prefixes on children;
    // the reader accepts unqualified elements under a qualified root.
    let text = format!(
        r#"<PartsEco xmlns="{ECO2301_NS}">
  <Components>
    <Part><PartNumber xmlns="">P9</PartNumber></Part>
  </Components>
</PartsEco>"#
    );
    let bom = BomHandler::new().load_bom_from_text(&text).unwrap();
    let Bom::Eco2301(tree) = &bom else {
        panic!("expected a 23/01 BoM");
    };
    assert_eq!(tree.components[0].part_number, "P9");
}

#[test]
fn dump_never_emits_unrepresentable_elements() {
    let handler = BomHandler::new();
    for bom in [
        Bom::from(eco2301::BillOfMaterials::new(vec![eco2301::Part::new("A")])),
        Bom::from(eco2412::BillOfMaterials::new(vec![eco2412::Part::new("B")])),
        Bom::from(eco2505::BillOfMaterials::new(vec![eco2505::Part::new("C")])),
    ] {
        let text = handler.dump_bom(&bom).unwrap();
        assert!(!text.contains("NonMIPartReference"));
        assert!(!text.contains("Annotations"));
        assert!(!text.contains("AnnotationSources"));
        assert_eq!(handler.load_bom_from_text(&text).unwrap().version(), bom.version());
    }
}

//! Codec for the GrantaBaseTypes (`gbt`) reference elements.
//!
//! Record and attribute references live in the version-independent
//! `12/05/GrantaBaseTypes` namespace, embedded inside version-specific Eco
//! elements such as `MIMaterialReference`. The hosting element itself
//! belongs to the Eco namespace; everything below it is `gbt`.
//!
//! Multiply-specified references are read and written verbatim. Resolution
//! priority is a consumer concern ([`RecordReference::resolve`]), not a
//! codec concern.

use crate::error::Result;
use crate::reference::{
    AttributeReference, PartialTableReference, PseudoAttribute, RecordIdentity, RecordLookup,
    RecordReference, GRANTA_BASE_TYPES_NAMESPACE,
};
use crate::xml::dom::XmlElement;
use crate::xml::ReadContext;

const NS: &str = GRANTA_BASE_TYPES_NAMESPACE;

/// Read a record reference from a hosting element such as
/// `MIMaterialReference`. The caller's path already includes the host.
pub(crate) fn read_record_reference(
    ctx: &mut ReadContext,
    element: &XmlElement,
) -> Result<RecordReference> {
    read_record_reference_filtered(ctx, element, |_, _| Ok(false))
}

/// As [`read_record_reference`], but `extra` is offered each child first and
/// may consume children the base schema does not define. Newer Eco schemas
/// extend the hosting element with siblings in their own namespace.
pub(crate) fn read_record_reference_filtered<F>(
    ctx: &mut ReadContext,
    element: &XmlElement,
    mut extra: F,
) -> Result<RecordReference>
where
    F: FnMut(&mut ReadContext, &XmlElement) -> Result<bool>,
{
    ctx.unknown_attributes(element, &["recordUID"])?;
    let mut reference = RecordReference {
        record_uid: element.attribute("recordUID").map(str::to_owned),
        ..Default::default()
    };

    for child in &element.children {
        if extra(ctx, child)? {
            continue;
        }
        if child.is(NS, "dbKey") {
            reference.database_key = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "identity") {
            ctx.push("identity");
            reference.identity = Some(read_identity(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "recordGUID") {
            reference.record_guid = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "recordHistoryGUID") {
            reference.record_history_guid = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "lookupValue") {
            ctx.push("lookupValue");
            reference.lookup_value = Some(read_lookup(ctx, child)?);
            ctx.pop();
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(reference)
}

fn read_identity(ctx: &mut ReadContext, element: &XmlElement) -> Result<RecordIdentity> {
    ctx.unknown_attributes(element, &[])?;
    let mut record_history_identity = None;
    let mut version = None;
    for child in &element.children {
        if child.is(NS, "recordHistoryIdentity") {
            record_history_identity = Some(ctx.leaf_i64(child)?);
        } else if child.is(NS, "version") {
            version = Some(ctx.leaf_u32(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    let record_history_identity =
        record_history_identity.ok_or_else(|| ctx.missing("recordHistoryIdentity"))?;
    Ok(RecordIdentity {
        record_history_identity,
        version,
    })
}

fn read_lookup(ctx: &mut ReadContext, element: &XmlElement) -> Result<RecordLookup> {
    ctx.unknown_attributes(element, &[])?;
    let mut attribute_reference = None;
    let mut attribute_value = None;
    for child in &element.children {
        if child.is(NS, "attributeReference") {
            ctx.push("attributeReference");
            attribute_reference = Some(read_attribute_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "attributeValue") {
            attribute_value = Some(ctx.leaf_text(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(RecordLookup {
        attribute_reference: attribute_reference
            .ok_or_else(|| ctx.missing("attributeReference"))?,
        attribute_value: attribute_value.ok_or_else(|| ctx.missing("attributeValue"))?,
    })
}

pub(crate) fn read_attribute_reference(
    ctx: &mut ReadContext,
    element: &XmlElement,
) -> Result<AttributeReference> {
    ctx.unknown_attributes(element, &[])?;
    let mut reference = AttributeReference::default();
    for child in &element.children {
        if child.is(NS, "dbKey") {
            reference.database_key = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "attributeIdentity") {
            reference.attribute_identity = Some(ctx.leaf_i64(child)?);
        } else if child.is(NS, "name") {
            ctx.push("name");
            read_attribute_name(ctx, child, &mut reference)?;
            ctx.pop();
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(reference)
}

/// The `name` wrapper groups the name-based fields and carries the
/// `isStandard` attribute.
fn read_attribute_name(
    ctx: &mut ReadContext,
    element: &XmlElement,
    reference: &mut AttributeReference,
) -> Result<()> {
    ctx.unknown_attributes(element, &["isStandard"])?;
    if let Some(value) = element.attribute("isStandard") {
        let holder = XmlElement::with_text(NS, "isStandard", value);
        reference.is_standard = Some(ctx.parse_bool(&holder)?);
    }
    for child in &element.children {
        if child.is(NS, "table") {
            ctx.push("table");
            reference.table_reference = Some(read_table_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "attributeName") {
            reference.attribute_name = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "pseudo") {
            reference.pseudo = Some(read_pseudo(ctx, child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(())
}

fn read_pseudo(ctx: &mut ReadContext, element: &XmlElement) -> Result<PseudoAttribute> {
    ctx.unknown_leaf_attributes(element, &[])?;
    PseudoAttribute::from_str(element.text()).ok_or_else(|| {
        crate::error::BomError::deserialization(
            format!("{}/pseudo", ctx.path()),
            format!("unknown pseudo-attribute '{}'", element.text()),
        )
    })
}

fn read_table_reference(
    ctx: &mut ReadContext,
    element: &XmlElement,
) -> Result<PartialTableReference> {
    ctx.unknown_attributes(element, &[])?;
    let mut table = PartialTableReference::default();
    for child in &element.children {
        if child.is(NS, "tableIdentity") {
            table.table_identity = Some(ctx.leaf_i64(child)?);
        } else if child.is(NS, "tableGUID") {
            table.table_guid = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "tableName") {
            table.table_name = Some(ctx.leaf_text(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(table)
}

/// Build a hosting element (in `namespace`, named `name`) containing the
/// record reference's `gbt` children.
pub(crate) fn write_record_reference(
    reference: &RecordReference,
    namespace: &str,
    name: &str,
) -> XmlElement {
    let mut element = XmlElement::new(namespace, name);
    if let Some(uid) = &reference.record_uid {
        element.attributes.push(("recordUID".to_owned(), uid.clone()));
    }
    if let Some(key) = &reference.database_key {
        element.push_child(XmlElement::with_text(NS, "dbKey", key));
    }
    if let Some(identity) = &reference.identity {
        let mut wrapper = XmlElement::new(NS, "identity").with_child(XmlElement::with_text(
            NS,
            "recordHistoryIdentity",
            identity.record_history_identity.to_string(),
        ));
        if let Some(version) = identity.version {
            wrapper.push_child(XmlElement::with_text(NS, "version", version.to_string()));
        }
        element.push_child(wrapper);
    }
    if let Some(guid) = &reference.record_guid {
        element.push_child(XmlElement::with_text(NS, "recordGUID", guid));
    }
    if let Some(guid) = &reference.record_history_guid {
        element.push_child(XmlElement::with_text(NS, "recordHistoryGUID", guid));
    }
    if let Some(lookup) = &reference.lookup_value {
        element.push_child(
            XmlElement::new(NS, "lookupValue")
                .with_child(write_attribute_reference(
                    &lookup.attribute_reference,
                    "attributeReference",
                ))
                .with_child(XmlElement::with_text(
                    NS,
                    "attributeValue",
                    &lookup.attribute_value,
                )),
        );
    }
    element
}

pub(crate) fn write_attribute_reference(
    reference: &AttributeReference,
    name: &str,
) -> XmlElement {
    let mut element = XmlElement::new(NS, name);
    if let Some(key) = &reference.database_key {
        element.push_child(XmlElement::with_text(NS, "dbKey", key));
    }
    if let Some(identity) = reference.attribute_identity {
        element.push_child(XmlElement::with_text(
            NS,
            "attributeIdentity",
            identity.to_string(),
        ));
    }
    let mut name_wrapper = XmlElement::new(NS, "name");
    if let Some(is_standard) = reference.is_standard {
        name_wrapper
            .attributes
            .push(("isStandard".to_owned(), is_standard.to_string()));
    }
    if let Some(table) = &reference.table_reference {
        let mut table_element = XmlElement::new(NS, "table");
        if let Some(identity) = table.table_identity {
            table_element.push_child(XmlElement::with_text(
                NS,
                "tableIdentity",
                identity.to_string(),
            ));
        }
        if let Some(guid) = &table.table_guid {
            table_element.push_child(XmlElement::with_text(NS, "tableGUID", guid));
        }
        if let Some(table_name) = &table.table_name {
            table_element.push_child(XmlElement::with_text(NS, "tableName", table_name));
        }
        name_wrapper.push_child(table_element);
    }
    if let Some(attribute_name) = &reference.attribute_name {
        name_wrapper.push_child(XmlElement::with_text(NS, "attributeName", attribute_name));
    }
    if let Some(pseudo) = reference.pseudo {
        name_wrapper.push_child(XmlElement::with_text(NS, "pseudo", pseudo.as_str()));
    }
    if !name_wrapper.children.is_empty() || !name_wrapper.attributes.is_empty() {
        element.push_child(name_wrapper);
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BomError;
    use crate::xml::ReadMode;

    fn ctx(mode: ReadMode) -> ReadContext {
        let mut ctx = ReadContext::new(mode);
        ctx.push("MIMaterialReference");
        ctx
    }

    fn roundtrip(reference: &RecordReference) -> RecordReference {
        let element = write_record_reference(reference, "urn:eco", "MIMaterialReference");
        read_record_reference(&mut ctx(ReadMode::Strict), &element).unwrap()
    }

    #[test]
    fn test_identity_reference_roundtrip() {
        let reference = RecordReference {
            database_key: Some("MI_Restricted_Substances".to_owned()),
            identity: Some(RecordIdentity {
                record_history_identity: 123456,
                version: Some(2),
            }),
            record_uid: Some("item-1".to_owned()),
            ..Default::default()
        };
        assert_eq!(roundtrip(&reference), reference);
    }

    #[test]
    fn test_multiply_specified_reference_roundtrips_losslessly() {
        let reference = RecordReference {
            identity: Some(RecordIdentity {
                record_history_identity: 1,
                version: None,
            }),
            record_guid: Some("ebff3764-a9db-4ae0-9ee8-a0e8f6f2a362".to_owned()),
            record_history_guid: Some("41b5d6b4".to_owned()),
            ..Default::default()
        };
        assert_eq!(roundtrip(&reference), reference);
    }

    #[test]
    fn test_lookup_reference_roundtrip() {
        let reference = RecordReference {
            database_key: Some("MI_Restricted_Substances".to_owned()),
            lookup_value: Some(RecordLookup {
                attribute_reference: AttributeReference {
                    database_key: Some("MI_Restricted_Substances".to_owned()),
                    attribute_name: Some("CAS number".to_owned()),
                    table_reference: Some(PartialTableReference {
                        table_name: Some("Substances".to_owned()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                attribute_value: "7440-23-5".to_owned(),
            }),
            ..Default::default()
        };
        assert_eq!(roundtrip(&reference), reference);
    }

    #[test]
    fn test_standard_name_is_an_attribute_of_name() {
        let reference = AttributeReference {
            attribute_name: Some("Density".to_owned()),
            is_standard: Some(true),
            ..Default::default()
        };
        let element = write_attribute_reference(&reference, "attributeReference");
        let name = &element.children[0];
        assert_eq!(name.name, "name");
        assert_eq!(name.attribute("isStandard"), Some("true"));

        let reparsed =
            read_attribute_reference(&mut ctx(ReadMode::Strict), &element).unwrap();
        assert_eq!(reparsed, reference);
    }

    #[test]
    fn test_pseudo_attribute_roundtrip() {
        let reference = AttributeReference {
            database_key: Some("MI_Restricted_Substances".to_owned()),
            pseudo: Some(PseudoAttribute::RecordGuid),
            ..Default::default()
        };
        let element = write_attribute_reference(&reference, "attributeReference");
        let reparsed =
            read_attribute_reference(&mut ctx(ReadMode::Strict), &element).unwrap();
        assert_eq!(reparsed.pseudo, Some(PseudoAttribute::RecordGuid));
    }

    #[test]
    fn test_unknown_child_is_strict_error_with_path() {
        let element = write_record_reference(&RecordReference::default(), "urn:eco", "Ref")
            .with_child(XmlElement::new(NS, "futureField"));
        match read_record_reference(&mut ctx(ReadMode::Strict), &element) {
            Err(BomError::Deserialization { path, .. }) => {
                assert_eq!(path, "MIMaterialReference/futureField");
            }
            other => panic!("expected deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_child_is_skipped_in_lenient_mode() {
        let element = write_record_reference(&RecordReference::default(), "urn:eco", "Ref")
            .with_child(XmlElement::new(NS, "futureField"));
        let reference = read_record_reference(&mut ctx(ReadMode::Lenient), &element).unwrap();
        assert_eq!(reference, RecordReference::default());
    }

    #[test]
    fn test_unknown_attribute_on_reference_host() {
        let element = write_record_reference(&RecordReference::default(), "urn:eco", "Ref")
            .with_attribute("mystery", "x");
        match read_record_reference(&mut ctx(ReadMode::Strict), &element) {
            Err(BomError::Deserialization { path, .. }) => {
                assert_eq!(path, "MIMaterialReference/@mystery");
            }
            other => panic!("expected deserialization error, got {other:?}"),
        }
        let reference = read_record_reference(&mut ctx(ReadMode::Lenient), &element).unwrap();
        assert_eq!(reference, RecordReference::default());
    }

    #[test]
    fn test_identity_requires_record_history_identity() {
        let element = XmlElement::new("urn:eco", "Ref")
            .with_child(XmlElement::new(NS, "identity").with_child(XmlElement::with_text(
                NS,
                "version",
                "2",
            )));
        assert!(matches!(
            read_record_reference(&mut ctx(ReadMode::Lenient), &element),
            Err(BomError::Deserialization { .. })
        ));
    }
}

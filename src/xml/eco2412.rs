//! Codec for the 24/12 Eco BoM schema.
//!
//! Identical wire layout to 23/01, except that `Part` and `Process` accept
//! `TransportPhase` and `Location` children of their own.

use crate::error::{BomError, Result};
use crate::model::common::{
    Category, DimensionType, MaterialQuantity, ProcessAmount, RecycleContent, UnittedValue,
};
use crate::model::eco2412::*;
use crate::xml::dom::XmlElement;
use crate::xml::{format_f64, gbt, ReadContext, ROOT_ELEMENT};

const NS: &str = "http://www.grantadesign.com/24/12/BillOfMaterialsEco";

// Reading

pub(crate) fn read_bill_of_materials(
    ctx: &mut ReadContext,
    root: &XmlElement,
) -> Result<BillOfMaterials> {
    ctx.unknown_attributes(root, &["id"])?;
    let mut bom = BillOfMaterials {
        internal_id: root.attribute("id").map(str::to_owned),
        ..Default::default()
    };
    for child in &root.children {
        if child.is(NS, "Components") {
            ctx.push("Components");
            bom.components = read_list(ctx, child, "Part", read_part)?;
            ctx.pop();
        } else if child.is(NS, "TransportPhase") {
            ctx.push("TransportPhase");
            bom.transport_phase = read_list(ctx, child, "TransportStage", read_transport_stage)?;
            ctx.pop();
        } else if child.is(NS, "UsePhase") {
            ctx.push("UsePhase");
            bom.use_phase = Some(read_use_phase(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Location") {
            ctx.push("Location");
            bom.location = Some(read_location(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Notes") {
            ctx.push("Notes");
            bom.notes = Some(read_bom_details(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Annotations") || child.is(NS, "AnnotationSources") {
            ctx.unrepresentable(child, "unsupported element")?;
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(bom)
}

fn read_list<T>(
    ctx: &mut ReadContext,
    element: &XmlElement,
    item_name: &str,
    mut read_item: impl FnMut(&mut ReadContext, &XmlElement) -> Result<T>,
) -> Result<Vec<T>> {
    ctx.unknown_attributes(element, &[])?;
    let mut items = Vec::new();
    for child in &element.children {
        if child.is(NS, item_name) {
            ctx.push(item_name);
            items.push(read_item(ctx, child)?);
            ctx.pop();
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(items)
}

fn read_part(ctx: &mut ReadContext, element: &XmlElement) -> Result<Part> {
    ctx.unknown_attributes(element, &["id"])?;
    let mut part = Part {
        internal_id: element.attribute("id").map(str::to_owned),
        ..Default::default()
    };
    let mut part_number = None;
    for child in &element.children {
        if child.is(NS, "Quantity") {
            part.quantity = Some(read_unitted_value(ctx, child)?);
        } else if child.is(NS, "MassPerUom") {
            part.mass_per_uom = Some(read_unitted_value(ctx, child)?);
        } else if child.is(NS, "VolumePerUom") {
            part.volume_per_uom = Some(read_unitted_value(ctx, child)?);
        } else if child.is(NS, "MIPartReference") {
            ctx.push("MIPartReference");
            part.mi_part_reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "PartNumber") {
            part_number = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "Name") {
            part.name = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "ExternalIdentity") {
            part.external_identity = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "Components") {
            ctx.push("Components");
            part.components = read_list(ctx, child, "Part", read_part)?;
            ctx.pop();
        } else if child.is(NS, "Specifications") {
            ctx.push("Specifications");
            part.specifications = read_list(ctx, child, "Specification", read_specification)?;
            ctx.pop();
        } else if child.is(NS, "Materials") {
            ctx.push("Materials");
            part.materials = read_list(ctx, child, "Material", read_material)?;
            ctx.pop();
        } else if child.is(NS, "Substances") {
            ctx.push("Substances");
            part.substances = read_list(ctx, child, "Substance", read_substance)?;
            ctx.pop();
        } else if child.is(NS, "Processes") {
            ctx.push("Processes");
            part.processes = read_list(ctx, child, "Process", read_process)?;
            ctx.pop();
        } else if child.is(NS, "RohsExemptions") {
            ctx.push("RohsExemptions");
            part.rohs_exemptions =
                read_list(ctx, child, "RohsExemption", |ctx, e| {
                    ctx.unknown_attributes(e, &[])?;
                    Ok(e.text().to_owned())
                })?;
            ctx.pop();
        } else if child.is(NS, "EndOfLifeFates") {
            ctx.push("EndOfLifeFates");
            part.end_of_life_fates = read_list(ctx, child, "EndOfLifeFate", read_end_of_life_fate)?;
            ctx.pop();
        } else if child.is(NS, "TransportPhase") {
            ctx.push("TransportPhase");
            part.transport_phase = read_list(ctx, child, "TransportStage", read_transport_stage)?;
            ctx.pop();
        } else if child.is(NS, "Location") {
            ctx.push("Location");
            part.location = Some(read_location(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "NonMIPartReference") {
            ctx.unrepresentable(child, "unsupported element")?;
        } else {
            ctx.unknown(child)?;
        }
    }
    part.part_number = part_number.ok_or_else(|| ctx.missing("PartNumber"))?;
    Ok(part)
}

fn read_material(ctx: &mut ReadContext, element: &XmlElement) -> Result<Material> {
    ctx.unknown_attributes(element, &["id"])?;
    let mut reference = None;
    let mut percentage = None;
    let mut mass = None;
    let mut material = Material {
        internal_id: element.attribute("id").map(str::to_owned),
        ..Material::new(Default::default())
    };
    for child in &element.children {
        if child.is(NS, "MIMaterialReference") {
            ctx.push("MIMaterialReference");
            reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Percentage") {
            percentage = Some(ctx.leaf_f64(child)?);
        } else if child.is(NS, "Mass") {
            mass = Some(read_unitted_value(ctx, child)?);
        } else if child.is(NS, "RecycleContent") {
            ctx.push("RecycleContent");
            material.recycle_content = Some(read_recycle_content(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Processes") {
            ctx.push("Processes");
            material.processes = read_list(ctx, child, "Process", read_process)?;
            ctx.pop();
        } else if child.is(NS, "EndOfLifeFates") {
            ctx.push("EndOfLifeFates");
            material.end_of_life_fates =
                read_list(ctx, child, "EndOfLifeFate", read_end_of_life_fate)?;
            ctx.pop();
        } else if child.is(NS, "Identity") {
            material.identity = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "Name") {
            material.name = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "ExternalIdentity") {
            material.external_identity = Some(ctx.leaf_text(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    material.mi_material_reference =
        reference.ok_or_else(|| ctx.missing("MIMaterialReference"))?;
    material.quantity = match (percentage, mass) {
        (Some(_), Some(_)) => {
            return Err(ctx.choice_violation("both Percentage and Mass are specified"))
        }
        (Some(percentage), None) => Some(MaterialQuantity::Percentage(percentage)),
        (None, Some(mass)) => Some(MaterialQuantity::Mass(mass)),
        (None, None) => None,
    };
    Ok(material)
}

fn read_recycle_content(ctx: &mut ReadContext, element: &XmlElement) -> Result<RecycleContent> {
    ctx.unknown_attributes(element, &[])?;
    let mut typical = None;
    let mut percentage = None;
    for child in &element.children {
        if child.is(NS, "Typical") {
            typical = Some(ctx.leaf_bool(child)?);
        } else if child.is(NS, "Percentage") {
            percentage = Some(ctx.leaf_f64(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    match (typical, percentage) {
        (Some(_), Some(_)) => Err(ctx.choice_violation("both Typical and Percentage are specified")),
        (Some(typical), None) => Ok(RecycleContent::Typical(typical)),
        (None, Some(percentage)) => Ok(RecycleContent::Percentage(percentage)),
        (None, None) => Err(ctx.choice_violation("either Typical or Percentage is required")),
    }
}

fn read_substance(ctx: &mut ReadContext, element: &XmlElement) -> Result<Substance> {
    ctx.unknown_attributes(element, &["id"])?;
    let mut reference = None;
    let mut substance = Substance {
        internal_id: element.attribute("id").map(str::to_owned),
        ..Substance::new(Default::default())
    };
    for child in &element.children {
        if child.is(NS, "MISubstanceReference") {
            ctx.push("MISubstanceReference");
            reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Percentage") {
            substance.percentage = Some(ctx.leaf_f64(child)?);
        } else if child.is(NS, "Category") {
            substance.category = Some(read_category(ctx, child)?);
        } else if child.is(NS, "Identity") {
            substance.identity = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "Name") {
            substance.name = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "ExternalIdentity") {
            substance.external_identity = Some(ctx.leaf_text(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    substance.mi_substance_reference =
        reference.ok_or_else(|| ctx.missing("MISubstanceReference"))?;
    Ok(substance)
}

fn read_specification(ctx: &mut ReadContext, element: &XmlElement) -> Result<Specification> {
    ctx.unknown_attributes(element, &["id"])?;
    let mut reference = None;
    let mut specification = Specification {
        internal_id: element.attribute("id").map(str::to_owned),
        ..Specification::new(Default::default())
    };
    for child in &element.children {
        if child.is(NS, "MISpecificationReference") {
            ctx.push("MISpecificationReference");
            reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Quantity") {
            specification.quantity = Some(read_unitted_value(ctx, child)?);
        } else if child.is(NS, "Identity") {
            specification.identity = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "Name") {
            specification.name = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "ExternalIdentity") {
            specification.external_identity = Some(ctx.leaf_text(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    specification.mi_specification_reference =
        reference.ok_or_else(|| ctx.missing("MISpecificationReference"))?;
    Ok(specification)
}

fn read_process(ctx: &mut ReadContext, element: &XmlElement) -> Result<Process> {
    ctx.unknown_attributes(element, &["id"])?;
    let mut reference = None;
    let mut dimension_type = None;
    let mut percentage = None;
    let mut quantity = None;
    let mut transport_phase = Vec::new();
    let mut location = None;
    let mut identity = None;
    let mut name = None;
    let mut external_identity = None;
    for child in &element.children {
        if child.is(NS, "MIProcessReference") {
            ctx.push("MIProcessReference");
            reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "DimensionType") {
            dimension_type = Some(read_dimension_type(ctx, child)?);
        } else if child.is(NS, "Percentage") {
            percentage = Some(ctx.leaf_f64(child)?);
        } else if child.is(NS, "Quantity") {
            quantity = Some(read_unitted_value(ctx, child)?);
        } else if child.is(NS, "TransportPhase") {
            ctx.push("TransportPhase");
            transport_phase = read_list(ctx, child, "TransportStage", read_transport_stage)?;
            ctx.pop();
        } else if child.is(NS, "Location") {
            ctx.push("Location");
            location = Some(read_location(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Identity") {
            identity = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "Name") {
            name = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "ExternalIdentity") {
            external_identity = Some(ctx.leaf_text(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    let amount = match (percentage, quantity) {
        (Some(_), Some(_)) => {
            return Err(ctx.choice_violation("both Percentage and Quantity are specified"))
        }
        (Some(percentage), None) => ProcessAmount::Percentage(percentage),
        (None, Some(quantity)) => ProcessAmount::Quantity(quantity),
        (None, None) => {
            return Err(ctx.choice_violation("either Percentage or Quantity is required"))
        }
    };
    Ok(Process {
        mi_process_reference: reference.ok_or_else(|| ctx.missing("MIProcessReference"))?,
        dimension_type: dimension_type.ok_or_else(|| ctx.missing("DimensionType"))?,
        amount,
        identity,
        name,
        external_identity,
        transport_phase,
        location,
        internal_id: element.attribute("id").map(str::to_owned),
    })
}

fn read_transport_stage(ctx: &mut ReadContext, element: &XmlElement) -> Result<TransportStage> {
    ctx.unknown_attributes(element, &["id"])?;
    let mut name = None;
    let mut reference = None;
    let mut distance = None;
    for child in &element.children {
        if child.is(NS, "Name") {
            name = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "MITransportReference") {
            ctx.push("MITransportReference");
            reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Distance") {
            distance = Some(read_unitted_value(ctx, child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(TransportStage {
        name: name.ok_or_else(|| ctx.missing("Name"))?,
        mi_transport_reference: reference.ok_or_else(|| ctx.missing("MITransportReference"))?,
        distance: distance.ok_or_else(|| ctx.missing("Distance"))?,
        internal_id: element.attribute("id").map(str::to_owned),
    })
}

fn read_location(ctx: &mut ReadContext, element: &XmlElement) -> Result<Location> {
    ctx.unknown_attributes(element, &["id"])?;
    let mut location = Location {
        internal_id: element.attribute("id").map(str::to_owned),
        ..Default::default()
    };
    for child in &element.children {
        if child.is(NS, "MILocationReference") {
            ctx.push("MILocationReference");
            location.mi_location_reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Identity") {
            location.identity = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "Name") {
            location.name = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "ExternalIdentity") {
            location.external_identity = Some(ctx.leaf_text(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(location)
}

fn read_end_of_life_fate(ctx: &mut ReadContext, element: &XmlElement) -> Result<EndOfLifeFate> {
    ctx.unknown_attributes(element, &[])?;
    let mut reference = None;
    let mut fraction = None;
    for child in &element.children {
        if child.is(NS, "MIEndOfLifeReference") {
            ctx.push("MIEndOfLifeReference");
            reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "Fraction") {
            fraction = Some(ctx.leaf_f64(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(EndOfLifeFate {
        mi_end_of_life_reference: reference.ok_or_else(|| ctx.missing("MIEndOfLifeReference"))?,
        fraction: fraction.ok_or_else(|| ctx.missing("Fraction"))?,
    })
}

fn read_use_phase(ctx: &mut ReadContext, element: &XmlElement) -> Result<UsePhase> {
    ctx.unknown_attributes(element, &[])?;
    let mut product_life_span = None;
    let mut electricity_mix = None;
    let mut static_mode = None;
    let mut mobile_mode = None;
    for child in &element.children {
        if child.is(NS, "ProductLifeSpan") {
            ctx.push("ProductLifeSpan");
            product_life_span = Some(read_product_life_span(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "ElectricityMix") {
            ctx.push("ElectricityMix");
            electricity_mix = Some(read_electricity_mix(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "StaticMode") {
            ctx.push("StaticMode");
            static_mode = Some(read_static_mode(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "MobileMode") {
            ctx.push("MobileMode");
            mobile_mode = Some(read_mobile_mode(ctx, child)?);
            ctx.pop();
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(UsePhase {
        product_life_span: product_life_span.ok_or_else(|| ctx.missing("ProductLifeSpan"))?,
        electricity_mix,
        static_mode,
        mobile_mode,
    })
}

fn read_product_life_span(ctx: &mut ReadContext, element: &XmlElement) -> Result<ProductLifeSpan> {
    ctx.unknown_attributes(element, &[])?;
    let mut duration_years = None;
    let mut span = ProductLifeSpan::new(0.0);
    for child in &element.children {
        if child.is(NS, "DurationYears") {
            duration_years = Some(ctx.leaf_f64(child)?);
        } else if child.is(NS, "NumberOfFunctionalUnits") {
            span.number_of_functional_units = Some(ctx.leaf_f64(child)?);
        } else if child.is(NS, "FunctionalUnitDescription") {
            span.functional_unit_description = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "Utility") {
            ctx.push("Utility");
            span.utility = Some(read_utility(ctx, child)?);
            ctx.pop();
        } else {
            ctx.unknown(child)?;
        }
    }
    span.duration_years = duration_years.ok_or_else(|| ctx.missing("DurationYears"))?;
    Ok(span)
}

fn read_utility(ctx: &mut ReadContext, element: &XmlElement) -> Result<UtilitySpecification> {
    ctx.unknown_attributes(element, &[])?;
    let mut utility = UtilitySpecification::default();
    for child in &element.children {
        if child.is(NS, "IndustryAverageDurationYears") {
            utility.industry_average_duration_years = Some(ctx.leaf_f64(child)?);
        } else if child.is(NS, "IndustryAverageNumberOfFunctionalUnits") {
            utility.industry_average_number_of_functional_units = Some(ctx.leaf_f64(child)?);
        } else if child.is(NS, "Utility") {
            utility.utility = Some(ctx.leaf_f64(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(utility)
}

fn read_electricity_mix(ctx: &mut ReadContext, element: &XmlElement) -> Result<ElectricityMix> {
    ctx.unknown_attributes(element, &[])?;
    let mut mix = ElectricityMix::default();
    for child in &element.children {
        if child.is(NS, "MIRegionReference") {
            ctx.push("MIRegionReference");
            mix.mi_region_reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "PercentageFossilFuels") {
            mix.percentage_fossil_fuels = Some(ctx.leaf_f64(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(mix)
}

fn read_static_mode(ctx: &mut ReadContext, element: &XmlElement) -> Result<StaticMode> {
    ctx.unknown_attributes(element, &[])?;
    let mut reference = None;
    let mut power_rating = None;
    let mut days_used_per_year = None;
    let mut hours_used_per_day = None;
    for child in &element.children {
        if child.is(NS, "MIEnergyConversionReference") {
            ctx.push("MIEnergyConversionReference");
            reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "PowerRating") {
            power_rating = Some(read_unitted_value(ctx, child)?);
        } else if child.is(NS, "Usage") {
            ctx.push("Usage");
            ctx.unknown_attributes(child, &[])?;
            for usage in &child.children {
                if usage.is(NS, "DaysUsedPerYear") {
                    days_used_per_year = Some(ctx.leaf_f64(usage)?);
                } else if usage.is(NS, "HoursUsedPerDay") {
                    hours_used_per_day = Some(ctx.leaf_f64(usage)?);
                } else {
                    ctx.unknown(usage)?;
                }
            }
            ctx.pop();
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(StaticMode {
        mi_energy_conversion_reference: reference
            .ok_or_else(|| ctx.missing("MIEnergyConversionReference"))?,
        power_rating: power_rating.ok_or_else(|| ctx.missing("PowerRating"))?,
        days_used_per_year: days_used_per_year.ok_or_else(|| ctx.missing("DaysUsedPerYear"))?,
        hours_used_per_day: hours_used_per_day.ok_or_else(|| ctx.missing("HoursUsedPerDay"))?,
    })
}

fn read_mobile_mode(ctx: &mut ReadContext, element: &XmlElement) -> Result<MobileMode> {
    ctx.unknown_attributes(element, &[])?;
    let mut reference = None;
    let mut days_used_per_year = None;
    let mut distance_travelled_per_day = None;
    for child in &element.children {
        if child.is(NS, "MITransportReference") {
            ctx.push("MITransportReference");
            reference = Some(gbt::read_record_reference(ctx, child)?);
            ctx.pop();
        } else if child.is(NS, "DaysUsedPerYear") {
            days_used_per_year = Some(ctx.leaf_f64(child)?);
        } else if child.is(NS, "DistanceTravelledPerDay") {
            distance_travelled_per_day = Some(read_unitted_value(ctx, child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(MobileMode {
        mi_transport_reference: reference.ok_or_else(|| ctx.missing("MITransportReference"))?,
        days_used_per_year: days_used_per_year.ok_or_else(|| ctx.missing("DaysUsedPerYear"))?,
        distance_travelled_per_day: distance_travelled_per_day
            .ok_or_else(|| ctx.missing("DistanceTravelledPerDay"))?,
    })
}

fn read_bom_details(ctx: &mut ReadContext, element: &XmlElement) -> Result<BomDetails> {
    ctx.unknown_attributes(element, &[])?;
    let mut details = BomDetails::default();
    for child in &element.children {
        if child.is(NS, "Notes") {
            // An empty Notes element is meaningful and preserved as "".
            details.notes = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "PictureUrl") {
            details.picture_url = Some(ctx.leaf_text(child)?);
        } else if child.is(NS, "ProductName") {
            details.product_name = Some(ctx.leaf_text(child)?);
        } else {
            ctx.unknown(child)?;
        }
    }
    Ok(details)
}

fn read_unitted_value(ctx: &mut ReadContext, element: &XmlElement) -> Result<UnittedValue> {
    ctx.unknown_leaf_attributes(element, &["Unit"])?;
    Ok(UnittedValue {
        value: ctx.parse_f64(element)?,
        unit: element.attribute("Unit").map(str::to_owned),
    })
}

fn read_dimension_type(ctx: &mut ReadContext, element: &XmlElement) -> Result<DimensionType> {
    ctx.unknown_leaf_attributes(element, &[])?;
    DimensionType::from_str(element.text()).ok_or_else(|| {
        BomError::deserialization(
            format!("{}/DimensionType", ctx.path()),
            format!("unknown dimension type '{}'", element.text()),
        )
    })
}

fn read_category(ctx: &mut ReadContext, element: &XmlElement) -> Result<Category> {
    ctx.unknown_leaf_attributes(element, &[])?;
    Category::from_str(element.text()).ok_or_else(|| {
        BomError::deserialization(
            format!("{}/Category", ctx.path()),
            format!("unknown category '{}'", element.text()),
        )
    })
}

// Writing

pub(crate) fn write_bill_of_materials(bom: &BillOfMaterials) -> Result<XmlElement> {
    let mut root = XmlElement::new(NS, ROOT_ELEMENT);
    if let Some(id) = &bom.internal_id {
        root.attributes.push(("id".to_owned(), id.clone()));
    }
    root.push_child(write_list("Components", &bom.components, write_part)?);
    if !bom.transport_phase.is_empty() {
        root.push_child(write_list(
            "TransportPhase",
            &bom.transport_phase,
            write_transport_stage,
        )?);
    }
    if let Some(use_phase) = &bom.use_phase {
        root.push_child(write_use_phase(use_phase));
    }
    if let Some(location) = &bom.location {
        root.push_child(write_location(location));
    }
    if let Some(details) = &bom.notes {
        root.push_child(write_bom_details(details));
    }
    Ok(root)
}

fn write_list<T>(
    container: &str,
    items: &[T],
    mut write_item: impl FnMut(&T) -> Result<XmlElement>,
) -> Result<XmlElement> {
    let mut element = XmlElement::new(NS, container);
    for item in items {
        element.push_child(write_item(item)?);
    }
    Ok(element)
}

fn write_part(part: &Part) -> Result<XmlElement> {
    let mut element = XmlElement::new(NS, "Part");
    if let Some(id) = &part.internal_id {
        element.attributes.push(("id".to_owned(), id.clone()));
    }
    if let Some(quantity) = &part.quantity {
        element.push_child(write_unitted_value(quantity, "Quantity"));
    }
    if let Some(mass) = &part.mass_per_uom {
        element.push_child(write_unitted_value(mass, "MassPerUom"));
    }
    if let Some(volume) = &part.volume_per_uom {
        element.push_child(write_unitted_value(volume, "VolumePerUom"));
    }
    if let Some(reference) = &part.mi_part_reference {
        element.push_child(gbt::write_record_reference(reference, NS, "MIPartReference"));
    }
    element.push_child(XmlElement::with_text(NS, "PartNumber", &part.part_number));
    write_optional_text(&mut element, "Name", part.name.as_deref());
    write_optional_text(&mut element, "ExternalIdentity", part.external_identity.as_deref());
    if !part.components.is_empty() {
        element.push_child(write_list("Components", &part.components, write_part)?);
    }
    if !part.specifications.is_empty() {
        element.push_child(write_list(
            "Specifications",
            &part.specifications,
            write_specification,
        )?);
    }
    if !part.materials.is_empty() {
        element.push_child(write_list("Materials", &part.materials, write_material)?);
    }
    if !part.substances.is_empty() {
        element.push_child(write_list("Substances", &part.substances, write_substance)?);
    }
    if !part.processes.is_empty() {
        element.push_child(write_list("Processes", &part.processes, write_process)?);
    }
    if !part.rohs_exemptions.is_empty() {
        element.push_child(write_list("RohsExemptions", &part.rohs_exemptions, |text| {
            Ok(XmlElement::with_text(NS, "RohsExemption", text.as_str()))
        })?);
    }
    if !part.end_of_life_fates.is_empty() {
        element.push_child(write_list(
            "EndOfLifeFates",
            &part.end_of_life_fates,
            write_end_of_life_fate,
        )?);
    }
    if !part.transport_phase.is_empty() {
        element.push_child(write_list(
            "TransportPhase",
            &part.transport_phase,
            write_transport_stage,
        )?);
    }
    if let Some(location) = &part.location {
        element.push_child(write_location(location));
    }
    Ok(element)
}

fn write_material(material: &Material) -> Result<XmlElement> {
    let mut element = XmlElement::new(NS, "Material");
    if let Some(id) = &material.internal_id {
        element.attributes.push(("id".to_owned(), id.clone()));
    }
    element.push_child(gbt::write_record_reference(
        &material.mi_material_reference,
        NS,
        "MIMaterialReference",
    ));
    match &material.quantity {
        Some(MaterialQuantity::Percentage(percentage)) => {
            element.push_child(XmlElement::with_text(NS, "Percentage", format_f64(*percentage)));
        }
        Some(MaterialQuantity::Mass(mass)) => {
            element.push_child(write_unitted_value(mass, "Mass"));
        }
        None => {}
    }
    if let Some(recycle_content) = &material.recycle_content {
        let mut wrapper = XmlElement::new(NS, "RecycleContent");
        match recycle_content {
            RecycleContent::Typical(typical) => {
                wrapper.push_child(XmlElement::with_text(NS, "Typical", typical.to_string()));
            }
            RecycleContent::Percentage(percentage) => {
                wrapper.push_child(XmlElement::with_text(NS, "Percentage", format_f64(*percentage)));
            }
        }
        element.push_child(wrapper);
    }
    if !material.processes.is_empty() {
        element.push_child(write_list("Processes", &material.processes, write_process)?);
    }
    if !material.end_of_life_fates.is_empty() {
        element.push_child(write_list(
            "EndOfLifeFates",
            &material.end_of_life_fates,
            write_end_of_life_fate,
        )?);
    }
    write_optional_text(&mut element, "Identity", material.identity.as_deref());
    write_optional_text(&mut element, "Name", material.name.as_deref());
    write_optional_text(&mut element, "ExternalIdentity", material.external_identity.as_deref());
    Ok(element)
}

fn write_substance(substance: &Substance) -> Result<XmlElement> {
    let mut element = XmlElement::new(NS, "Substance");
    if let Some(id) = &substance.internal_id {
        element.attributes.push(("id".to_owned(), id.clone()));
    }
    element.push_child(gbt::write_record_reference(
        &substance.mi_substance_reference,
        NS,
        "MISubstanceReference",
    ));
    if let Some(percentage) = substance.percentage {
        element.push_child(XmlElement::with_text(NS, "Percentage", format_f64(percentage)));
    }
    if let Some(category) = substance.category {
        element.push_child(XmlElement::with_text(NS, "Category", category.as_str()));
    }
    write_optional_text(&mut element, "Identity", substance.identity.as_deref());
    write_optional_text(&mut element, "Name", substance.name.as_deref());
    write_optional_text(&mut element, "ExternalIdentity", substance.external_identity.as_deref());
    Ok(element)
}

fn write_specification(specification: &Specification) -> Result<XmlElement> {
    let mut element = XmlElement::new(NS, "Specification");
    if let Some(id) = &specification.internal_id {
        element.attributes.push(("id".to_owned(), id.clone()));
    }
    element.push_child(gbt::write_record_reference(
        &specification.mi_specification_reference,
        NS,
        "MISpecificationReference",
    ));
    if let Some(quantity) = &specification.quantity {
        element.push_child(write_unitted_value(quantity, "Quantity"));
    }
    write_optional_text(&mut element, "Identity", specification.identity.as_deref());
    write_optional_text(&mut element, "Name", specification.name.as_deref());
    write_optional_text(
        &mut element,
        "ExternalIdentity",
        specification.external_identity.as_deref(),
    );
    Ok(element)
}

fn write_process(process: &Process) -> Result<XmlElement> {
    let mut element = XmlElement::new(NS, "Process");
    if let Some(id) = &process.internal_id {
        element.attributes.push(("id".to_owned(), id.clone()));
    }
    element.push_child(gbt::write_record_reference(
        &process.mi_process_reference,
        NS,
        "MIProcessReference",
    ));
    element.push_child(XmlElement::with_text(
        NS,
        "DimensionType",
        process.dimension_type.as_str(),
    ));
    match &process.amount {
        ProcessAmount::Percentage(percentage) => {
            if !process.dimension_type.supports_percentage() {
                return Err(BomError::choice_violation(
                    "Process",
                    format!(
                        "percentage amounts require a mass dimension type, not '{}'",
                        process.dimension_type.as_str()
                    ),
                ));
            }
            element.push_child(XmlElement::with_text(NS, "Percentage", format_f64(*percentage)));
        }
        ProcessAmount::Quantity(quantity) => {
            element.push_child(write_unitted_value(quantity, "Quantity"));
        }
    }
    write_optional_text(&mut element, "Identity", process.identity.as_deref());
    write_optional_text(&mut element, "Name", process.name.as_deref());
    write_optional_text(&mut element, "ExternalIdentity", process.external_identity.as_deref());
    if !process.transport_phase.is_empty() {
        element.push_child(write_list(
            "TransportPhase",
            &process.transport_phase,
            write_transport_stage,
        )?);
    }
    if let Some(location) = &process.location {
        element.push_child(write_location(location));
    }
    Ok(element)
}

fn write_transport_stage(stage: &TransportStage) -> Result<XmlElement> {
    let mut element = XmlElement::new(NS, "TransportStage");
    if let Some(id) = &stage.internal_id {
        element.attributes.push(("id".to_owned(), id.clone()));
    }
    element.push_child(XmlElement::with_text(NS, "Name", &stage.name));
    element.push_child(gbt::write_record_reference(
        &stage.mi_transport_reference,
        NS,
        "MITransportReference",
    ));
    element.push_child(write_unitted_value(&stage.distance, "Distance"));
    Ok(element)
}

fn write_location(location: &Location) -> XmlElement {
    let mut element = XmlElement::new(NS, "Location");
    if let Some(id) = &location.internal_id {
        element.attributes.push(("id".to_owned(), id.clone()));
    }
    if let Some(reference) = &location.mi_location_reference {
        element.push_child(gbt::write_record_reference(
            reference,
            NS,
            "MILocationReference",
        ));
    }
    write_optional_text(&mut element, "Identity", location.identity.as_deref());
    write_optional_text(&mut element, "Name", location.name.as_deref());
    write_optional_text(&mut element, "ExternalIdentity", location.external_identity.as_deref());
    element
}

fn write_end_of_life_fate(fate: &EndOfLifeFate) -> Result<XmlElement> {
    Ok(XmlElement::new(NS, "EndOfLifeFate")
        .with_child(gbt::write_record_reference(
            &fate.mi_end_of_life_reference,
            NS,
            "MIEndOfLifeReference",
        ))
        .with_child(XmlElement::with_text(NS, "Fraction", format_f64(fate.fraction))))
}

fn write_use_phase(use_phase: &UsePhase) -> XmlElement {
    let mut element = XmlElement::new(NS, "UsePhase");
    element.push_child(write_product_life_span(&use_phase.product_life_span));
    if let Some(mix) = &use_phase.electricity_mix {
        let mut mix_element = XmlElement::new(NS, "ElectricityMix");
        if let Some(reference) = &mix.mi_region_reference {
            mix_element.push_child(gbt::write_record_reference(
                reference,
                NS,
                "MIRegionReference",
            ));
        }
        if let Some(percentage) = mix.percentage_fossil_fuels {
            mix_element.push_child(XmlElement::with_text(
                NS,
                "PercentageFossilFuels",
                format_f64(percentage),
            ));
        }
        element.push_child(mix_element);
    }
    if let Some(static_mode) = &use_phase.static_mode {
        element.push_child(
            XmlElement::new(NS, "StaticMode")
                .with_child(gbt::write_record_reference(
                    &static_mode.mi_energy_conversion_reference,
                    NS,
                    "MIEnergyConversionReference",
                ))
                .with_child(write_unitted_value(&static_mode.power_rating, "PowerRating"))
                .with_child(
                    XmlElement::new(NS, "Usage")
                        .with_child(XmlElement::with_text(
                            NS,
                            "DaysUsedPerYear",
                            format_f64(static_mode.days_used_per_year),
                        ))
                        .with_child(XmlElement::with_text(
                            NS,
                            "HoursUsedPerDay",
                            format_f64(static_mode.hours_used_per_day),
                        )),
                ),
        );
    }
    if let Some(mobile_mode) = &use_phase.mobile_mode {
        element.push_child(
            XmlElement::new(NS, "MobileMode")
                .with_child(gbt::write_record_reference(
                    &mobile_mode.mi_transport_reference,
                    NS,
                    "MITransportReference",
                ))
                .with_child(XmlElement::with_text(
                    NS,
                    "DaysUsedPerYear",
                    format_f64(mobile_mode.days_used_per_year),
                ))
                .with_child(write_unitted_value(
                    &mobile_mode.distance_travelled_per_day,
                    "DistanceTravelledPerDay",
                )),
        );
    }
    element
}

fn write_product_life_span(span: &ProductLifeSpan) -> XmlElement {
    let mut element = XmlElement::new(NS, "ProductLifeSpan").with_child(XmlElement::with_text(
        NS,
        "DurationYears",
        format_f64(span.duration_years),
    ));
    if let Some(units) = span.number_of_functional_units {
        element.push_child(XmlElement::with_text(
            NS,
            "NumberOfFunctionalUnits",
            format_f64(units),
        ));
    }
    write_optional_text(
        &mut element,
        "FunctionalUnitDescription",
        span.functional_unit_description.as_deref(),
    );
    if let Some(utility) = &span.utility {
        let mut utility_element = XmlElement::new(NS, "Utility");
        if let Some(years) = utility.industry_average_duration_years {
            utility_element.push_child(XmlElement::with_text(
                NS,
                "IndustryAverageDurationYears",
                format_f64(years),
            ));
        }
        if let Some(units) = utility.industry_average_number_of_functional_units {
            utility_element.push_child(XmlElement::with_text(
                NS,
                "IndustryAverageNumberOfFunctionalUnits",
                format_f64(units),
            ));
        }
        if let Some(value) = utility.utility {
            utility_element.push_child(XmlElement::with_text(NS, "Utility", format_f64(value)));
        }
        element.push_child(utility_element);
    }
    element
}

fn write_bom_details(details: &BomDetails) -> XmlElement {
    let mut element = XmlElement::new(NS, "Notes");
    write_optional_text(&mut element, "Notes", details.notes.as_deref());
    write_optional_text(&mut element, "PictureUrl", details.picture_url.as_deref());
    write_optional_text(&mut element, "ProductName", details.product_name.as_deref());
    element
}

fn write_unitted_value(value: &UnittedValue, name: &str) -> XmlElement {
    let mut element = XmlElement::with_text(NS, name, format_f64(value.value));
    if let Some(unit) = &value.unit {
        element.attributes.push(("Unit".to_owned(), unit.clone()));
    }
    element
}

fn write_optional_text(element: &mut XmlElement, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        element.push_child(XmlElement::with_text(NS, name, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{RecordIdentity, RecordReference};
    use crate::xml::ReadMode;

    fn reference() -> RecordReference {
        RecordReference {
            database_key: Some("MI_Restricted_Substances".to_owned()),
            identity: Some(RecordIdentity {
                record_history_identity: 445566,
                version: Some(1),
            }),
            ..Default::default()
        }
    }

    fn roundtrip(bom: &BillOfMaterials) -> BillOfMaterials {
        let element = write_bill_of_materials(bom).unwrap();
        let mut ctx = ReadContext::new(ReadMode::Strict);
        ctx.push(ROOT_ELEMENT);
        read_bill_of_materials(&mut ctx, &element).unwrap()
    }

    #[test]
    fn test_part_level_transport_and_location_roundtrip() {
        let mut part = Part::new("PART-100");
        part.transport_phase.push(TransportStage::new(
            "Port to factory",
            reference(),
            UnittedValue::new(350.0, "km"),
        ));
        part.location = Some(Location {
            mi_location_reference: Some(reference()),
            name: Some("Shenzhen".to_owned()),
            ..Default::default()
        });
        let bom = BillOfMaterials::new(vec![part]);
        assert_eq!(roundtrip(&bom), bom);
    }

    #[test]
    fn test_process_level_transport_roundtrip() {
        let mut process = Process::new(
            reference(),
            DimensionType::Mass,
            ProcessAmount::Percentage(100.0),
        );
        process.transport_phase.push(TransportStage::new(
            "Forging plant",
            reference(),
            UnittedValue::new(12.0, "km"),
        ));
        let mut part = Part::new("PART-200");
        part.processes.push(process);
        let bom = BillOfMaterials::new(vec![part]);
        assert_eq!(roundtrip(&bom), bom);
    }

    #[test]
    fn test_version_namespace_on_written_tree() {
        let bom = BillOfMaterials::new(Vec::new());
        let element = write_bill_of_materials(&bom).unwrap();
        assert_eq!(element.namespace, NS);
    }
}

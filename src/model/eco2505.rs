//! Node model for the 25/05 Eco BoM schema.
//!
//! Structurally the 24/12 model, with one addition: every record reference
//! position accepts an [`ExtendedRecordReference`], which wraps a plain
//! record reference together with any number of equivalent references to
//! records that also link to the same analysis item.

use crate::model::common::{
    Category, DimensionType, MaterialQuantity, ProcessAmount, RecycleContent, UnittedValue,
};
use crate::reference::RecordReference;
use serde::{Deserialize, Serialize};

/// A record reference extended with an `EquivalentReferences` list.
///
/// The equivalent references are plain (non-extended) record references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedRecordReference {
    /// The primary reference.
    pub reference: RecordReference,
    /// Additional records which link to the same analysis item.
    pub equivalent_references: Vec<RecordReference>,
}

impl From<RecordReference> for ExtendedRecordReference {
    fn from(reference: RecordReference) -> Self {
        Self {
            reference,
            equivalent_references: Vec::new(),
        }
    }
}

/// The root Bill of Materials object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillOfMaterials {
    pub components: Vec<Part>,
    pub transport_phase: Vec<TransportStage>,
    pub use_phase: Option<UsePhase>,
    pub location: Option<Location>,
    pub notes: Option<BomDetails>,
    pub internal_id: Option<String>,
}

impl BillOfMaterials {
    pub fn new(components: Vec<Part>) -> Self {
        Self {
            components,
            ..Default::default()
        }
    }
}

/// A single part, which may or may not be stored in the MI database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub part_number: String,
    pub quantity: Option<UnittedValue>,
    pub mass_per_uom: Option<UnittedValue>,
    pub volume_per_uom: Option<UnittedValue>,
    pub mi_part_reference: Option<ExtendedRecordReference>,
    pub name: Option<String>,
    pub external_identity: Option<String>,
    pub components: Vec<Part>,
    pub specifications: Vec<Specification>,
    pub materials: Vec<Material>,
    pub substances: Vec<Substance>,
    pub processes: Vec<Process>,
    pub rohs_exemptions: Vec<String>,
    pub end_of_life_fates: Vec<EndOfLifeFate>,
    pub transport_phase: Vec<TransportStage>,
    pub location: Option<Location>,
    pub internal_id: Option<String>,
}

impl Part {
    pub fn new(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            ..Default::default()
        }
    }
}

/// A material within a part, stored in the MI database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub mi_material_reference: ExtendedRecordReference,
    /// Percentage of the part or absolute mass; at most one of the two.
    pub quantity: Option<MaterialQuantity>,
    pub recycle_content: Option<RecycleContent>,
    pub processes: Vec<Process>,
    pub end_of_life_fates: Vec<EndOfLifeFate>,
    pub identity: Option<String>,
    pub name: Option<String>,
    pub external_identity: Option<String>,
    pub internal_id: Option<String>,
}

impl Material {
    pub fn new(mi_material_reference: ExtendedRecordReference) -> Self {
        Self {
            mi_material_reference,
            quantity: None,
            recycle_content: None,
            processes: Vec::new(),
            end_of_life_fates: Vec::new(),
            identity: None,
            name: None,
            external_identity: None,
            internal_id: None,
        }
    }
}

/// A substance within a part, material, or specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substance {
    pub mi_substance_reference: ExtendedRecordReference,
    pub percentage: Option<f64>,
    pub category: Option<Category>,
    pub identity: Option<String>,
    pub name: Option<String>,
    pub external_identity: Option<String>,
    pub internal_id: Option<String>,
}

impl Substance {
    pub fn new(mi_substance_reference: ExtendedRecordReference) -> Self {
        Self {
            mi_substance_reference,
            percentage: None,
            category: None,
            identity: None,
            name: None,
            external_identity: None,
            internal_id: None,
        }
    }
}

/// A specification for a surface treatment, part, process, or material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub mi_specification_reference: ExtendedRecordReference,
    pub quantity: Option<UnittedValue>,
    pub identity: Option<String>,
    pub name: Option<String>,
    pub external_identity: Option<String>,
    pub internal_id: Option<String>,
}

impl Specification {
    pub fn new(mi_specification_reference: ExtendedRecordReference) -> Self {
        Self {
            mi_specification_reference,
            quantity: None,
            identity: None,
            name: None,
            external_identity: None,
            internal_id: None,
        }
    }
}

/// A process applied to a part, semi-finished part, or material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub mi_process_reference: ExtendedRecordReference,
    pub dimension_type: DimensionType,
    /// How much of the object the process affects. The percentage form is
    /// only valid for the mass dimension types.
    pub amount: ProcessAmount,
    pub identity: Option<String>,
    pub name: Option<String>,
    pub external_identity: Option<String>,
    pub transport_phase: Vec<TransportStage>,
    pub location: Option<Location>,
    pub internal_id: Option<String>,
}

impl Process {
    pub fn new(
        mi_process_reference: ExtendedRecordReference,
        dimension_type: DimensionType,
        amount: ProcessAmount,
    ) -> Self {
        Self {
            mi_process_reference,
            dimension_type,
            amount,
            identity: None,
            name: None,
            external_identity: None,
            transport_phase: Vec::new(),
            location: None,
            internal_id: None,
        }
    }
}

/// One stage of transportation applied to the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportStage {
    pub name: String,
    pub mi_transport_reference: ExtendedRecordReference,
    pub distance: UnittedValue,
    pub internal_id: Option<String>,
}

impl TransportStage {
    pub fn new(
        name: impl Into<String>,
        mi_transport_reference: ExtendedRecordReference,
        distance: UnittedValue,
    ) -> Self {
        Self {
            name: name.into(),
            mi_transport_reference,
            distance,
            internal_id: None,
        }
    }
}

/// A manufacturing location, for use in process calculations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub mi_location_reference: Option<ExtendedRecordReference>,
    pub identity: Option<String>,
    pub name: Option<String>,
    pub external_identity: Option<String>,
    pub internal_id: Option<String>,
}

/// The fate of a part or material at the end of the product's life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndOfLifeFate {
    pub mi_end_of_life_reference: ExtendedRecordReference,
    pub fraction: f64,
}

/// Electrical generation mix in the region of use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectricityMix {
    pub mi_region_reference: Option<ExtendedRecordReference>,
    pub percentage_fossil_fuels: Option<f64>,
}

/// Primary energy conversion during static product use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticMode {
    pub mi_energy_conversion_reference: ExtendedRecordReference,
    pub power_rating: UnittedValue,
    pub days_used_per_year: f64,
    pub hours_used_per_day: f64,
}

/// Transport of the product as part of its use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileMode {
    pub mi_transport_reference: ExtendedRecordReference,
    pub days_used_per_year: f64,
    pub distance_travelled_per_day: UnittedValue,
}

/// Utility of the product compared to a representative industry average.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilitySpecification {
    pub industry_average_duration_years: Option<f64>,
    pub industry_average_number_of_functional_units: Option<f64>,
    pub utility: Option<f64>,
}

/// Average life span for the product represented by the BoM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLifeSpan {
    pub duration_years: f64,
    pub number_of_functional_units: Option<f64>,
    pub functional_unit_description: Option<String>,
    pub utility: Option<UtilitySpecification>,
}

impl ProductLifeSpan {
    pub fn new(duration_years: f64) -> Self {
        Self {
            duration_years,
            number_of_functional_units: None,
            functional_unit_description: None,
            utility: None,
        }
    }
}

/// Sustainability of the product whilst in use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsePhase {
    pub product_life_span: ProductLifeSpan,
    pub electricity_mix: Option<ElectricityMix>,
    pub static_mode: Option<StaticMode>,
    pub mobile_mode: Option<MobileMode>,
}

impl UsePhase {
    pub fn new(product_life_span: ProductLifeSpan) -> Self {
        Self {
            product_life_span,
            electricity_mix: None,
            static_mode: None,
            mobile_mode: None,
        }
    }
}

/// Explanatory information about a BoM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BomDetails {
    pub notes: Option<String>,
    pub picture_url: Option<String>,
    pub product_name: Option<String>,
}

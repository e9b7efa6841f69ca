//! Node model for the 23/01 Eco BoM schema.
//!
//! The baseline schema: a recursive part tree with materials, substances,
//! specifications, processes, transport stages, and the sustainability
//! context (use phase, location, end-of-life fates). Transport and location
//! attach only at the root in this version; later schemas move them onto
//! parts and processes as well.

use crate::model::common::{
    Category, DimensionType, MaterialQuantity, ProcessAmount, RecycleContent, UnittedValue,
};
use crate::reference::RecordReference;
use serde::{Deserialize, Serialize};

/// The root Bill of Materials object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillOfMaterials {
    /// The top-level parts contained within this BoM.
    pub components: Vec<Part>,
    /// The forms of transport to which the parts are subject.
    pub transport_phase: Vec<TransportStage>,
    /// The type of use to which the product is subject.
    pub use_phase: Option<UsePhase>,
    /// The location in which the product is assembled.
    pub location: Option<Location>,
    /// Explanatory details about the BoM.
    pub notes: Option<BomDetails>,
    /// BoM-internal identity, used by other elements to reference this one.
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
    /// The part number associated with this part.
    pub part_number: String,
    /// Quantity of this part used in the parent. A count for discrete parts,
    /// a mass/length/area/volume for continuous ones.
    pub quantity: Option<UnittedValue>,
    /// Mass of the part, after processing, per unit of `quantity`. If set
    /// without `volume_per_uom`, material percentages are by mass.
    pub mass_per_uom: Option<UnittedValue>,
    /// Volume of the part, after processing, per unit of `quantity`. If set
    /// without `mass_per_uom`, material percentages are by volume.
    pub volume_per_uom: Option<UnittedValue>,
    /// Reference identifying the part record in the MI database.
    pub mi_part_reference: Option<RecordReference>,
    /// Display name for the part.
    pub name: Option<String>,
    /// Temporary reference used by applications to refer to the item.
    pub external_identity: Option<String>,
    /// Subcomponents of this part.
    pub components: Vec<Part>,
    /// Specifications applying to this part.
    pub specifications: Vec<Specification>,
    /// Constituent materials making up this part.
    pub materials: Vec<Material>,
    /// Substances contained directly within this part.
    pub substances: Vec<Substance>,
    /// Processes used in the manufacture of this part.
    pub processes: Vec<Process>,
    /// RoHS exemption justifications. A non-compliant part with exemptions
    /// is reported as compliant-with-exemptions instead.
    pub rohs_exemptions: Vec<String>,
    /// The fates of the part at the end of the product's life.
    pub end_of_life_fates: Vec<EndOfLifeFate>,
    /// BoM-internal identity.
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
    /// Reference identifying the material record.
    pub mi_material_reference: RecordReference,
    /// Percentage of the part or absolute mass; at most one of the two.
    pub quantity: Option<MaterialQuantity>,
    /// Recyclability, when it differs from or overrides the record's value.
    pub recycle_content: Option<RecycleContent>,
    /// Processes associated with producing and preparing this material.
    pub processes: Vec<Process>,
    /// The fates of this material once the product is disposed of.
    pub end_of_life_fates: Vec<EndOfLifeFate>,
    /// A display identity for the object.
    pub identity: Option<String>,
    /// A display name for the object.
    pub name: Option<String>,
    /// Temporary reference used by applications to refer to the item.
    pub external_identity: Option<String>,
    /// BoM-internal identity.
    pub internal_id: Option<String>,
}

impl Material {
    pub fn new(mi_material_reference: RecordReference) -> Self {
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
    /// Reference identifying the substance record.
    pub mi_substance_reference: RecordReference,
    /// Percentage of the parent that is this substance.
    pub percentage: Option<f64>,
    /// Whether the substance remains present after production.
    pub category: Option<Category>,
    /// A display identity for the object.
    pub identity: Option<String>,
    /// A display name for the object.
    pub name: Option<String>,
    /// Temporary reference used by applications to refer to the item.
    pub external_identity: Option<String>,
    /// BoM-internal identity.
    pub internal_id: Option<String>,
}

impl Substance {
    pub fn new(mi_substance_reference: RecordReference) -> Self {
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
    /// Reference identifying the specification record.
    pub mi_specification_reference: RecordReference,
    /// A quantification of the specification, if applicable.
    pub quantity: Option<UnittedValue>,
    /// A display identity for the object.
    pub identity: Option<String>,
    /// A display name for the object.
    pub name: Option<String>,
    /// Temporary reference used by applications to refer to the item.
    pub external_identity: Option<String>,
    /// BoM-internal identity.
    pub internal_id: Option<String>,
}

impl Specification {
    pub fn new(mi_specification_reference: RecordReference) -> Self {
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
    /// Reference identifying the process record.
    pub mi_process_reference: RecordReference,
    /// The dimension affected by the process, for example area for coatings
    /// or mass removed for machining.
    pub dimension_type: DimensionType,
    /// How much of the object the process affects. The percentage form is
    /// only valid for the mass dimension types.
    pub amount: ProcessAmount,
    /// A display identity for the object.
    pub identity: Option<String>,
    /// A display name for the object.
    pub name: Option<String>,
    /// Temporary reference used by applications to refer to the item.
    pub external_identity: Option<String>,
    /// BoM-internal identity.
    pub internal_id: Option<String>,
}

impl Process {
    pub fn new(
        mi_process_reference: RecordReference,
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
            internal_id: None,
        }
    }
}

/// One stage of transportation applied to the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportStage {
    /// Name identifying this stage within the BoM.
    pub name: String,
    /// Reference to the record representing the means of transport.
    pub mi_transport_reference: RecordReference,
    /// The distance covered by this stage.
    pub distance: UnittedValue,
    /// BoM-internal identity.
    pub internal_id: Option<String>,
}

impl TransportStage {
    pub fn new(
        name: impl Into<String>,
        mi_transport_reference: RecordReference,
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

/// The manufacturing location, for use in process calculations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Reference to the record representing the manufacturing location.
    pub mi_location_reference: Option<RecordReference>,
    /// A display identity for the object.
    pub identity: Option<String>,
    /// A display name for the object.
    pub name: Option<String>,
    /// Temporary reference used by applications to refer to the item.
    pub external_identity: Option<String>,
    /// BoM-internal identity.
    pub internal_id: Option<String>,
}

/// The fate of a part or material at the end of the product's life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndOfLifeFate {
    /// Reference identifying the applicable fate record.
    pub mi_end_of_life_reference: RecordReference,
    /// Fraction of the total mass or volume to which this fate applies.
    pub fraction: f64,
}

/// Electrical generation mix in the region of use, given either as a region
/// record or as the percentage of power from fossil fuels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectricityMix {
    /// Reference to the record for the destination country's mix.
    pub mi_region_reference: Option<RecordReference>,
    /// Percentage of electrical power production from fossil fuels.
    pub percentage_fossil_fuels: Option<f64>,
}

/// Primary energy conversion during static product use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticMode {
    /// Reference to the energy-conversion record.
    pub mi_energy_conversion_reference: RecordReference,
    /// Power rating of the product whilst in use.
    pub power_rating: UnittedValue,
    /// Days per year the product is used.
    pub days_used_per_year: f64,
    /// Hours per day of use.
    pub hours_used_per_day: f64,
}

/// Transport of the product as part of its use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileMode {
    /// Reference to the record for the means of transport during use.
    pub mi_transport_reference: RecordReference,
    /// Days per year the product is transported during use.
    pub days_used_per_year: f64,
    /// Distance transported each day.
    pub distance_travelled_per_day: UnittedValue,
}

/// Utility of the product compared to a representative industry average.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilitySpecification {
    /// Industry-average lifespan of this kind of product, in years.
    pub industry_average_duration_years: Option<f64>,
    /// Industry-average number of functional units delivered in a lifespan.
    pub industry_average_number_of_functional_units: Option<f64>,
    /// Directly specified utility.
    pub utility: Option<f64>,
}

/// Average life span for the product represented by the BoM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLifeSpan {
    /// The product lifespan in years.
    pub duration_years: f64,
    /// Functional units delivered in the product's lifespan.
    pub number_of_functional_units: Option<f64>,
    /// Short description of a single functional unit.
    pub functional_unit_description: Option<String>,
    /// Utility compared to an industry-average example.
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

/// Sustainability of the product whilst in use: life span, electricity, and
/// static/mobile energy consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsePhase {
    /// The expected life span of the product.
    pub product_life_span: ProductLifeSpan,
    /// Proportion of destination-country electricity from fossil fuels.
    pub electricity_mix: Option<ElectricityMix>,
    /// Expected static use of the product.
    pub static_mode: Option<StaticMode>,
    /// Expected mobile use of the product.
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
///
/// An empty `notes` element in a source document is preserved as
/// `Some("")`, never coerced to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BomDetails {
    /// General notes for the BoM.
    pub notes: Option<String>,
    /// URL of an image to include at the top of reports. Must be accessible
    /// from the reporting services server.
    pub picture_url: Option<String>,
    /// The product name.
    pub product_name: Option<String>,
}

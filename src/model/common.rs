//! Version-independent value primitives shared by every schema version.
//!
//! The structural node types are deliberately duplicated per version (see the
//! module docs on [`super`]); only these leaf value types and enumerations
//! are common, because their meaning and wire form never changed between
//! schema revisions.

use serde::{Deserialize, Serialize};

/// A decimal magnitude with an optional unit symbol.
///
/// Units are not dimensionally validated by this layer; if the unit does not
/// exist in the MI database the server reports an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnittedValue {
    /// The value of the quantity in the specified unit.
    pub value: f64,
    /// Unit symbol. Absent means the quantity is dimensionless.
    pub unit: Option<String>,
}

impl UnittedValue {
    /// Convenience constructor for a unitted quantity.
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: Some(unit.into()),
        }
    }

    /// Convenience constructor for a dimensionless quantity.
    pub fn dimensionless(value: f64) -> Self {
        Self { value, unit: None }
    }
}

/// The dimension by which a process is quantified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionType {
    /// The process affects the bulk of the material or part, for example a
    /// shaping process.
    Mass,
    /// The process removes material, for example milling or turning.
    MassRemoved,
    Volume,
    /// Some joining processes have an associated area.
    Area,
    /// Edge-joining processes such as welding are quantified by length.
    Length,
    /// Fastening processes quantified by the number of fasteners.
    Count,
    Time,
}

impl DimensionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mass => "Mass",
            Self::MassRemoved => "MassRemoved",
            Self::Volume => "Volume",
            Self::Area => "Area",
            Self::Length => "Length",
            Self::Count => "Count",
            Self::Time => "Time",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Some(match value {
            "Mass" => Self::Mass,
            "MassRemoved" => Self::MassRemoved,
            "Volume" => Self::Volume,
            "Area" => Self::Area,
            "Length" => Self::Length,
            "Count" => Self::Count,
            "Time" => Self::Time,
            _ => return None,
        })
    }

    /// Whether a percentage amount is meaningful for this dimension.
    pub fn supports_percentage(&self) -> bool {
        matches!(self, Self::Mass | Self::MassRemoved)
    }
}

/// Whether and how a substance persists into the end product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Null,
    Incorporated,
    MayBeIncorporated,
    UsedInProduction,
    MayBeUsedInProduction,
    UsedInCoating,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Incorporated => "Incorporated",
            Self::MayBeIncorporated => "MayBeIncorporated",
            Self::UsedInProduction => "UsedInProduction",
            Self::MayBeUsedInProduction => "MayBeUsedInProduction",
            Self::UsedInCoating => "UsedInCoating",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Some(match value {
            "Null" => Self::Null,
            "Incorporated" => Self::Incorporated,
            "MayBeIncorporated" => Self::MayBeIncorporated,
            "UsedInProduction" => Self::UsedInProduction,
            "MayBeUsedInProduction" => Self::MayBeUsedInProduction,
            "UsedInCoating" => Self::UsedInCoating,
            _ => return None,
        })
    }
}

/// How much of a part consists of a material: a percentage of the parent or
/// an absolute mass. Exactly one branch may appear on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialQuantity {
    /// Fraction of the part, in percent.
    Percentage(f64),
    /// Absolute mass of the material within the part.
    Mass(UnittedValue),
}

/// How much of an object a process affects. Exactly one branch is required.
///
/// The percentage branch is only meaningful for the `Mass` and `MassRemoved`
/// dimension types; the serializer rejects other combinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProcessAmount {
    /// Fraction of the object affected, in percent, with basis given by the
    /// process dimension type.
    Percentage(f64),
    /// Absolute quantification according to the dimension type.
    Quantity(UnittedValue),
}

/// Recyclability of a material: either the typical (datasheet) figure from
/// the MI record, or an explicit percentage override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecycleContent {
    /// Use the typical value from the material record when true.
    Typical(bool),
    /// Explicit percentage of the material that can be recycled.
    Percentage(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_type_roundtrip() {
        for dimension in [
            DimensionType::Mass,
            DimensionType::MassRemoved,
            DimensionType::Volume,
            DimensionType::Area,
            DimensionType::Length,
            DimensionType::Count,
            DimensionType::Time,
        ] {
            assert_eq!(DimensionType::from_str(dimension.as_str()), Some(dimension));
        }
        assert_eq!(DimensionType::from_str("Weight"), None);
    }

    #[test]
    fn test_percentage_support() {
        assert!(DimensionType::Mass.supports_percentage());
        assert!(DimensionType::MassRemoved.supports_percentage());
        assert!(!DimensionType::Area.supports_percentage());
        assert!(!DimensionType::Count.supports_percentage());
    }

    #[test]
    fn test_category_roundtrip() {
        assert_eq!(Category::from_str("UsedInCoating"), Some(Category::UsedInCoating));
        assert_eq!(Category::from_str("Unknown"), None);
    }
}

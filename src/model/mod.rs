//! Per-schema-version BoM node models.
//!
//! Each supported schema version gets its own self-contained set of node
//! types ([`eco2301`], [`eco2412`], [`eco2505`]) rather than one shared
//! hierarchy with version flags. The versions overlap heavily, but keeping
//! them separate means a field that only exists in a newer schema cannot leak
//! into an older document by construction. Only the reference types
//! ([`crate::reference`]) and the value primitives in [`common`] are shared.
//!
//! The active version travels alongside the tree as a [`BomVersion`] tag,
//! either chosen by the caller or detected from the document namespace; the
//! codec dispatches on it.

pub mod common;
pub mod eco2301;
pub mod eco2412;
pub mod eco2505;

use serde::{Deserialize, Serialize};

/// A supported Eco BoM schema version, named by its date-coded tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BomVersion {
    /// 23/01 baseline schema.
    Eco2301,
    /// 24/12: adds transport and location to `Part` and `Process`.
    Eco2412,
    /// 25/05: as 24/12, plus equivalent-reference lists on record references.
    Eco2505,
}

impl BomVersion {
    /// All supported versions, oldest first.
    pub const ALL: [Self; 3] = [Self::Eco2301, Self::Eco2412, Self::Eco2505];

    /// The XML namespace identifying this schema version.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Eco2301 => "http://www.grantadesign.com/23/01/BillOfMaterialsEco",
            Self::Eco2412 => "http://www.grantadesign.com/24/12/BillOfMaterialsEco",
            Self::Eco2505 => "http://www.grantadesign.com/25/05/BillOfMaterialsEco",
        }
    }

    /// The human-readable date-coded tag, e.g. `23/01`.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Eco2301 => "23/01",
            Self::Eco2412 => "24/12",
            Self::Eco2505 => "25/05",
        }
    }

    /// Identify a schema version from a document namespace.
    pub fn from_namespace(namespace: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.namespace() == namespace)
    }
}

impl std::fmt::Display for BomVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A BoM tree of any supported schema version, tagged by version.
///
/// This is what [`BomHandler`](crate::handler::BomHandler) returns from load
/// operations and accepts for save operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Bom {
    Eco2301(eco2301::BillOfMaterials),
    Eco2412(eco2412::BillOfMaterials),
    Eco2505(eco2505::BillOfMaterials),
}

impl Bom {
    /// The schema version this tree belongs to.
    pub fn version(&self) -> BomVersion {
        match self {
            Self::Eco2301(_) => BomVersion::Eco2301,
            Self::Eco2412(_) => BomVersion::Eco2412,
            Self::Eco2505(_) => BomVersion::Eco2505,
        }
    }
}

impl From<eco2301::BillOfMaterials> for Bom {
    fn from(bom: eco2301::BillOfMaterials) -> Self {
        Self::Eco2301(bom)
    }
}

impl From<eco2412::BillOfMaterials> for Bom {
    fn from(bom: eco2412::BillOfMaterials) -> Self {
        Self::Eco2412(bom)
    }
}

impl From<eco2505::BillOfMaterials> for Bom {
    fn from(bom: eco2505::BillOfMaterials) -> Self {
        Self::Eco2505(bom)
    }
}

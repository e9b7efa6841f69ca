//! Granta base types: record, attribute, and table references.
//!
//! These value types live in the shared `12/05 GrantaBaseTypes` XML namespace
//! and are used unchanged by every supported BoM schema version. A reference
//! identifies a record (or attribute, or table) in an MI database; it never
//! points at another node in the same BoM tree.

mod builders;
mod types;

pub use builders::{
    AttributeReferenceBuilder, AttributeReferenceByNameBuilder, RecordReferenceBuilder,
};
pub use types::{
    AttributeReference, PartialTableReference, PseudoAttribute, RecordIdentity, RecordLookup,
    RecordReference, ResolvedReference,
};

/// XML namespace for the shared Granta base types.
pub const GRANTA_BASE_TYPES_NAMESPACE: &str = "http://www.grantadesign.com/12/05/GrantaBaseTypes";

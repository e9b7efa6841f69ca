//! Reference value types and the identification-priority resolution rule.

use serde::{Deserialize, Serialize};

/// The identity-based identification strategy: a record history identity and
/// an optional version number.
///
/// This is the best-performing way to reference a record, but identities are
/// not durable across record history changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordIdentity {
    /// The record history identity within the MI database.
    pub record_history_identity: i64,
    /// If omitted, the latest version visible to the user is meant.
    pub version: Option<u32>,
}

/// The lookup-based identification strategy: an attribute plus the value that
/// (uniquely, in well-formed data) identifies the record.
///
/// Behavior is undefined if the value is not unique within scope; the remote
/// service reports an error in that case, this layer does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLookup {
    /// The short-text attribute or compatible pseudo-attribute to look up.
    pub attribute_reference: AttributeReference,
    /// The value identifying the record.
    pub attribute_value: String,
}

/// Identifies a record in an MI database.
///
/// All four identification strategies are stored as independent optional
/// fields. Documents may legally populate more than one; consumers resolve
/// the effective strategy with [`RecordReference::resolve`], which applies
/// the documented descending priority order: identity, record GUID, record
/// history GUID, lookup value. Non-chosen strategies are ignored, never
/// cross-validated, and always round-trip unchanged.
///
/// A reference with no strategy at all is valid (it serves as a template) but
/// is rejected by most server operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordReference {
    /// The key that uniquely identifies a particular database on the MI
    /// server. Required in practice for most operations.
    pub database_key: Option<String>,

    /// Identity-based strategy (highest priority).
    pub identity: Option<RecordIdentity>,

    /// GUID of a specific version of the record.
    pub record_guid: Option<String>,

    /// GUID stable across all versions of a record; the latest visible
    /// version is meant.
    pub record_history_guid: Option<String>,

    /// Lookup-based strategy (lowest priority).
    pub lookup_value: Option<RecordLookup>,

    /// Opaque correlation token, echoed back unchanged by the server. Not an
    /// identification strategy.
    pub record_uid: Option<String>,
}

impl RecordReference {
    /// Resolve the single effective identification strategy.
    ///
    /// Pure function over the four optional fields; returns `None` for an
    /// empty (template) reference. Repeated calls always produce the same
    /// result.
    pub fn resolve(&self) -> Option<ResolvedReference<'_>> {
        if let Some(identity) = &self.identity {
            Some(ResolvedReference::Identity(identity))
        } else if let Some(guid) = &self.record_guid {
            Some(ResolvedReference::RecordGuid(guid))
        } else if let Some(guid) = &self.record_history_guid {
            Some(ResolvedReference::RecordHistoryGuid(guid))
        } else {
            self.lookup_value.as_ref().map(ResolvedReference::Lookup)
        }
    }

    /// True if no identification strategy is populated.
    pub fn is_empty(&self) -> bool {
        self.resolve().is_none()
    }
}

/// The effective identifier of a [`RecordReference`], tagged by strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedReference<'a> {
    Identity(&'a RecordIdentity),
    RecordGuid(&'a str),
    RecordHistoryGuid(&'a str),
    Lookup(&'a RecordLookup),
}

/// Identifies an attribute in an MI database, either directly by its integer
/// identity or indirectly by a name (or pseudo-attribute) scoped to a table.
///
/// An attribute reference may match more than one attribute; whether that is
/// legal depends on the operation it is used in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeReference {
    /// The key that uniquely identifies a particular database on the MI
    /// server.
    pub database_key: Option<String>,

    /// The identity of the attribute within the MI database.
    pub attribute_identity: Option<i64>,

    /// The table hosting the attribute. Required when `attribute_name` is a
    /// plain (non-standard) name.
    pub table_reference: Option<PartialTableReference>,

    /// Name of the attribute.
    pub attribute_name: Option<String>,

    /// The pseudo-attribute, if referring to one.
    pub pseudo: Option<PseudoAttribute>,

    /// If true, `attribute_name` is a Standard Name.
    pub is_standard: Option<bool>,
}

/// Partially identifies a table without specifying the database.
///
/// Usually just one field should be provided; where more than one is, the
/// highest-priority one wins, in descending order: identity, GUID, name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialTableReference {
    /// The identity of the table; the fastest way to reference one.
    pub table_identity: Option<i64>,

    /// The GUID of the table; the most persistent way to reference one.
    pub table_guid: Option<String>,

    /// The name of the table. Table names can vary between localisations of
    /// a database, so this is not safe for multi-locale databases.
    pub table_name: Option<String>,
}

/// Pseudo-attributes addressable through an [`AttributeReference`].
///
/// Serialized in lowerCamel on the wire (`recordGUID` style casing for the
/// GUID variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PseudoAttribute {
    Name,
    ShortName,
    Subsets,
    ReleasedDate,
    ModifiedDate,
    RecordType,
    RecordHistoryIdentity,
    RecordColor,
    LinkedRecords,
    VersionState,
    RecordGuid,
    RecordHistoryGuid,
    RecordVersionNumber,
    TableName,
    ChildRecords,
    TableFilters,
}

impl PseudoAttribute {
    /// Wire spelling: leading character lowercased.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::ShortName => "shortName",
            Self::Subsets => "subsets",
            Self::ReleasedDate => "releasedDate",
            Self::ModifiedDate => "modifiedDate",
            Self::RecordType => "recordType",
            Self::RecordHistoryIdentity => "recordHistoryIdentity",
            Self::RecordColor => "recordColor",
            Self::LinkedRecords => "linkedRecords",
            Self::VersionState => "versionState",
            Self::RecordGuid => "recordGUID",
            Self::RecordHistoryGuid => "recordHistoryGUID",
            Self::RecordVersionNumber => "recordVersionNumber",
            Self::TableName => "tableName",
            Self::ChildRecords => "childRecords",
            Self::TableFilters => "tableFilters",
        }
    }

    /// Parse the wire spelling.
    pub fn from_str(value: &str) -> Option<Self> {
        Some(match value {
            "name" => Self::Name,
            "shortName" => Self::ShortName,
            "subsets" => Self::Subsets,
            "releasedDate" => Self::ReleasedDate,
            "modifiedDate" => Self::ModifiedDate,
            "recordType" => Self::RecordType,
            "recordHistoryIdentity" => Self::RecordHistoryIdentity,
            "recordColor" => Self::RecordColor,
            "linkedRecords" => Self::LinkedRecords,
            "versionState" => Self::VersionState,
            "recordGUID" => Self::RecordGuid,
            "recordHistoryGUID" => Self::RecordHistoryGuid,
            "recordVersionNumber" => Self::RecordVersionNumber,
            "tableName" => Self::TableName,
            "childRecords" => Self::ChildRecords,
            "tableFilters" => Self::TableFilters,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guid_reference() -> RecordReference {
        RecordReference {
            database_key: Some("MI_Restricted_Substances".to_string()),
            record_guid: Some("2086f56a-4f4d-4850-9891-3d6ad155d1f9".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_reference_resolves_to_none() {
        let reference = RecordReference::default();
        assert!(reference.is_empty());
        assert!(reference.resolve().is_none());
    }

    #[test]
    fn test_single_strategy_resolves() {
        let reference = guid_reference();
        match reference.resolve() {
            Some(ResolvedReference::RecordGuid(guid)) => {
                assert_eq!(guid, "2086f56a-4f4d-4850-9891-3d6ad155d1f9");
            }
            other => panic!("expected record GUID resolution, got {other:?}"),
        }
    }

    #[test]
    fn test_priority_identity_beats_guid() {
        let mut reference = guid_reference();
        reference.identity = Some(RecordIdentity {
            record_history_identity: 12345,
            version: None,
        });
        // Resolution picks the identity; the GUID is ignored, not validated.
        match reference.resolve() {
            Some(ResolvedReference::Identity(identity)) => {
                assert_eq!(identity.record_history_identity, 12345);
            }
            other => panic!("expected identity resolution, got {other:?}"),
        }
        assert!(reference.record_guid.is_some());
    }

    #[test]
    fn test_priority_history_guid_beats_lookup() {
        let reference = RecordReference {
            record_history_guid: Some("a-history-guid".to_string()),
            lookup_value: Some(RecordLookup {
                attribute_reference: AttributeReference::default(),
                attribute_value: "value".to_string(),
            }),
            ..Default::default()
        };
        assert!(matches!(
            reference.resolve(),
            Some(ResolvedReference::RecordHistoryGuid("a-history-guid"))
        ));
    }

    #[test]
    fn test_resolution_is_stable() {
        let mut reference = guid_reference();
        reference.identity = Some(RecordIdentity {
            record_history_identity: 1,
            version: Some(2),
        });
        let first = format!("{:?}", reference.resolve());
        for _ in 0..10 {
            assert_eq!(format!("{:?}", reference.resolve()), first);
        }
    }

    #[test]
    fn test_pseudo_attribute_wire_spelling_roundtrip() {
        for pseudo in [
            PseudoAttribute::Name,
            PseudoAttribute::RecordGuid,
            PseudoAttribute::RecordHistoryGuid,
            PseudoAttribute::TableFilters,
        ] {
            assert_eq!(PseudoAttribute::from_str(pseudo.as_str()), Some(pseudo));
        }
        assert_eq!(PseudoAttribute::from_str("notAPseudo"), None);
    }
}

//! Guided construction of record and attribute references.
//!
//! The builders enforce that exactly one identification strategy ends up on
//! the finished reference. Attempting to choose a second strategy, or to
//! build with none chosen, fails fast with
//! [`BomError::InvalidReference`](crate::error::BomError).

use super::types::{
    AttributeReference, PartialTableReference, PseudoAttribute, RecordIdentity, RecordLookup,
    RecordReference,
};
use crate::error::{BomError, Result};

/// Builder for a [`RecordReference`] with a valid combination of fields.
///
/// # Example
///
/// ```
/// use granta_bom::reference::RecordReferenceBuilder;
///
/// let reference = RecordReferenceBuilder::new()
///     .with_database_key("MI_Restricted_Substances")
///     .by_guid("2086f56a-4f4d-4850-9891-3d6ad155d1f9")?
///     .build()?;
/// assert_eq!(reference.database_key.as_deref(), Some("MI_Restricted_Substances"));
/// # Ok::<(), granta_bom::BomError>(())
/// ```
#[derive(Debug, Default)]
pub struct RecordReferenceBuilder {
    reference: RecordReference,
    strategy: Option<&'static str>,
}

impl RecordReferenceBuilder {
    /// Create a builder with no fields populated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database key the record belongs to.
    #[must_use]
    pub fn with_database_key(mut self, database_key: impl Into<String>) -> Self {
        self.reference.database_key = Some(database_key.into());
        self
    }

    /// Annotate the reference with an opaque correlation token, returned by
    /// the server unchanged.
    #[must_use]
    pub fn with_record_uid(mut self, record_uid: impl Into<String>) -> Self {
        self.reference.record_uid = Some(record_uid.into());
        self
    }

    /// Identify the record by its history identity, optionally pinned to a
    /// version number for records in version-controlled tables.
    pub fn by_identity(
        mut self,
        record_history_identity: i64,
        version: Option<u32>,
    ) -> Result<Self> {
        self.claim_strategy("identity")?;
        self.reference.identity = Some(RecordIdentity {
            record_history_identity,
            version,
        });
        Ok(self)
    }

    /// Identify a specific version of the record by its GUID.
    pub fn by_guid(mut self, record_guid: impl Into<String>) -> Result<Self> {
        self.claim_strategy("record GUID")?;
        self.reference.record_guid = Some(record_guid.into());
        Ok(self)
    }

    /// Identify the record history by its GUID; the latest released version
    /// is returned. Use [`by_guid`](Self::by_guid) for a specific version.
    pub fn by_history_guid(mut self, record_history_guid: impl Into<String>) -> Result<Self> {
        self.claim_strategy("record history GUID")?;
        self.reference.record_history_guid = Some(record_history_guid.into());
        Ok(self)
    }

    /// Identify the record by a unique value on a short-text attribute.
    pub fn by_lookup(
        mut self,
        attribute_reference: AttributeReference,
        attribute_value: impl Into<String>,
    ) -> Result<Self> {
        self.claim_strategy("lookup value")?;
        self.reference.lookup_value = Some(RecordLookup {
            attribute_reference,
            attribute_value: attribute_value.into(),
        });
        Ok(self)
    }

    /// Finish the reference. Fails if no identification strategy was chosen;
    /// use [`RecordReference::default`] directly for an intentionally empty
    /// template reference.
    pub fn build(self) -> Result<RecordReference> {
        if self.strategy.is_none() {
            return Err(BomError::invalid_reference(
                "no identification strategy set; a record reference requires exactly one of \
                 identity, record GUID, record history GUID, or lookup value",
            ));
        }
        Ok(self.reference)
    }

    fn claim_strategy(&mut self, strategy: &'static str) -> Result<()> {
        if let Some(existing) = self.strategy {
            return Err(BomError::invalid_reference(format!(
                "identification strategy already set to {existing}; cannot also set {strategy}"
            )));
        }
        self.strategy = Some(strategy);
        Ok(())
    }
}

/// Builder for an [`AttributeReference`] with a valid combination of fields.
///
/// Attributes are identified either directly by identity, as a
/// pseudo-attribute, or by name. The name form needs a table reference unless
/// the name is a Standard Name.
#[derive(Debug, Default)]
pub struct AttributeReferenceBuilder {
    reference: AttributeReference,
    strategy: Option<&'static str>,
}

impl AttributeReferenceBuilder {
    /// Create a builder with no fields populated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database key the attribute belongs to.
    #[must_use]
    pub fn with_database_key(mut self, database_key: impl Into<String>) -> Self {
        self.reference.database_key = Some(database_key.into());
        self
    }

    /// Identify the attribute directly by its identity.
    pub fn by_identity(mut self, attribute_identity: i64) -> Result<Self> {
        self.claim_strategy("attribute identity")?;
        self.reference.attribute_identity = Some(attribute_identity);
        Ok(self)
    }

    /// Identify the attribute as a pseudo-attribute.
    pub fn by_pseudo(mut self, pseudo: PseudoAttribute) -> Result<Self> {
        self.claim_strategy("pseudo-attribute")?;
        self.reference.pseudo = Some(pseudo);
        Ok(self)
    }

    /// Identify the attribute by name. The returned stage requires either a
    /// table reference or the standard-name flag before it can build.
    pub fn by_name(
        mut self,
        attribute_name: impl Into<String>,
    ) -> Result<AttributeReferenceByNameBuilder> {
        self.claim_strategy("attribute name")?;
        self.reference.attribute_name = Some(attribute_name.into());
        Ok(AttributeReferenceByNameBuilder { parent: self })
    }

    /// Finish the reference. Fails if no identification strategy was chosen.
    pub fn build(self) -> Result<AttributeReference> {
        if self.strategy.is_none() {
            return Err(BomError::invalid_reference(
                "no identification strategy set; an attribute reference requires one of \
                 attribute identity, pseudo-attribute, or attribute name",
            ));
        }
        Ok(self.reference)
    }

    fn claim_strategy(&mut self, strategy: &'static str) -> Result<()> {
        if let Some(existing) = self.strategy {
            return Err(BomError::invalid_reference(format!(
                "identification strategy already set to {existing}; cannot also set {strategy}"
            )));
        }
        self.strategy = Some(strategy);
        Ok(())
    }
}

/// Second stage of [`AttributeReferenceBuilder::by_name`]: scope the name to
/// a table, or declare it a Standard Name.
#[derive(Debug)]
pub struct AttributeReferenceByNameBuilder {
    parent: AttributeReferenceBuilder,
}

impl AttributeReferenceByNameBuilder {
    /// Scope the attribute name to a table identified by name.
    #[must_use]
    pub fn with_table_name(self, table_name: impl Into<String>) -> AttributeReferenceBuilder {
        self.with_table(PartialTableReference {
            table_name: Some(table_name.into()),
            ..Default::default()
        })
    }

    /// Scope the attribute name to a table identified by its identity.
    #[must_use]
    pub fn with_table_identity(self, table_identity: i64) -> AttributeReferenceBuilder {
        self.with_table(PartialTableReference {
            table_identity: Some(table_identity),
            ..Default::default()
        })
    }

    /// Scope the attribute name to a table identified by its GUID.
    #[must_use]
    pub fn with_table_guid(self, table_guid: impl Into<String>) -> AttributeReferenceBuilder {
        self.with_table(PartialTableReference {
            table_guid: Some(table_guid.into()),
            ..Default::default()
        })
    }

    /// Declare the name a Standard Name, which needs no table scope.
    #[must_use]
    pub fn as_standard_name(mut self) -> AttributeReferenceBuilder {
        self.parent.reference.is_standard = Some(true);
        self.parent
    }

    /// Finish directly from the name stage. Fails because a plain attribute
    /// name without a table scope is ambiguous.
    pub fn build(self) -> Result<AttributeReference> {
        Err(BomError::invalid_reference(
            "an attribute name that is not a Standard Name requires a table reference",
        ))
    }

    fn with_table(mut self, table: PartialTableReference) -> AttributeReferenceBuilder {
        self.parent.reference.table_reference = Some(table);
        self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reference_single_strategy() {
        let reference = RecordReferenceBuilder::new()
            .with_database_key("MI_Training")
            .by_identity(1234, Some(2))
            .unwrap()
            .build()
            .unwrap();
        let identity = reference.identity.unwrap();
        assert_eq!(identity.record_history_identity, 1234);
        assert_eq!(identity.version, Some(2));
        assert!(reference.record_guid.is_none());
    }

    #[test]
    fn test_record_reference_rejects_second_strategy() {
        let result = RecordReferenceBuilder::new()
            .by_guid("guid-a")
            .unwrap()
            .by_history_guid("guid-b");
        assert!(matches!(result, Err(BomError::InvalidReference(_))));
    }

    #[test]
    fn test_record_reference_rejects_empty_build() {
        let result = RecordReferenceBuilder::new()
            .with_database_key("MI_Training")
            .build();
        assert!(matches!(result, Err(BomError::InvalidReference(_))));
    }

    #[test]
    fn test_record_uid_is_not_a_strategy() {
        let reference = RecordReferenceBuilder::new()
            .with_record_uid("corr-1")
            .by_guid("guid-a")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(reference.record_uid.as_deref(), Some("corr-1"));
    }

    #[test]
    fn test_attribute_reference_by_identity() {
        let reference = AttributeReferenceBuilder::new()
            .with_database_key("MI_Training")
            .by_identity(42)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(reference.attribute_identity, Some(42));
    }

    #[test]
    fn test_attribute_name_requires_table() {
        let result = AttributeReferenceBuilder::new()
            .by_name("Density")
            .unwrap()
            .build();
        assert!(matches!(result, Err(BomError::InvalidReference(_))));
    }

    #[test]
    fn test_attribute_name_with_table() {
        let reference = AttributeReferenceBuilder::new()
            .by_name("Density")
            .unwrap()
            .with_table_name("MaterialUniverse")
            .build()
            .unwrap();
        assert_eq!(reference.attribute_name.as_deref(), Some("Density"));
        assert_eq!(
            reference
                .table_reference
                .unwrap()
                .table_name
                .as_deref(),
            Some("MaterialUniverse")
        );
    }

    #[test]
    fn test_attribute_standard_name_needs_no_table() {
        let reference = AttributeReferenceBuilder::new()
            .by_name("Density")
            .unwrap()
            .as_standard_name()
            .build()
            .unwrap();
        assert_eq!(reference.is_standard, Some(true));
        assert!(reference.table_reference.is_none());
    }

    #[test]
    fn test_attribute_rejects_identity_then_name() {
        let result = AttributeReferenceBuilder::new()
            .by_identity(42)
            .unwrap()
            .by_name("Density");
        assert!(matches!(result, Err(BomError::InvalidReference(_))));
    }

    #[test]
    fn test_attribute_rejects_empty_build() {
        let result = AttributeReferenceBuilder::new().build();
        assert!(matches!(result, Err(BomError::InvalidReference(_))));
    }
}

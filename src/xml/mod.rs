//! Bidirectional XML codec for Eco BoM documents.
//!
//! [`parse_bom`] detects the schema version from the root element's
//! namespace and dispatches to the matching versioned reader; [`write_bom`]
//! dispatches on the tree's own version tag. The readers are
//! order-insensitive and namespace-aware; the writers emit elements in
//! schema order with the Eco namespace as the default and record references
//! qualified with the `gbt` prefix.
//!
//! Reading is configurable with a [`ReadMode`]: lenient mode (the default)
//! skips content the model cannot represent with a debug log, strict mode
//! reports it as a [`BomError::Deserialization`] carrying the element path.
//! Structural problems (missing required fields, malformed values, choice
//! group violations) are errors in both modes.

pub mod dom;
mod eco2301;
mod eco2412;
mod eco2505;
mod gbt;

use crate::error::{BomError, Result};
use crate::model::{Bom, BomVersion};
use dom::XmlElement;

/// Local name of the document root element, common to all schema versions.
pub(crate) const ROOT_ELEMENT: &str = "PartsEco";

/// Prefix used for the GrantaBaseTypes namespace on output.
pub(crate) const GBT_PREFIX: &str = "gbt";

/// How the reader treats document content the model cannot represent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Skip unrepresentable content, logging each skip at debug level.
    /// Skipped content is dropped and will not survive a round trip.
    #[default]
    Lenient,
    /// Fail on the first unrepresentable element.
    Strict,
}

/// Parse a BoM document, detecting the schema version from the root
/// element's namespace.
pub fn parse_bom(content: &str, mode: ReadMode) -> Result<Bom> {
    let root = dom::parse_document(content)?;
    let version = detect_version(&root)?;
    let mut ctx = ReadContext::new(mode);
    ctx.push(ROOT_ELEMENT);
    let bom = match version {
        BomVersion::Eco2301 => Bom::Eco2301(eco2301::read_bill_of_materials(&mut ctx, &root)?),
        BomVersion::Eco2412 => Bom::Eco2412(eco2412::read_bill_of_materials(&mut ctx, &root)?),
        BomVersion::Eco2505 => Bom::Eco2505(eco2505::read_bill_of_materials(&mut ctx, &root)?),
    };
    Ok(bom)
}

/// Serialize a BoM tree to an XML document in its own schema version.
pub fn write_bom(bom: &Bom) -> Result<String> {
    let root = match bom {
        Bom::Eco2301(tree) => eco2301::write_bill_of_materials(tree)?,
        Bom::Eco2412(tree) => eco2412::write_bill_of_materials(tree)?,
        Bom::Eco2505(tree) => eco2505::write_bill_of_materials(tree)?,
    };
    dom::write_document(
        &root,
        bom.version().namespace(),
        &[(GBT_PREFIX, crate::reference::GRANTA_BASE_TYPES_NAMESPACE)],
    )
}

/// Identify the schema version of a parsed document root.
pub(crate) fn detect_version(root: &XmlElement) -> Result<BomVersion> {
    if root.name == ROOT_ELEMENT {
        if let Some(version) = BomVersion::from_namespace(&root.namespace) {
            return Ok(version);
        }
    }
    Err(BomError::UnsupportedSchema {
        namespace: root.namespace.clone(),
        element: root.name.clone(),
    })
}

/// Reader state threaded through the versioned readers: the configured
/// [`ReadMode`] and the path from the root to the element being read.
pub(crate) struct ReadContext {
    mode: ReadMode,
    path: Vec<String>,
}

impl ReadContext {
    pub(crate) fn new(mode: ReadMode) -> Self {
        Self {
            mode,
            path: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    pub(crate) fn pop(&mut self) {
        self.path.pop();
    }

    /// Slash-joined path from the document root, for error messages.
    pub(crate) fn path(&self) -> String {
        self.path.join("/")
    }

    /// Handle a child element the model has no representation for. In
    /// lenient mode the element is skipped with a debug log; in strict mode
    /// this is a deserialization error.
    pub(crate) fn unrepresentable(&mut self, child: &XmlElement, detail: &str) -> Result<()> {
        match self.mode {
            ReadMode::Lenient => {
                tracing::debug!(
                    path = %self.path(),
                    element = %child.name,
                    "skipping {detail}",
                );
                Ok(())
            }
            ReadMode::Strict => Err(BomError::deserialization(
                format!("{}/{}", self.path(), child.name),
                format!("{detail} '{}'", child.name),
            )),
        }
    }

    /// Handle a child element not defined by the schema at this position.
    pub(crate) fn unknown(&mut self, child: &XmlElement) -> Result<()> {
        self.unrepresentable(child, "unknown element")
    }

    /// Police the attributes of the element the current path names: anything
    /// outside `known` is skipped with a debug log in lenient mode and a
    /// deserialization error in strict mode, mirroring [`Self::unknown`].
    pub(crate) fn unknown_attributes(&mut self, element: &XmlElement, known: &[&str]) -> Result<()> {
        for (name, _) in &element.attributes {
            if known.contains(&name.as_str()) {
                continue;
            }
            match self.mode {
                ReadMode::Lenient => {
                    tracing::debug!(
                        path = %self.path(),
                        attribute = %name,
                        "skipping unknown attribute",
                    );
                }
                ReadMode::Strict => {
                    return Err(BomError::deserialization(
                        format!("{}/@{name}", self.path()),
                        format!("unknown attribute '{name}'"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// As [`Self::unknown_attributes`], for a child element read in place
    /// (the current path names its parent).
    pub(crate) fn unknown_leaf_attributes(
        &mut self,
        element: &XmlElement,
        known: &[&str],
    ) -> Result<()> {
        self.push(element.name.clone());
        let result = self.unknown_attributes(element, known);
        self.pop();
        result
    }

    /// Text content of a leaf element that defines no attributes.
    pub(crate) fn leaf_text(&mut self, element: &XmlElement) -> Result<String> {
        self.unknown_leaf_attributes(element, &[])?;
        Ok(element.text().to_owned())
    }

    /// Decimal value of a leaf element that defines no attributes.
    pub(crate) fn leaf_f64(&mut self, element: &XmlElement) -> Result<f64> {
        self.unknown_leaf_attributes(element, &[])?;
        self.parse_f64(element)
    }

    /// Integer value of a leaf element that defines no attributes.
    pub(crate) fn leaf_i64(&mut self, element: &XmlElement) -> Result<i64> {
        self.unknown_leaf_attributes(element, &[])?;
        self.parse_i64(element)
    }

    /// Version number of a leaf element that defines no attributes.
    pub(crate) fn leaf_u32(&mut self, element: &XmlElement) -> Result<u32> {
        self.unknown_leaf_attributes(element, &[])?;
        self.parse_u32(element)
    }

    /// Boolean value of a leaf element that defines no attributes.
    pub(crate) fn leaf_bool(&mut self, element: &XmlElement) -> Result<bool> {
        self.unknown_leaf_attributes(element, &[])?;
        self.parse_bool(element)
    }

    /// Error for a required child element that is absent.
    pub(crate) fn missing(&self, name: &str) -> BomError {
        BomError::deserialization(self.path(), format!("missing required element '{name}'"))
    }

    /// Error for a mutually-exclusive group violation at the current path.
    pub(crate) fn choice_violation(&self, message: impl Into<String>) -> BomError {
        BomError::choice_violation(self.path(), message)
    }

    pub(crate) fn parse_f64(&self, element: &XmlElement) -> Result<f64> {
        element.text().parse().map_err(|_| {
            BomError::deserialization(
                format!("{}/{}", self.path(), element.name),
                format!("invalid decimal value '{}'", element.text()),
            )
        })
    }

    pub(crate) fn parse_i64(&self, element: &XmlElement) -> Result<i64> {
        element.text().parse().map_err(|_| {
            BomError::deserialization(
                format!("{}/{}", self.path(), element.name),
                format!("invalid integer value '{}'", element.text()),
            )
        })
    }

    pub(crate) fn parse_u32(&self, element: &XmlElement) -> Result<u32> {
        element.text().parse().map_err(|_| {
            BomError::deserialization(
                format!("{}/{}", self.path(), element.name),
                format!("invalid version number '{}'", element.text()),
            )
        })
    }

    pub(crate) fn parse_bool(&self, element: &XmlElement) -> Result<bool> {
        match element.text() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(BomError::deserialization(
                format!("{}/{}", self.path(), element.name),
                format!("invalid boolean value '{other}'"),
            )),
        }
    }
}

/// Render a float the way the schemas expect: plain decimal notation, no
/// trailing `.0` for whole numbers.
pub(crate) fn format_f64(value: f64) -> String {
    value.to_string()
}

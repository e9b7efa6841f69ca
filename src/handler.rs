//! High-level entry point for loading and saving BoM documents.

use crate::error::{BomError, Result};
use crate::model::Bom;
use crate::xml::{parse_bom, write_bom, ReadMode};
use std::fs;
use std::path::Path;

/// Loads and saves Eco BoM documents in any supported schema version.
///
/// The schema version is detected from the document on load and taken from
/// the tree's own version tag on save; the handler never converts between
/// versions. Construction is cheap and the handler holds no document state,
/// so one handler can be reused across documents.
///
/// ```
/// use granta_bom::{BomHandler, BomVersion};
///
/// # fn main() -> Result<(), granta_bom::BomError> {
/// let handler = BomHandler::new();
/// let text = r#"<PartsEco xmlns="http://www.grantadesign.com/23/01/BillOfMaterialsEco">
///   <Components/>
/// </PartsEco>"#;
/// let bom = handler.load_bom_from_text(text)?;
/// assert_eq!(bom.version(), BomVersion::Eco2301);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BomHandler {
    mode: ReadMode,
}

impl BomHandler {
    /// Create a handler with the default lenient read mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler with an explicit read mode.
    pub fn with_mode(mode: ReadMode) -> Self {
        Self { mode }
    }

    /// The configured read mode.
    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Parse a BoM from XML text, detecting the schema version from the
    /// root element's namespace.
    pub fn load_bom_from_text(&self, text: &str) -> Result<Bom> {
        let bom = parse_bom(text, self.mode)?;
        tracing::debug!(version = %bom.version(), "loaded BoM document");
        Ok(bom)
    }

    /// Read and parse a BoM document from a file.
    pub fn load_bom_from_file(&self, path: impl AsRef<Path>) -> Result<Bom> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| BomError::io(path, e))?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "read BoM file");
        self.load_bom_from_text(&text)
    }

    /// Serialize a BoM to an XML document string in the tree's own schema
    /// version.
    pub fn dump_bom(&self, bom: &Bom) -> Result<String> {
        write_bom(bom)
    }

    /// Serialize a BoM and write it to a file, replacing any existing
    /// content.
    pub fn dump_bom_to_file(&self, bom: &Bom, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.dump_bom(bom)?;
        fs::write(path, text.as_bytes()).map_err(|e| BomError::io(path, e))?;
        tracing::debug!(path = %path.display(), version = %bom.version(), "wrote BoM file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{eco2301, BomVersion};

    #[test]
    fn test_load_detects_version() {
        let handler = BomHandler::new();
        for version in BomVersion::ALL {
            let text = format!(
                r#"<PartsEco xmlns="{}"><Components/></PartsEco>"#,
                version.namespace()
            );
            let bom = handler.load_bom_from_text(&text).unwrap();
            assert_eq!(bom.version(), version);
        }
    }

    #[test]
    fn test_unsupported_namespace_is_rejected() {
        let handler = BomHandler::new();
        let text = r#"<PartsEco xmlns="http://www.grantadesign.com/17/11/BillOfMaterialsEco"/>"#;
        assert!(matches!(
            handler.load_bom_from_text(text),
            Err(BomError::UnsupportedSchema { .. })
        ));
    }

    #[test]
    fn test_dump_keeps_tree_version() {
        let handler = BomHandler::new();
        let bom = Bom::from(eco2301::BillOfMaterials::new(Vec::new()));
        let text = handler.dump_bom(&bom).unwrap();
        assert!(text.contains(BomVersion::Eco2301.namespace()));
        let reloaded = handler.load_bom_from_text(&text).unwrap();
        assert_eq!(reloaded.version(), BomVersion::Eco2301);
    }

    #[test]
    fn test_missing_file_error_carries_path() {
        let handler = BomHandler::new();
        match handler.load_bom_from_file("/no/such/bom.xml") {
            Err(BomError::Io { path, .. }) => {
                assert_eq!(path.as_deref(), Some(Path::new("/no/such/bom.xml")));
            }
            other => panic!("expected IO error, got {other:?}"),
        }
    }
}

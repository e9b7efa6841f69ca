//! **A library for building, reading and writing Granta MI Eco Bill of Materials documents.**
//!
//! `granta-bom` provides a typed object model for the Ansys Granta MI Eco BoM XML
//! schemas, a bidirectional namespace-aware codec, and builders for the record
//! references that tie BoM items back to records in an MI database.
//!
//! Three schema versions are supported, each with its own node model so that a
//! field introduced in a newer schema cannot leak into an older document:
//!
//! - **23/01** — the baseline schema.
//! - **24/12** — adds transport phases and locations to individual parts and
//!   processes.
//! - **25/05** — adds equivalent-reference lists to every record reference.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: The per-version node types ([`model::eco2301`],
//!   [`model::eco2412`], [`model::eco2505`]), the [`BomVersion`] tag, and the
//!   version-erased [`Bom`] enum returned by load operations.
//! - **[`reference`]**: [`RecordReference`](reference::RecordReference) and
//!   [`AttributeReference`](reference::AttributeReference), their staged
//!   builders, and the identification-priority resolution rule.
//! - **[`handler`]**: [`BomHandler`], the load/save entry point.
//!
//! ## Getting Started: Loading a BoM
//!
//! The schema version is detected from the document's namespace; the same
//! handler loads any supported version.
//!
//! ```
//! use granta_bom::{Bom, BomHandler, BomVersion};
//!
//! fn main() -> Result<(), granta_bom::BomError> {
//!     let text = r#"
//!         <PartsEco xmlns="http://www.grantadesign.com/23/01/BillOfMaterialsEco">
//!           <Components>
//!             <Part><PartNumber>PN-1234</PartNumber></Part>
//!           </Components>
//!         </PartsEco>"#;
//!
//!     let handler = BomHandler::new();
//!     let bom = handler.load_bom_from_text(text)?;
//!     assert_eq!(bom.version(), BomVersion::Eco2301);
//!
//!     if let Bom::Eco2301(tree) = &bom {
//!         assert_eq!(tree.components[0].part_number, "PN-1234");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Building a Record Reference
//!
//! References are assembled with a builder that enforces a single
//! identification strategy:
//!
//! ```
//! use granta_bom::reference::RecordReferenceBuilder;
//!
//! # fn main() -> Result<(), granta_bom::BomError> {
//! let reference = RecordReferenceBuilder::new()
//!     .with_database_key("MI_Restricted_Substances")
//!     .by_guid("2086f56a-4f4d-4850-9891-3d6ad155d1f9")?
//!     .build()?;
//! assert!(!reference.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Strict and Lenient Reading
//!
//! Documents may carry content this model has no representation for (for
//! example annotations). By default such content is skipped with a debug log;
//! [`ReadMode::Strict`] turns each skip into an error instead:
//!
//! ```
//! use granta_bom::{BomHandler, ReadMode};
//!
//! let strict = BomHandler::with_mode(ReadMode::Strict);
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // # Errors sections are not written for every fallible codec helper
    clippy::missing_errors_doc
)]

pub mod error;
pub mod handler;
pub mod model;
pub mod reference;
pub mod xml;

pub use error::{BomError, Result};
pub use handler::BomHandler;
pub use model::{Bom, BomVersion};
pub use xml::ReadMode;

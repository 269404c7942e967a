//! MXT Template Model
//!
//! Typed records for ISA-88 master templates.
//!
//! # Core Concepts
//!
//! - [`Document`]: a complete template, rooted at its PROCEDURE node
//! - [`Node`]: one structure node (PROCEDURE down to SUB_PHASE_STEP)
//! - [`DataCaptureStep`]: a leaf record for entry, sign-off or bookkeeping
//! - [`Element`]: tagged view over every record kind, for whole-tree passes
//! - [`ShapeFingerprint`]: Blake3 digest of a tree's structure
//!
//! Field names and enumerated strings follow the template wire format exactly.
//! Fields the model does not name are preserved verbatim in each record's
//! `extra` map.
//!
//! # Example
//!
//! ```rust,ignore
//! use mxt_model::Document;
//!
//! let doc = Document::from_json(&std::fs::read_to_string("baseline.mt")?)?;
//! for op in doc.operations() {
//!     println!("{} has {} phases", op.title, op.children.len());
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod wire;

mod capture;
mod document;
mod element;
mod fingerprint;
mod kinds;
mod level;
mod nulls;
mod node;

pub use capture::{ActionTrigger, DataCaptureStep, TriggerAction};
pub use document::{Document, DocumentError};
pub use element::{walk_json_objects, walk_json_objects_mut, Element, ElementMut};
pub use fingerprint::ShapeFingerprint;
pub use kinds::{
    ActionType, CaptureType, CorrectionType, NodeType, PrecisionMethod, SignOffType, TriggerType,
    TERMINAL_ORDER_NUMBER,
};
pub use level::Level;
pub use node::{MasterTemplateDetails, Node, StructureDisplay};

/// Identity-token field present on structure nodes only
pub const GLOBAL_SERIAL_ID: &str = "globalSerialId";

/// Identity-token field present on structure nodes and capture steps
pub const LOCAL_REFERENCE_ID: &str = "localReferenceId";

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

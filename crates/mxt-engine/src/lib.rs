//! MXT Template Engine
//!
//! Derives new master templates from a baseline by inserting a phase
//! described in a short free-form request.
//!
//! # Pipeline
//!
//! - [`intent`]: request to [`EditIntent`], or "not recognized"
//! - [`assembler`]: [`EditIntent`] to a complete PHASE subtree, built by
//!   [`factory`] with ids from [`ids`]
//! - [`splice`]: PHASE into its OPERATION, before the terminal review phase
//! - [`finalize`]: fresh identity tokens, generation suffixes
//! - [`validate`]: ISA-88 structural gate
//!
//! # Example
//!
//! ```rust,ignore
//! use mxt_engine::prelude::*;
//!
//! let baseline = Document::from_json(&text)?;
//! let outcome = mutate(&baseline, "add phase QC Check with witness and verify")?;
//! assert!(outcome.applied);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod assembler;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod finalize;
pub mod ids;
pub mod intent;
pub mod splice;
pub mod validate;

pub use assembler::{EntryKind, OperationContext, PhaseAssembler, PhaseFeatures};
pub use config::{CharLimit, EngineConfig};
pub use engine::{mutate, MutationOutcome, TemplateEngine};
pub use error::{ConfigError, InterpretError, MutationError};
pub use finalize::{Clock, FinalizeReport, Finalizer, FixedClock, SystemClock};
pub use ids::IdAllocator;
pub use intent::{interpret, EditIntent, Interpretation, OperationTarget};
pub use validate::{validate, ValidationReport};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        interpret, mutate, validate, EditIntent, EngineConfig, Interpretation, MutationError,
        MutationOutcome, OperationTarget, PhaseFeatures, TemplateEngine, ValidationReport,
    };
    pub use mxt_model::Document;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! ISA-88 structure levels
//!
//! The fixed chain is PROCEDURE → UNIT_PROCEDURE → OPERATION → PHASE →
//! PHASE_STEP → SUB_PHASE_STEP. A node's children always sit exactly one level
//! below it.

use crate::wire::wire_enum;

wire_enum! {
    /// Position of a structure node in the ISA-88 hierarchy
    pub enum Level {
        /// Root of a master template
        Procedure => "PROCEDURE",
        UnitProcedure => "UNIT_PROCEDURE",
        Operation => "OPERATION",
        Phase => "PHASE",
        PhaseStep => "PHASE_STEP",
        /// Leaf structure level (correction sub-steps live here)
        SubPhaseStep => "SUB_PHASE_STEP",
    }
}

impl Level {
    /// Levels in hierarchy order, root first
    pub const CHAIN: [Level; 6] = [
        Level::Procedure,
        Level::UnitProcedure,
        Level::Operation,
        Level::Phase,
        Level::PhaseStep,
        Level::SubPhaseStep,
    ];

    /// Level every child of a node at this level must have
    ///
    /// `None` for SUB_PHASE_STEP (no children allowed) and for unknown levels.
    #[must_use]
    pub fn child(&self) -> Option<Level> {
        match self {
            Level::Procedure => Some(Level::UnitProcedure),
            Level::UnitProcedure => Some(Level::Operation),
            Level::Operation => Some(Level::Phase),
            Level::Phase => Some(Level::PhaseStep),
            Level::PhaseStep => Some(Level::SubPhaseStep),
            Level::SubPhaseStep | Level::Other(_) => None,
        }
    }

    /// Zero-based depth in the chain
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        Self::CHAIN.iter().position(|level| level == self)
    }

    /// Check if this is a level the chain knows about
    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Level::Other(_))
    }
}

//! Phase assembly
//!
//! Composes factory records into one complete PHASE subtree. Ids are drawn in
//! a fixed order: the phase, then the data-entry branch (step, correction,
//! correction leaves, primary leaf with its trigger and action, sign-offs,
//! notes), then the iteration-review step and its leaves, then the phase's own
//! bookkeeping leaves.

use crate::error::MutationError;
use crate::factory::{self, Lineage};
use crate::ids::IdAllocator;
use mxt_model::{CaptureType, Document, Level, Node, SignOffType};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Order number of the data-entry step within its phase
const DATA_ENTRY_ORDER: u32 = 1;

/// Kind of primary entry on the data-entry step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// GENERAL_TEXT with a character-limit trigger
    Text,
    /// GENERAL_NUMERIC
    Numeric,
}

/// Options of a new phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseFeatures {
    pub witness: bool,
    pub verify: bool,
    pub notes: bool,
    pub review_by_exception: bool,
    /// Explicitly requested entry kind
    pub entry: Option<EntryKind>,
}

impl PhaseFeatures {
    /// Entry kind the phase will carry
    ///
    /// Sign-offs and notes live on the data-entry step, so requesting any of
    /// them implies a text entry when no kind was named.
    #[must_use]
    pub fn entry_kind(&self) -> Option<EntryKind> {
        self.entry.or_else(|| {
            (self.witness || self.verify || self.notes).then_some(EntryKind::Text)
        })
    }
}

/// Ancestry and ordering facts about the target OPERATION
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    pub master_template_id: u64,
    pub unit_procedure_id: u64,
    pub unit_procedure_order_number: u32,
    pub operation_id: u64,
    pub operation_order_number: u32,
    /// Order number the new phase will take
    pub phase_order_number: u32,
}

impl OperationContext {
    /// Gather context for the OPERATION with `operation_id`
    ///
    /// # Errors
    /// - `TargetNotFound` if no OPERATION has that id
    /// - `InvariantViolation` if the next phase order would reach
    ///   `terminal_order`
    pub fn resolve(
        document: &Document,
        operation_id: u64,
        terminal_order: u32,
    ) -> Result<Self, MutationError> {
        let root = document.root();
        let (unit_procedure, operation) = root
            .descendants_at(&Level::UnitProcedure)
            .into_iter()
            .find_map(|up| {
                up.children
                    .iter()
                    .find(|child| child.id == operation_id && child.level == Level::Operation)
                    .map(|op| (up, op))
            })
            .ok_or_else(|| {
                MutationError::TargetNotFound(format!("no OPERATION with id {operation_id}"))
            })?;

        let max_order = operation
            .children
            .iter()
            .filter(|c| c.level == Level::Phase && !c.is_terminal_review_phase_at(terminal_order))
            .filter_map(|c| c.phase_order_number)
            .filter(|&order| order < terminal_order)
            .max()
            .unwrap_or(0);
        let phase_order_number = max_order + 1;
        if phase_order_number >= terminal_order {
            return Err(MutationError::invariant(format!(
                "OPERATION {operation_id} has no phase order left below the reserved {terminal_order}"
            )));
        }

        Ok(Self {
            master_template_id: root.id,
            unit_procedure_id: unit_procedure.id,
            unit_procedure_order_number: operation
                .unit_procedure_order_number
                .or(unit_procedure.unit_procedure_order_number)
                .unwrap_or(1),
            operation_id,
            operation_order_number: operation.operation_order_number.unwrap_or(1),
            phase_order_number,
        })
    }

    fn lineage(&self, phase_id: u64) -> Lineage {
        Lineage {
            master_template_id: self.master_template_id,
            unit_procedure_id: self.unit_procedure_id,
            unit_procedure_order_number: self.unit_procedure_order_number,
            operation_id: self.operation_id,
            operation_order_number: self.operation_order_number,
            phase_id,
            phase_order_number: self.phase_order_number,
        }
    }
}

/// Builds PHASE subtrees for one edit
#[derive(Debug, Clone)]
pub struct PhaseAssembler {
    terminal_order: u32,
    char_limit: RangeInclusive<u32>,
}

impl PhaseAssembler {
    /// Create assembler with the reserved terminal order and text length range
    #[inline]
    #[must_use]
    pub fn new(terminal_order: u32, char_limit: RangeInclusive<u32>) -> Self {
        Self {
            terminal_order,
            char_limit,
        }
    }

    /// Build a complete PHASE titled `title`
    #[must_use]
    pub fn assemble(
        &self,
        title: &str,
        features: &PhaseFeatures,
        context: &OperationContext,
        ids: &mut IdAllocator,
    ) -> Node {
        let lineage = context.lineage(ids.next_id());
        let mut phase = factory::phase(&lineage, title);

        let data_entry = features
            .entry_kind()
            .map(|kind| self.data_entry_branch(title, kind, features, &lineage, ids));
        let review = self.iteration_review_branch(&lineage, ids);

        let phase_id = lineage.phase_id;
        phase.data_capture_steps = vec![
            factory::optional_step(ids.next_id(), phase_id, CaptureType::TrainingOverride),
            factory::primary_step(ids.next_id(), phase_id, CaptureType::PhaseCompleteButton, false),
            factory::optional_step(ids.next_id(), phase_id, CaptureType::PredecessorOverride),
            factory::primary_step(ids.next_id(), phase_id, CaptureType::StructureComplete, true),
        ];

        match data_entry {
            Some(step) => phase.children = vec![step, review],
            None => {
                phase.always_displayed_on_review_by_exception = features.review_by_exception;
                phase.children = vec![review];
            }
        }
        phase
    }

    fn data_entry_branch(
        &self,
        title: &str,
        kind: EntryKind,
        features: &PhaseFeatures,
        lineage: &Lineage,
        ids: &mut IdAllocator,
    ) -> Node {
        let step_id = ids.next_id();
        let mut step = factory::data_entry_step(step_id, lineage, title, DATA_ENTRY_ORDER);
        step.always_displayed_on_review_by_exception = features.review_by_exception;

        let mut correction =
            factory::correction_sub_step(ids.next_id(), lineage, step_id, DATA_ENTRY_ORDER);
        let correction_id = correction.id;
        correction.data_capture_steps = [
            CaptureType::CorrectionStart,
            CaptureType::CorrectionEnd,
            CaptureType::CorrectionCancel,
        ]
        .into_iter()
        .map(|marker| factory::optional_step(ids.next_id(), correction_id, marker))
        .collect();
        step.children.push(correction);

        let primary = match kind {
            EntryKind::Text => {
                let entry_id = ids.next_id();
                let trigger_id = ids.next_id();
                let action_id = ids.next_id();
                let trigger = factory::character_limit_trigger(
                    trigger_id,
                    entry_id,
                    action_id,
                    self.char_limit.clone(),
                );
                factory::general_text(entry_id, step_id, trigger)
            }
            EntryKind::Numeric => factory::general_numeric(ids.next_id(), step_id),
        };
        step.data_capture_steps.push(primary);

        if features.witness {
            step.data_capture_steps
                .push(factory::sign_off(ids.next_id(), step_id, SignOffType::Witness));
        }
        if features.verify {
            step.data_capture_steps
                .push(factory::sign_off(ids.next_id(), step_id, SignOffType::Verify));
        }
        if features.notes {
            step.data_capture_steps
                .push(factory::notes(ids.next_id(), step_id));
        }
        step
    }

    fn iteration_review_branch(&self, lineage: &Lineage, ids: &mut IdAllocator) -> Node {
        let review_id = ids.next_id();
        let mut review = factory::iteration_review_step(review_id, lineage, self.terminal_order);
        review.data_capture_steps = vec![
            factory::capture_step(ids.next_id(), review_id, CaptureType::IterationReadyForReview),
            factory::primary_step(ids.next_id(), review_id, CaptureType::IterationComplete, true),
        ];
        review
    }
}

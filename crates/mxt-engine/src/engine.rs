//! Template engine
//!
//! Runs one edit end to end:
//! 1. Check baseline preconditions
//! 2. Interpret the request
//! 3. Assemble and splice the new phase into a clone of the baseline
//! 4. Finalize identity tokens and generation suffixes
//! 5. Gate the result through the structural validator
//!
//! The baseline is never modified. A failed edit drops its clone.

use crate::assembler::{OperationContext, PhaseAssembler};
use crate::config::EngineConfig;
use crate::error::MutationError;
use crate::finalize::{Clock, FinalizeReport, Finalizer};
use crate::ids::{duplicate_ids, IdAllocator};
use crate::intent::{interpret, EditIntent, Interpretation};
use crate::splice::{resolve_operation, splice};
use crate::validate::validate;
use mxt_model::Document;
use std::sync::Arc;

/// Result of one edit
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// Finalized copy of the baseline, edited when `applied`
    pub document: Document,
    /// Whether a structural edit was made
    pub applied: bool,
    /// Human-readable summary
    pub message: String,
    /// Intent that was applied
    pub intent: Option<EditIntent>,
    /// Id of the inserted PHASE
    pub inserted_phase_id: Option<u64>,
    /// Token and suffix changes
    pub finalize: FinalizeReport,
}

/// The template mutation engine
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    config: EngineConfig,
    assembler: PhaseAssembler,
    finalizer: Finalizer,
}

impl TemplateEngine {
    /// Create engine with the given configuration
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let finalizer = Finalizer::new(&config);
        Self::assemble_parts(config, finalizer)
    }

    /// Create engine with an explicit generation clock
    #[must_use]
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let finalizer = Finalizer::with_clock(&config, clock);
        Self::assemble_parts(config, finalizer)
    }

    fn assemble_parts(config: EngineConfig, finalizer: Finalizer) -> Self {
        Self {
            assembler: PhaseAssembler::new(config.terminal_order, config.char_limit.range()),
            config,
            finalizer,
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Interpret `instruction` and apply it to a copy of `baseline`
    ///
    /// An instruction that names no supported edit is not an error: the
    /// outcome has `applied == false` and still carries a finalized copy.
    ///
    /// # Errors
    /// - `MalformedInstruction` if a phase-creation phrase has no title
    /// - `TargetNotFound` if the named OPERATION does not exist
    /// - `InvariantViolation` if the baseline breaks a structural precondition
    /// - `ValidationFailed` if the result does not pass the structural gate
    pub fn mutate(
        &self,
        baseline: &Document,
        instruction: &str,
    ) -> Result<MutationOutcome, MutationError> {
        tracing::info!("Mutating {:?} with request {:?}", baseline.title(), instruction);
        self.check_baseline(baseline)?;

        match interpret(instruction)? {
            Interpretation::Recognized(intent) => self.apply_checked(baseline, intent),
            Interpretation::Unrecognized(reason) => {
                tracing::info!("Request not recognized: {}", reason);
                let mut document = baseline.clone();
                let finalize = self.finish(&mut document)?;
                Ok(MutationOutcome {
                    document,
                    applied: false,
                    message: reason,
                    intent: None,
                    inserted_phase_id: None,
                    finalize,
                })
            }
        }
    }

    /// Apply an already-interpreted intent to a copy of `baseline`
    ///
    /// # Errors
    /// As [`TemplateEngine::mutate`], except `MalformedInstruction`
    pub fn apply(
        &self,
        baseline: &Document,
        intent: EditIntent,
    ) -> Result<MutationOutcome, MutationError> {
        self.check_baseline(baseline)?;
        self.apply_checked(baseline, intent)
    }

    fn apply_checked(
        &self,
        baseline: &Document,
        intent: EditIntent,
    ) -> Result<MutationOutcome, MutationError> {
        let terminal_order = self.config.terminal_order;
        let mut document = baseline.clone();

        let operation_id = resolve_operation(&document, &intent.target)?;
        let context = OperationContext::resolve(&document, operation_id, terminal_order)?;
        let mut ids = IdAllocator::seeded_from(&document);
        let phase = self
            .assembler
            .assemble(&intent.title, &intent.features, &context, &mut ids);
        let phase_id = phase.id;
        let index = splice(&mut document, operation_id, phase, terminal_order)?;

        let finalize = self.finish(&mut document)?;
        let message = format!(
            "Added phase {:?} (id {}, order {}) to OPERATION {} at position {}",
            intent.title, phase_id, context.phase_order_number, operation_id, index
        );
        tracing::info!("{}", message);

        Ok(MutationOutcome {
            document,
            applied: true,
            message,
            intent: Some(intent),
            inserted_phase_id: Some(phase_id),
            finalize,
        })
    }

    fn check_baseline(&self, baseline: &Document) -> Result<(), MutationError> {
        if !self.config.require_unique_ids {
            return Ok(());
        }
        let duplicates = duplicate_ids(baseline);
        if duplicates.is_empty() {
            return Ok(());
        }
        tracing::warn!("Baseline has duplicate numeric ids: {:?}", duplicates);
        Err(MutationError::invariant(format!(
            "baseline contains duplicate numeric ids: {duplicates:?}"
        )))
    }

    fn finish(&self, document: &mut Document) -> Result<FinalizeReport, MutationError> {
        let report = self.finalizer.finalize(document);
        if self.config.validate_output {
            let validation = validate(document);
            if !validation.valid {
                tracing::error!("Output failed validation: {:?}", validation.errors);
                return Err(MutationError::ValidationFailed {
                    errors: validation.errors,
                });
            }
        }
        Ok(report)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Apply `instruction` to a copy of `baseline` with the default engine
///
/// # Errors
/// See [`TemplateEngine::mutate`]
pub fn mutate(baseline: &Document, instruction: &str) -> Result<MutationOutcome, MutationError> {
    TemplateEngine::default().mutate(baseline, instruction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finalize::FixedClock;
    use chrono::{TimeZone, Utc};
    use mxt_test_utils::BaselineBuilder;

    fn engine() -> TemplateEngine {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        TemplateEngine::with_clock(EngineConfig::default(), Arc::new(clock))
    }

    #[test]
    fn applied_edit_reports_phase() {
        let baseline = BaselineBuilder::new().build();
        let outcome = engine().mutate(&baseline, "add phase QC with witness").unwrap();

        assert!(outcome.applied);
        let phase_id = outcome.inserted_phase_id.unwrap();
        assert!(outcome.document.find(phase_id).is_some());
        assert!(outcome.message.contains("\"QC\""));
        assert_eq!(outcome.intent.map(|i| i.title), Some("QC".to_string()));
    }

    #[test]
    fn baseline_is_untouched() {
        let baseline = BaselineBuilder::new().build();
        let copy = baseline.clone();
        engine().mutate(&baseline, "add phase QC").unwrap();
        assert_eq!(baseline, copy);
    }

    #[test]
    fn duplicate_ids_rejected_unless_disabled() {
        let mut baseline = BaselineBuilder::new().build();
        let dup = baseline.operations()[0].id;
        baseline
            .root_mut()
            .extra
            .insert("mirror".into(), serde_json::json!({"id": dup}));

        assert!(matches!(
            engine().mutate(&baseline, "add phase QC"),
            Err(MutationError::InvariantViolation(_))
        ));

        let lenient = TemplateEngine::new(EngineConfig::default().with_unique_ids_required(false));
        assert!(lenient.mutate(&baseline, "add phase QC").unwrap().applied);
    }

    #[test]
    fn invalid_baseline_fails_gate_unless_disabled() {
        let mut baseline = BaselineBuilder::new().build();
        baseline.root_mut().master_template_details = None;

        let result = engine().mutate(&baseline, "nothing to do");
        assert!(matches!(result, Err(MutationError::ValidationFailed { .. })));

        let ungated = TemplateEngine::new(EngineConfig::default().with_validation(false));
        assert!(!ungated.mutate(&baseline, "nothing to do").unwrap().applied);
    }

    #[test]
    fn malformed_instruction_is_error() {
        let baseline = BaselineBuilder::new().build();
        assert!(matches!(
            engine().mutate(&baseline, "add phase"),
            Err(MutationError::MalformedInstruction(_))
        ));
    }
}

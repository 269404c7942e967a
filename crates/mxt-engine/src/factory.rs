//! Node factory
//!
//! One constructor per record kind. Every schema field is written explicitly,
//! so a consuming system that requires the full field set sees no gaps. Ids are
//! supplied by the caller; identity tokens are minted here.

use crate::ids::mint_token;
use mxt_model::{
    ActionTrigger, ActionType, CaptureType, CorrectionType, DataCaptureStep, Level, Node,
    NodeType, PrecisionMethod, SignOffType, StructureDisplay, TriggerAction, TriggerType,
};
use serde_json::{Map, Number};
use std::ops::RangeInclusive;

/// Label shown next to the character-limit trigger of a text entry
pub const CHARACTER_LIMIT_LABEL: &str = "Character Limit: ";

/// Ancestry shared by every node of one new phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lineage {
    pub master_template_id: u64,
    pub unit_procedure_id: u64,
    pub unit_procedure_order_number: u32,
    pub operation_id: u64,
    pub operation_order_number: u32,
    pub phase_id: u64,
    pub phase_order_number: u32,
}

fn base_node(id: u64, title: String, level: Level, node_type: NodeType, lineage: &Lineage) -> Node {
    Node {
        id,
        global_serial_id: mint_token(),
        local_reference_id: mint_token(),
        title,
        repeatable: false,
        not_applicable_configured: false,
        always_displayed_on_review_by_exception: false,
        node_type,
        correction_type: None,
        master_template_id: Some(lineage.master_template_id),
        unit_procedure_id: Some(lineage.unit_procedure_id),
        operation_id: Some(lineage.operation_id),
        phase_id: Some(lineage.phase_id),
        phase_step_id: None,
        unit_procedure_order_number: Some(lineage.unit_procedure_order_number),
        operation_order_number: Some(lineage.operation_order_number),
        phase_order_number: Some(lineage.phase_order_number),
        phase_step_order_number: None,
        parent_id: None,
        level,
        children: Vec::new(),
        simplified_navigation_role_ids: Vec::new(),
        structure_roles: Vec::new(),
        instruction_parts: Vec::new(),
        structure_display: None,
        received_data_projections: Vec::new(),
        projected_data_projections: Vec::new(),
        data_capture_steps: Vec::new(),
        api_columns: Vec::new(),
        logbook_template_ids: Vec::new(),
        tags: Vec::new(),
        product_structures: Vec::new(),
        template_table_entities: Vec::new(),
        sub_template: false,
        configuration_group_placeholder: false,
        temporary_change_structure: false,
        option_structure: false,
        simplified_navigation_roles: Vec::new(),
        is_sub_template: false,
        master_template_details: None,
        extra: Map::new(),
    }
}

/// PHASE node under the lineage's OPERATION
///
/// `id` must equal `lineage.phase_id`.
#[must_use]
pub fn phase(lineage: &Lineage, title: &str) -> Node {
    let mut node = base_node(
        lineage.phase_id,
        title.to_string(),
        Level::Phase,
        NodeType::Parent,
        lineage,
    );
    node.parent_id = Some(lineage.operation_id);
    node
}

/// DATA_ENTRY PHASE_STEP, displayed at its own position
#[must_use]
pub fn data_entry_step(id: u64, lineage: &Lineage, title: &str, order: u32) -> Node {
    let mut node = base_node(
        id,
        title.to_string(),
        Level::PhaseStep,
        NodeType::DataEntry,
        lineage,
    );
    node.phase_step_id = Some(id);
    node.phase_step_order_number = Some(order);
    node.parent_id = Some(lineage.phase_id);
    node.structure_display = Some(StructureDisplay {
        structure_id: id,
        display_order_number: order,
    });
    node
}

/// CORRECTION SUB_PHASE_STEP under a data-entry step
#[must_use]
pub fn correction_sub_step(id: u64, lineage: &Lineage, step_id: u64, step_order: u32) -> Node {
    let mut node = base_node(
        id,
        String::new(),
        Level::SubPhaseStep,
        NodeType::Correction,
        lineage,
    );
    node.correction_type = Some(CorrectionType::PrimaryDataEntry);
    node.phase_step_id = Some(step_id);
    node.phase_step_order_number = Some(step_order);
    node.parent_id = Some(step_id);
    node
}

/// ITERATION_REVIEW PHASE_STEP closing a phase
#[must_use]
pub fn iteration_review_step(id: u64, lineage: &Lineage, terminal_order: u32) -> Node {
    let mut node = base_node(
        id,
        String::new(),
        Level::PhaseStep,
        NodeType::IterationReview,
        lineage,
    );
    node.phase_step_id = Some(id);
    node.phase_step_order_number = Some(terminal_order);
    node.parent_id = Some(lineage.phase_id);
    node
}

/// Capture step of any kind with every flag at its default
#[must_use]
pub fn capture_step(id: u64, structure_id: u64, step_type: CaptureType) -> DataCaptureStep {
    DataCaptureStep {
        id,
        local_reference_id: mint_token(),
        structure_id,
        step_type,
        sign_off_type: None,
        all_values_current: false,
        auto_captured: false,
        optional_step: false,
        configuration_group: false,
        append_to_product_id: false,
        replace_default_quantity: false,
        primary_step: false,
        attached_to_table_cell: false,
        unique_sign_off_required: None,
        multi_iteration_sign_off_allowed: None,
        data_capture_roles: Vec::new(),
        notification_role_ids: Vec::new(),
        action_triggers: Vec::new(),
        received_data_projections: Vec::new(),
        projected_data_projections: Vec::new(),
        auto_na_enabled: false,
        temporary_change: false,
        header_step: None,
        suggested_entries: None,
        link_production_record_configured: None,
        qr_included_in_general_text: None,
        decimal_precision: None,
        min_decimal_precision: None,
        precision_method: None,
        display_precision: None,
        scientific_notation: None,
        scientific_notation_exponent: None,
        measure_included_in_general_numeric: None,
        data_capture_step_notifications: Vec::new(),
        extra: Map::new(),
    }
}

/// Optional bookkeeping step (overrides, correction markers)
#[must_use]
pub fn optional_step(id: u64, structure_id: u64, step_type: CaptureType) -> DataCaptureStep {
    DataCaptureStep {
        optional_step: true,
        ..capture_step(id, structure_id, step_type)
    }
}

/// Primary bookkeeping step, optionally captured by the system
#[must_use]
pub fn primary_step(
    id: u64,
    structure_id: u64,
    step_type: CaptureType,
    auto_captured: bool,
) -> DataCaptureStep {
    DataCaptureStep {
        primary_step: true,
        auto_captured,
        ..capture_step(id, structure_id, step_type)
    }
}

/// WITNESS or VERIFY sign-off; only VERIFY requires a distinct signer
#[must_use]
pub fn sign_off(id: u64, structure_id: u64, kind: SignOffType) -> DataCaptureStep {
    let unique = kind == SignOffType::Verify;
    DataCaptureStep {
        sign_off_type: Some(kind),
        unique_sign_off_required: Some(unique),
        multi_iteration_sign_off_allowed: Some(false),
        ..capture_step(id, structure_id, CaptureType::SignOff)
    }
}

/// Optional NOTES step, always showing current values
#[must_use]
pub fn notes(id: u64, structure_id: u64) -> DataCaptureStep {
    DataCaptureStep {
        all_values_current: true,
        ..optional_step(id, structure_id, CaptureType::Notes)
    }
}

/// Primary GENERAL_TEXT entry carrying the given validation trigger
#[must_use]
pub fn general_text(id: u64, structure_id: u64, trigger: ActionTrigger) -> DataCaptureStep {
    DataCaptureStep {
        primary_step: true,
        action_triggers: vec![trigger],
        header_step: Some(false),
        suggested_entries: Some(Vec::new()),
        link_production_record_configured: Some(false),
        qr_included_in_general_text: Some(false),
        ..capture_step(id, structure_id, CaptureType::GeneralText)
    }
}

/// Primary GENERAL_NUMERIC entry with full precision, rounding down
#[must_use]
pub fn general_numeric(id: u64, structure_id: u64) -> DataCaptureStep {
    DataCaptureStep {
        primary_step: true,
        decimal_precision: Some(16),
        min_decimal_precision: Some(0),
        precision_method: Some(PrecisionMethod::Down),
        display_precision: Some(false),
        scientific_notation: Some(false),
        scientific_notation_exponent: Some(0),
        measure_included_in_general_numeric: Some(false),
        ..capture_step(id, structure_id, CaptureType::GeneralNumeric)
    }
}

/// Out-of-range trigger rejecting text whose length falls outside `limit`
#[must_use]
pub fn character_limit_trigger(
    id: u64,
    step_id: u64,
    action_id: u64,
    limit: RangeInclusive<u32>,
) -> ActionTrigger {
    ActionTrigger {
        id,
        data_capture_step_id: step_id,
        displayed_on_interface: true,
        label: Some(CHARACTER_LIMIT_LABEL.to_string()),
        minimum_value: Some(Number::from(*limit.start())),
        minimum_value_precision: Some(0),
        maximum_value: Some(Number::from(*limit.end())),
        maximum_value_precision: Some(0),
        tolerance_percent_configured: false,
        trigger_type: TriggerType::OutOfNumericRange,
        actions: vec![TriggerAction {
            id: action_id,
            step_action_trigger_id: id,
            action_type: ActionType::Reject,
            extra: Map::new(),
        }],
        notifications: Vec::new(),
        not_applicable_structures: Vec::new(),
        extra: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lineage() -> Lineage {
        Lineage {
            master_template_id: 1,
            unit_procedure_id: 2,
            unit_procedure_order_number: 1,
            operation_id: 3,
            operation_order_number: 2,
            phase_id: 50,
            phase_order_number: 4,
        }
    }

    #[test]
    fn phase_links_to_operation() {
        let node = phase(&lineage(), "QC");
        assert_eq!(node.id, 50);
        assert_eq!(node.phase_id, Some(50));
        assert_eq!(node.parent_id, Some(3));
        assert_eq!(node.operation_order_number, Some(2));
        assert_eq!(node.level, Level::Phase);
        assert!(!node.global_serial_id.is_empty());
        assert_ne!(node.global_serial_id, node.local_reference_id);
    }

    #[test]
    fn data_entry_displays_at_itself() {
        let node = data_entry_step(51, &lineage(), "QC", 1);
        assert_eq!(
            node.structure_display,
            Some(StructureDisplay {
                structure_id: 51,
                display_order_number: 1
            })
        );
        assert_eq!(node.phase_step_id, Some(51));
        assert_eq!(node.parent_id, Some(50));
    }

    #[test]
    fn correction_points_at_its_step() {
        let node = correction_sub_step(52, &lineage(), 51, 1);
        assert_eq!(node.correction_type, Some(CorrectionType::PrimaryDataEntry));
        assert_eq!(node.parent_id, Some(51));
        assert_eq!(node.phase_step_id, Some(51));
        assert!(node.title.is_empty());
    }

    #[test]
    fn sign_off_uniqueness_depends_on_kind() {
        let witness = sign_off(1, 9, SignOffType::Witness);
        let verify = sign_off(2, 9, SignOffType::Verify);
        assert_eq!(witness.unique_sign_off_required, Some(false));
        assert_eq!(verify.unique_sign_off_required, Some(true));
        assert_eq!(witness.multi_iteration_sign_off_allowed, Some(false));
        assert_eq!(verify.multi_iteration_sign_off_allowed, Some(false));
    }

    #[test]
    fn text_entry_serializes_full_field_set() {
        let trigger = character_limit_trigger(11, 10, 12, 1..=120);
        let step = general_text(10, 9, trigger);
        let out = serde_json::to_value(&step).unwrap();

        assert_eq!(out["type"], "GENERAL_TEXT");
        assert_eq!(out["primaryStep"], true);
        assert_eq!(out["suggestedEntries"], json!([]));
        assert_eq!(out["headerStep"], false);
        let trigger = &out["actionTriggers"][0];
        assert_eq!(trigger["label"], "Character Limit: ");
        assert_eq!(trigger["minimumValue"], 1);
        assert_eq!(trigger["maximumValue"], 120);
        assert_eq!(trigger["triggerType"], "OUT_OF_NUMERIC_RANGE");
        assert_eq!(trigger["actions"][0], json!({"id": 12, "stepActionTriggerId": 11, "type": "REJECT"}));
        assert!(out.get("signOffType").is_none());
    }

    #[test]
    fn numeric_entry_defaults() {
        let step = general_numeric(10, 9);
        assert_eq!(step.decimal_precision, Some(16));
        assert_eq!(step.min_decimal_precision, Some(0));
        assert_eq!(step.precision_method, Some(PrecisionMethod::Down));
        assert_eq!(step.scientific_notation_exponent, Some(0));
        assert!(step.action_triggers.is_empty());
    }

    #[test]
    fn bookkeeping_flags() {
        assert!(notes(1, 2).all_values_current);
        assert!(notes(1, 2).optional_step);
        let complete = primary_step(3, 2, CaptureType::StructureComplete, true);
        assert!(complete.primary_step && complete.auto_captured);
        assert!(optional_step(4, 2, CaptureType::CorrectionStart).optional_step);
    }
}

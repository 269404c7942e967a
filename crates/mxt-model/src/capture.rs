//! Data capture steps
//!
//! Leaf records attached to a structure node's `dataCaptureSteps` sequence.
//! A capture step has no children; its `structureId` points back at the
//! owning node.

use crate::kinds::{ActionType, CaptureType, PrecisionMethod, SignOffType, TriggerType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One unit of data entry, sign-off or bookkeeping behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCaptureStep {
    pub id: u64,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub local_reference_id: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub structure_id: u64,
    #[serde(rename = "type")]
    pub step_type: CaptureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_off_type: Option<SignOffType>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub all_values_current: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub auto_captured: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub optional_step: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub configuration_group: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub append_to_product_id: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub replace_default_quantity: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub primary_step: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub attached_to_table_cell: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_sign_off_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_iteration_sign_off_allowed: Option<bool>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub data_capture_roles: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub notification_role_ids: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub action_triggers: Vec<ActionTrigger>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub received_data_projections: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub projected_data_projections: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub auto_na_enabled: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub temporary_change: bool,

    // GENERAL_TEXT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_step: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_entries: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_production_record_configured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_included_in_general_text: Option<bool>,

    // GENERAL_NUMERIC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_decimal_precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision_method: Option<PrecisionMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_precision: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_notation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_notation_exponent: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure_included_in_general_numeric: Option<bool>,

    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub data_capture_step_notifications: Vec<Value>,

    /// Fields this model does not name, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataCaptureStep {
    /// Check if this step is a sign-off of the given flavour
    #[inline]
    #[must_use]
    pub fn is_sign_off(&self, kind: &SignOffType) -> bool {
        self.step_type == CaptureType::SignOff && self.sign_off_type.as_ref() == Some(kind)
    }
}

/// Validation trigger attached to a capture step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionTrigger {
    pub id: u64,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub data_capture_step_id: u64,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub displayed_on_interface: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_value: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_value_precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_value: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_value_precision: Option<u32>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub tolerance_percent_configured: bool,
    pub trigger_type: TriggerType,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub actions: Vec<TriggerAction>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub notifications: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub not_applicable_structures: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Action fired by an [`ActionTrigger`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAction {
    pub id: u64,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub step_action_trigger_id: u64,
    #[serde(rename = "type")]
    pub action_type: ActionType,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

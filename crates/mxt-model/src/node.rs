//! Structure nodes
//!
//! A [`Node`] is one element of the ISA-88 tree. It owns its `children` and its
//! `dataCaptureSteps`; `parentId` is a plain back-reference.

use crate::capture::DataCaptureStep;
use crate::kinds::{CorrectionType, NodeType, TERMINAL_ORDER_NUMBER};
use crate::level::Level;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structure node at any level of the hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: u64,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub global_serial_id: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub local_reference_id: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub repeatable: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub not_applicable_configured: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub always_displayed_on_review_by_exception: bool,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction_type: Option<CorrectionType>,

    // Ancestry references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_template_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_procedure_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_step_id: Option<u64>,

    // Sibling ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_procedure_order_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_order_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_order_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_step_order_number: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    pub level: Level,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub children: Vec<Node>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub simplified_navigation_role_ids: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub structure_roles: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub instruction_parts: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_display: Option<StructureDisplay>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub received_data_projections: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub projected_data_projections: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub data_capture_steps: Vec<DataCaptureStep>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub api_columns: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub logbook_template_ids: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub tags: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub product_structures: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub template_table_entities: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub sub_template: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub configuration_group_placeholder: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub temporary_change_structure: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub option_structure: bool,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub simplified_navigation_roles: Vec<Value>,
    #[serde(default, deserialize_with = "crate::wire::null_as_default")]
    pub is_sub_template: bool,

    /// Present on the PROCEDURE root only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_template_details: Option<MasterTemplateDetails>,

    /// Fields this model does not name, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Display placement of a data-entry step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureDisplay {
    pub structure_id: u64,
    pub display_order_number: u32,
}

/// Document-level metadata carried by the root
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterTemplateDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Check if this node is the reserved terminal review phase of an operation
    ///
    /// Matches on the ITERATION_REVIEW type or the reserved order number.
    #[must_use]
    pub fn is_terminal_review_phase(&self) -> bool {
        self.is_terminal_review_phase_at(TERMINAL_ORDER_NUMBER)
    }

    /// [`Node::is_terminal_review_phase`] with a non-default reserved order
    #[must_use]
    pub fn is_terminal_review_phase_at(&self, reserved_order: u32) -> bool {
        self.level == Level::Phase
            && (self.node_type == NodeType::IterationReview
                || self.phase_order_number == Some(reserved_order))
    }

    /// Check if this node is the terminal ITERATION_REVIEW step of a phase
    #[must_use]
    pub fn is_iteration_review_step(&self) -> bool {
        self.level == Level::PhaseStep && self.node_type == NodeType::IterationReview
    }

    /// Find a node by numeric id anywhere in this subtree (pre-order)
    #[must_use]
    pub fn find(&self, id: u64) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`Node::find`]
    pub fn find_mut(&mut self, id: u64) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// All nodes of the given level in this subtree, in document order
    #[must_use]
    pub fn descendants_at(&self, level: &Level) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_at(level, &mut found);
        found
    }

    fn collect_at<'a>(&'a self, level: &Level, found: &mut Vec<&'a Node>) {
        if &self.level == level {
            found.push(self);
        }
        for child in &self.children {
            child.collect_at(level, found);
        }
    }

    /// Number of nodes in this subtree, including self
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

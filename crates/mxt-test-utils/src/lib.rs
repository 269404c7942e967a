//! Testing utilities for MXT workspace
//!
//! Shared baseline fixtures and token helpers.

#![allow(missing_docs)]

use mxt_model::{walk_json_objects, Document, GLOBAL_SERIAL_ID, LOCAL_REFERENCE_ID};
use serde_json::{json, Value};

/// Small realistic baseline as stored in a template library
pub const BASELINE_SIMPLE: &str = include_str!("../fixtures/baseline-simple.mt");

pub fn baseline_simple() -> Document {
    Document::from_json(BASELINE_SIMPLE).unwrap()
}

/// Builds minimal valid baselines:
/// PROCEDURE → UNIT_PROCEDURE → one or more OPERATIONs, each holding
/// `[Phase A (order 1), Review (order 1000)]`
#[derive(Debug, Clone)]
pub struct BaselineBuilder {
    title: String,
    product_id: Option<String>,
    operations: Vec<String>,
    phase_order: u32,
    terminal_phase: bool,
}

impl Default for BaselineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BaselineBuilder {
    pub fn new() -> Self {
        Self {
            title: "Baseline Procedure".to_string(),
            product_id: Some("PRD-100".to_string()),
            operations: vec!["Manufacturing".to_string()],
            phase_order: 1,
            terminal_phase: true,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_product_id(mut self, product_id: Option<&str>) -> Self {
        self.product_id = product_id.map(str::to_string);
        self
    }

    /// Append another OPERATION after the existing ones
    pub fn with_operation(mut self, title: &str) -> Self {
        self.operations.push(title.to_string());
        self
    }

    /// Order number of each OPERATION's ordinary phase
    pub fn with_phase_order(mut self, order: u32) -> Self {
        self.phase_order = order;
        self
    }

    /// Leave out the terminal review phase of every OPERATION
    pub fn without_terminal_phase(mut self) -> Self {
        self.terminal_phase = false;
        self
    }

    pub fn build(self) -> Document {
        serde_json::from_value(self.build_value()).unwrap()
    }

    pub fn build_value(self) -> Value {
        let mut next = 0_u64;
        let mut id = || {
            next += 1;
            next
        };

        let root_id = id();
        let up_id = id();
        let mut operations = Vec::new();
        for (index, title) in self.operations.iter().enumerate() {
            let op_id = id();
            let order = u32::try_from(index + 1).unwrap();
            let ids = (root_id, up_id, op_id);
            let mut phases = vec![phase(&mut id, ids, "Phase A", "PARENT", self.phase_order)];
            if self.terminal_phase {
                phases.push(phase(&mut id, ids, "Review", "ITERATION_REVIEW", 1000));
            }
            operations.push(json!({
                "id": op_id,
                "globalSerialId": format!("g-{op_id}"),
                "localReferenceId": format!("l-{op_id}"),
                "title": title,
                "type": "PARENT",
                "masterTemplateId": root_id,
                "unitProcedureId": up_id,
                "operationId": op_id,
                "unitProcedureOrderNumber": 1,
                "operationOrderNumber": order,
                "parentId": up_id,
                "level": "OPERATION",
                "children": phases,
            }));
        }

        let mut details = json!({"revision": "A"});
        if let Some(product_id) = self.product_id {
            details["productId"] = json!(product_id);
        }

        json!({
            "id": root_id,
            "globalSerialId": format!("g-{root_id}"),
            "localReferenceId": format!("l-{root_id}"),
            "title": self.title,
            "type": "PARENT",
            "level": "PROCEDURE",
            "masterTemplateDetails": details,
            "children": [{
                "id": up_id,
                "globalSerialId": format!("g-{up_id}"),
                "localReferenceId": format!("l-{up_id}"),
                "title": "Unit Procedure 1",
                "type": "PARENT",
                "masterTemplateId": root_id,
                "unitProcedureId": up_id,
                "unitProcedureOrderNumber": 1,
                "parentId": root_id,
                "level": "UNIT_PROCEDURE",
                "children": operations,
            }],
        })
    }
}

fn step(id: u64, structure_id: u64, step_type: &str, primary: bool) -> Value {
    json!({
        "id": id,
        "localReferenceId": format!("s-{id}"),
        "structureId": structure_id,
        "type": step_type,
        "primaryStep": primary,
    })
}

fn phase(
    id: &mut impl FnMut() -> u64,
    (root_id, up_id, op_id): (u64, u64, u64),
    title: &str,
    phase_type: &str,
    order: u32,
) -> Value {
    let phase_id = id();
    let review_id = id();
    let review_steps = vec![
        step(id(), review_id, "ITERATION_READY_FOR_REVIEW", false),
        step(id(), review_id, "ITERATION_COMPLETE", true),
    ];
    let phase_steps = vec![
        step(id(), phase_id, "PHASE_COMPLETE_BUTTON", true),
        step(id(), phase_id, "STRUCTURE_COMPLETE", true),
    ];
    json!({
        "id": phase_id,
        "globalSerialId": format!("g-{phase_id}"),
        "localReferenceId": format!("l-{phase_id}"),
        "title": title,
        "type": phase_type,
        "masterTemplateId": root_id,
        "unitProcedureId": up_id,
        "operationId": op_id,
        "phaseId": phase_id,
        "phaseOrderNumber": order,
        "parentId": op_id,
        "level": "PHASE",
        "dataCaptureSteps": phase_steps,
        "children": [{
            "id": review_id,
            "globalSerialId": format!("g-{review_id}"),
            "localReferenceId": format!("l-{review_id}"),
            "title": "",
            "type": "ITERATION_REVIEW",
            "operationId": op_id,
            "phaseId": phase_id,
            "phaseStepId": review_id,
            "phaseOrderNumber": order,
            "phaseStepOrderNumber": 1000,
            "parentId": phase_id,
            "level": "PHASE_STEP",
            "dataCaptureSteps": review_steps,
        }],
    })
}

/// Every identity token in the document, in serialized key order
///
/// Works on the serialized JSON rather than the typed tree, so any object
/// anywhere in the output that carries a token key is counted.
pub fn collect_tokens(document: &Document) -> Vec<String> {
    let value = serde_json::to_value(document).unwrap();
    let mut tokens = Vec::new();
    walk_json_objects(&value, &mut |map| {
        for key in [GLOBAL_SERIAL_ID, LOCAL_REFERENCE_ID] {
            match map.get(key) {
                Some(Value::String(token)) => tokens.push(token.clone()),
                Some(other) => tokens.push(other.to_string()),
                None => {}
            }
        }
    });
    tokens
}

/// Phases of the `index`-th OPERATION as `(title, phaseOrderNumber)`
pub fn phase_outline(document: &Document, index: usize) -> Vec<(String, Option<u32>)> {
    document.operations()[index]
        .children
        .iter()
        .map(|phase| (phase.title.clone(), phase.phase_order_number))
        .collect()
}

//! Structural validation
//!
//! Checks the root, then every node: identity tokens present, level as
//! expected for its depth, children exactly one level down. All violations are
//! collected; validation never stops at the first.

use mxt_model::{Document, Level, Node};
use serde::{Deserialize, Serialize};

/// Result of validating one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a whole document
#[must_use]
pub fn validate(document: &Document) -> ValidationReport {
    let root = document.root();
    let mut errors = Vec::new();

    if root.level != Level::Procedure {
        errors.push(format!("Root must be level PROCEDURE, found {}", root.level));
    }
    if root.master_template_details.is_none() {
        errors.push("Missing masterTemplateDetails".to_string());
    }

    check_contents(root, &Level::Procedure, &mut errors);
    ValidationReport::from_errors(errors)
}

fn check_node(node: &Node, expected: &Level, errors: &mut Vec<String>) {
    if &node.level != expected {
        errors.push(format!(
            "Node {} {:?} has wrong level: {}, expected {}",
            node.id, node.title, node.level, expected
        ));
    }
    check_contents(node, expected, errors);
}

/// Tokens and children of a node expected at `expected`
fn check_contents(node: &Node, expected: &Level, errors: &mut Vec<String>) {
    if node.global_serial_id.is_empty() {
        errors.push(format!("Node {} {:?} missing globalSerialId", node.id, node.title));
    }
    if node.local_reference_id.is_empty() {
        errors.push(format!(
            "Node {} {:?} missing localReferenceId",
            node.id, node.title
        ));
    }

    match expected.child() {
        Some(child_level) => {
            for child in &node.children {
                check_node(child, &child_level, errors);
            }
        }
        None if !node.children.is_empty() => errors.push(format!(
            "Node {} {:?} at {} must not have children, found {}",
            node.id,
            node.title,
            expected,
            node.children.len()
        )),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mxt_test_utils::BaselineBuilder;

    #[test]
    fn baseline_is_valid() {
        let report = validate(&BaselineBuilder::new().build());
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn collects_every_violation() {
        let mut doc = BaselineBuilder::new().build();
        let root = doc.root_mut();
        root.master_template_details = None;
        let operation = &mut root.children[0].children[0];
        operation.global_serial_id.clear();
        operation.children[0].level = Level::PhaseStep;
        operation.children[0].local_reference_id.clear();

        let report = validate(&doc);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 4, "{:?}", report.errors);
        assert!(report.errors.iter().any(|e| e.contains("masterTemplateDetails")));
        assert!(report.errors.iter().any(|e| e.contains("wrong level: PHASE_STEP, expected PHASE")));
    }

    #[test]
    fn wrong_root_level_is_reported() {
        let mut doc = BaselineBuilder::new().build();
        doc.root_mut().level = Level::Operation;
        let report = validate(&doc);
        assert_eq!(report.errors.len(), 1, "{:?}", report.errors);
        assert!(report.errors[0].starts_with("Root must be level PROCEDURE"));
    }

    #[test]
    fn sub_phase_step_must_be_leaf() {
        let mut doc = BaselineBuilder::new().build();
        let phase_step = &mut doc.root_mut().children[0].children[0].children[0].children[0];
        let mut sub = phase_step.clone();
        sub.level = Level::SubPhaseStep;
        let mut nested = sub.clone();
        nested.children.clear();
        sub.children = vec![nested];
        phase_step.children = vec![sub];

        let report = validate(&doc);
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("must not have children")));
    }
}

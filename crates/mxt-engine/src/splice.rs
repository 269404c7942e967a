//! Tree splicing
//!
//! Places a new PHASE immediately before the terminal review phase of its
//! OPERATION. Siblings keep their order numbers.

use crate::error::MutationError;
use crate::intent::OperationTarget;
use mxt_model::{Document, Level, Node};

/// Resolve an [`OperationTarget`] to an OPERATION id
///
/// # Errors
/// Returns `TargetNotFound` if the document has no OPERATION, or none with the
/// requested title
pub fn resolve_operation(
    document: &Document,
    target: &OperationTarget,
) -> Result<u64, MutationError> {
    let operations = document.operations();
    let found = match target {
        OperationTarget::First => operations.first(),
        OperationTarget::Titled(title) => {
            let wanted = title.trim().to_lowercase();
            operations
                .iter()
                .find(|op| op.title.trim().to_lowercase() == wanted)
        }
    };
    found.map(|op| op.id).ok_or_else(|| match target {
        OperationTarget::First => {
            MutationError::TargetNotFound("document has no OPERATION".to_string())
        }
        OperationTarget::Titled(title) => {
            MutationError::TargetNotFound(format!("no OPERATION titled {title:?}"))
        }
    })
}

/// Insert `phase` before the terminal review phase of OPERATION `operation_id`
///
/// Returns the index the phase was inserted at.
///
/// # Errors
/// - `TargetNotFound` if no OPERATION has that id
/// - `InvariantViolation` if the OPERATION has no terminal review phase
pub fn splice(
    document: &mut Document,
    operation_id: u64,
    phase: Node,
    terminal_order: u32,
) -> Result<usize, MutationError> {
    let operation = document
        .find_mut(operation_id)
        .filter(|node| node.level == Level::Operation)
        .ok_or_else(|| {
            MutationError::TargetNotFound(format!("no OPERATION with id {operation_id}"))
        })?;

    let index = operation
        .children
        .iter()
        .position(|child| child.is_terminal_review_phase_at(terminal_order))
        .ok_or_else(|| {
            tracing::warn!("OPERATION {} has no terminal review phase", operation_id);
            MutationError::invariant(format!(
                "OPERATION {operation_id} has no terminal review phase"
            ))
        })?;

    tracing::debug!(
        "Splicing phase {} into OPERATION {} at index {}",
        phase.id,
        operation_id,
        index
    );
    operation.children.insert(index, phase);
    Ok(index)
}

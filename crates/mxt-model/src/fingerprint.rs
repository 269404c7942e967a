//! Structural fingerprints
//!
//! Provides [`ShapeFingerprint`], a 32-byte Blake3 digest of a tree's shape:
//! levels, node types, child counts and capture step kinds. Titles, identity
//! tokens and numeric ids do not contribute, so two documents with the same
//! structure but different identities share a fingerprint.

use crate::node::Node;
use std::fmt::{self, Display, Formatter};

/// A 32-byte digest of a tree's structure (Blake3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeFingerprint([u8; 32]);

impl ShapeFingerprint {
    /// Fingerprint the subtree rooted at `root`
    #[must_use]
    pub fn of(root: &Node) -> Self {
        let mut hasher = blake3::Hasher::new();
        feed(&mut hasher, root, 0);
        Self(*hasher.finalize().as_bytes())
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

fn feed(hasher: &mut blake3::Hasher, node: &Node, depth: u32) {
    hasher.update(&depth.to_le_bytes());
    hasher.update(node.level.as_str().as_bytes());
    hasher.update(&[0]);
    hasher.update(node.node_type.as_str().as_bytes());
    hasher.update(&[0]);
    hasher.update(&(node.data_capture_steps.len() as u64).to_le_bytes());
    for step in &node.data_capture_steps {
        hasher.update(step.step_type.as_str().as_bytes());
        hasher.update(&[0]);
    }
    hasher.update(&(node.children.len() as u64).to_le_bytes());
    for child in &node.children {
        feed(hasher, child, depth + 1);
    }
}

impl Display for ShapeFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(title: &str, token: &str, steps: usize) -> Node {
        let step = json!({"id": 9, "structureId": 2, "type": "NOTES"});
        serde_json::from_value(json!({
            "id": 1,
            "globalSerialId": token,
            "title": title,
            "type": "PARENT",
            "level": "OPERATION",
            "children": [{
                "id": 2,
                "type": "PARENT",
                "level": "PHASE",
                "dataCaptureSteps": vec![step; steps]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn identity_and_titles_do_not_affect_fingerprint() {
        let a = ShapeFingerprint::of(&tree("One", "t-1", 1));
        let b = ShapeFingerprint::of(&tree("Two", "t-2", 1));
        assert_eq!(a, b);
    }

    #[test]
    fn structure_changes_fingerprint() {
        let a = ShapeFingerprint::of(&tree("One", "t-1", 1));
        let b = ShapeFingerprint::of(&tree("One", "t-1", 2));
        assert_ne!(a, b);
    }

    #[test]
    fn displays_as_hex() {
        let fp = ShapeFingerprint::of(&tree("One", "t", 0));
        let full = fp.to_string();
        assert_eq!(full.len(), 64);
        assert!(full.starts_with(&fp.short()));
        assert_eq!(fp.short().len(), 16);
    }
}

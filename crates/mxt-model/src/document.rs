//! Master template documents
//!
//! A [`Document`] is the PROCEDURE root of a template tree. Baselines are
//! parsed once and cloned before any edit; every edited copy is a fresh value.

use crate::element::{walk_json_objects, Element};
use crate::fingerprint::ShapeFingerprint;
use crate::level::Level;
use crate::node::Node;
use crate::nulls::ExplicitNulls;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A complete master template, rooted at its PROCEDURE node
///
/// Serializes as the root node itself. Explicit `null`s read from a baseline
/// are written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
    nulls: ExplicitNulls,
}

impl Document {
    /// Wrap a root node
    #[inline]
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self {
            root,
            nulls: ExplicitNulls::default(),
        }
    }

    /// Parse from a JSON string
    ///
    /// # Errors
    /// Returns error if the text is not a template-shaped JSON object
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(DocumentError::InvalidJson)
    }

    /// Parse from raw bytes
    ///
    /// # Errors
    /// Returns error if the bytes are not a template-shaped JSON object
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        serde_json::from_slice(bytes).map_err(DocumentError::InvalidJson)
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    /// Returns error if serialization fails (rare for JSON)
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Serialization)
    }

    /// Root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Mutable root node
    #[inline]
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Unwrap into the root node
    #[inline]
    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Document title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.root.title
    }

    /// External product code, if the document carries one
    #[must_use]
    pub fn product_id(&self) -> Option<&str> {
        self.root
            .master_template_details
            .as_ref()
            .and_then(|details| details.product_id.as_deref())
    }

    /// Every OPERATION in document order
    #[must_use]
    pub fn operations(&self) -> Vec<&Node> {
        self.root.descendants_at(&Level::Operation)
    }

    /// Find a node by numeric id
    #[inline]
    #[must_use]
    pub fn find(&self, id: u64) -> Option<&Node> {
        self.root.find(id)
    }

    /// Find a node by numeric id, mutably
    #[inline]
    pub fn find_mut(&mut self, id: u64) -> Option<&mut Node> {
        self.root.find_mut(id)
    }

    /// Every numeric id in the document, in traversal order
    ///
    /// Includes ids of typed records and any integer `id` key in untyped JSON
    /// (role and tag sequences, preserved fields, `masterTemplateDetails`).
    #[must_use]
    pub fn numeric_ids(&self) -> Vec<u64> {
        let mut ids = Vec::new();
        self.root.walk(&mut |element: Element<'_>| {
            ids.push(element.id());
            for map in element.preserved() {
                if let Some(id) = map.get("id").and_then(Value::as_u64) {
                    ids.push(id);
                }
            }
            for value in element.untyped() {
                walk_json_objects(value, &mut |map| {
                    if let Some(id) = map.get("id").and_then(Value::as_u64) {
                        ids.push(id);
                    }
                });
            }
        });
        ids
    }

    /// Structural fingerprint of the whole tree
    #[inline]
    #[must_use]
    pub fn shape_fingerprint(&self) -> ShapeFingerprint {
        ShapeFingerprint::of(&self.root)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.nulls.is_empty() {
            return self.root.serialize(serializer);
        }
        let mut value = serde_json::to_value(&self.root).map_err(serde::ser::Error::custom)?;
        self.nulls.restore(&mut value);
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let nulls = ExplicitNulls::collect(&raw);
        let root = Node::deserialize(raw).map_err(serde::de::Error::custom)?;
        Ok(Self { root, nulls })
    }
}

impl From<Node> for Document {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}

/// Document parsing and serialization errors
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid template JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "id": 1,
            "globalSerialId": "g1",
            "localReferenceId": "l1",
            "title": "Baseline",
            "type": "PARENT",
            "level": "PROCEDURE",
            "masterTemplateDetails": {"productId": "PRD-1", "revision": "A"},
            "children": [{
                "id": 2,
                "type": "PARENT",
                "level": "UNIT_PROCEDURE",
                "children": [{
                    "id": 3,
                    "type": "PARENT",
                    "level": "OPERATION",
                    "children": [],
                    "customBlock": {"rows": [{"id": 77}]}
                }]
            }]
        })
    }

    #[test]
    fn parses_and_exposes_metadata() {
        let doc = Document::from_json(&minimal().to_string()).unwrap();
        assert_eq!(doc.title(), "Baseline");
        assert_eq!(doc.product_id(), Some("PRD-1"));
        assert_eq!(doc.operations().len(), 1);
        assert_eq!(doc.find(3).map(|n| n.level.clone()), Some(Level::Operation));
    }

    #[test]
    fn numeric_ids_include_untyped_nested_ids() {
        let doc = Document::from_json(&minimal().to_string()).unwrap();
        assert_eq!(doc.numeric_ids(), vec![1, 2, 3, 77]);
    }

    #[test]
    fn preserved_fields_survive_serialization() {
        let doc = Document::from_json(&minimal().to_string()).unwrap();
        let out: serde_json::Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(out["masterTemplateDetails"]["revision"], "A");
        assert_eq!(
            out["children"][0]["children"][0]["customBlock"],
            json!({"rows": [{"id": 77}]})
        );
    }

    #[test]
    fn explicit_nulls_round_trip() {
        let mut input = minimal();
        input["parentId"] = Value::Null;
        input["title"] = Value::Null;
        input["masterTemplateDetails"]["productId"] = Value::Null;
        input["children"][0]["repeatable"] = Value::Null;
        input["children"][0]["children"][0]["phaseOrderNumber"] = Value::Null;

        let doc = Document::from_json(&input.to_string()).unwrap();
        assert_eq!(doc.title(), "");
        assert_eq!(doc.product_id(), None);
        assert!(!doc.root().children[0].repeatable);

        let out: Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(out.get("parentId"), Some(&Value::Null));
        assert_eq!(out["masterTemplateDetails"].get("productId"), Some(&Value::Null));
        assert_eq!(
            out["children"][0]["children"][0].get("phaseOrderNumber"),
            Some(&Value::Null)
        );
        assert_eq!(out["title"], "");

        let again = Document::from_json(&out.to_string()).unwrap();
        assert_eq!(again.root(), doc.root());
        assert_eq!(again.to_json_pretty().unwrap(), doc.to_json_pretty().unwrap());
    }

    #[test]
    fn rejects_non_template_json() {
        let result = Document::from_json("[1, 2, 3]");
        assert!(matches!(result, Err(DocumentError::InvalidJson(_))));
    }
}

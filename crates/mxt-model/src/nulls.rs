//! Explicit `null` fields of a parsed baseline
//!
//! Typed optional fields read `null` as `None`, which is then omitted on
//! output. The keys that held `null` are recorded per record (keyed by record
//! kind and numeric id) and written back as `null` wherever the typed output
//! leaves them out.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    Node,
    Details,
    Step,
    Trigger,
    Action,
}

impl Slot {
    /// Keys holding records nested directly under this record
    fn nested(self) -> &'static [(&'static str, Slot)] {
        match self {
            Slot::Node => &[
                ("masterTemplateDetails", Slot::Details),
                ("dataCaptureSteps", Slot::Step),
                ("children", Slot::Node),
            ],
            Slot::Step => &[("actionTriggers", Slot::Trigger)],
            Slot::Trigger => &[("actions", Slot::Action)],
            Slot::Details | Slot::Action => &[],
        }
    }

    /// Numeric key of a record; details belong to their owning node
    fn key(self, map: &Map<String, Value>, owner: Option<u64>) -> Option<u64> {
        match self {
            Slot::Details => owner,
            _ => map.get("id").and_then(Value::as_u64),
        }
    }
}

/// Null-valued keys per record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExplicitNulls {
    keys: BTreeMap<(Slot, u64), Vec<String>>,
}

impl ExplicitNulls {
    /// Record every null-valued key of every record in `root`
    pub(crate) fn collect(root: &Value) -> Self {
        let mut nulls = Self::default();
        if let Value::Object(map) = root {
            nulls.collect_record(map, Slot::Node, None);
        }
        nulls
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn collect_record(&mut self, map: &Map<String, Value>, slot: Slot, owner: Option<u64>) {
        let key = slot.key(map, owner);
        if let Some(id) = key {
            let null_keys: Vec<String> = map
                .iter()
                .filter(|(_, value)| value.is_null())
                .map(|(name, _)| name.clone())
                .collect();
            if !null_keys.is_empty() {
                self.keys.insert((slot, id), null_keys);
            }
        }
        for &(field, nested) in slot.nested() {
            match map.get(field) {
                Some(Value::Object(child)) => self.collect_record(child, nested, key),
                Some(Value::Array(items)) => {
                    for item in items {
                        if let Value::Object(child) = item {
                            self.collect_record(child, nested, key);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Write recorded nulls back into serialized output where keys are missing
    pub(crate) fn restore(&self, root: &mut Value) {
        if let Value::Object(map) = root {
            self.restore_record(map, Slot::Node, None);
        }
    }

    fn restore_record(&self, map: &mut Map<String, Value>, slot: Slot, owner: Option<u64>) {
        let key = slot.key(map, owner);
        if let Some(null_keys) = key.and_then(|id| self.keys.get(&(slot, id))) {
            for name in null_keys {
                map.entry(name.clone()).or_insert(Value::Null);
            }
        }
        for &(field, nested) in slot.nested() {
            match map.get_mut(field) {
                Some(Value::Object(child)) => self.restore_record(child, nested, key),
                Some(Value::Array(items)) => {
                    for item in items {
                        if let Value::Object(child) = item {
                            self.restore_record(child, nested, key);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn restores_only_missing_keys() {
        let raw = json!({
            "id": 1,
            "parentId": null,
            "title": null,
            "masterTemplateDetails": {"productId": null},
            "children": [{"id": 2, "phaseOrderNumber": null}]
        });
        let nulls = ExplicitNulls::collect(&raw);

        let mut out = json!({
            "id": 1,
            "title": "",
            "masterTemplateDetails": {},
            "children": [{"id": 2}, {"id": 3}]
        });
        nulls.restore(&mut out);

        assert_eq!(out["parentId"], Value::Null);
        assert_eq!(out["title"], "");
        assert!(out["masterTemplateDetails"].get("productId").is_some());
        assert!(out["children"][0].get("phaseOrderNumber").is_some());
        assert!(out["children"][1].get("phaseOrderNumber").is_none());
    }

    #[test]
    fn documents_without_nulls_record_nothing() {
        let nulls = ExplicitNulls::collect(&json!({"id": 1, "children": []}));
        assert!(nulls.is_empty());
    }
}

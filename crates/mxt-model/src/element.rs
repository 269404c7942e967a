//! Uniform traversal over every record in a template tree
//!
//! [`Element`] tags each record kind that can carry identity or numeric id
//! fields. Whole-document passes (id scans, token regeneration) are written once
//! against this type instead of once per record kind.

use crate::capture::{ActionTrigger, DataCaptureStep, TriggerAction};
use crate::node::Node;
use serde_json::{Map, Value};

/// Shared reference to one record of the tree
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    Node(&'a Node),
    Step(&'a DataCaptureStep),
    Trigger(&'a ActionTrigger),
    Action(&'a TriggerAction),
}

/// Exclusive reference to one record of the tree
#[derive(Debug)]
pub enum ElementMut<'a> {
    Node(&'a mut Node),
    Step(&'a mut DataCaptureStep),
    Trigger(&'a mut ActionTrigger),
    Action(&'a mut TriggerAction),
}

impl<'a> Element<'a> {
    /// Numeric id of the record
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Element::Node(node) => node.id,
            Element::Step(step) => step.id,
            Element::Trigger(trigger) => trigger.id,
            Element::Action(action) => action.id,
        }
    }

    /// Maps of untyped fields preserved on the record itself
    ///
    /// A node's `masterTemplateDetails` counts as part of the node.
    #[must_use]
    pub fn preserved(&self) -> Vec<&'a Map<String, Value>> {
        match *self {
            Element::Node(node) => {
                let mut maps = vec![&node.extra];
                if let Some(details) = &node.master_template_details {
                    maps.push(&details.extra);
                }
                maps
            }
            Element::Step(step) => vec![&step.extra],
            Element::Trigger(trigger) => vec![&trigger.extra],
            Element::Action(action) => vec![&action.extra],
        }
    }

    /// Every untyped JSON value held by the record
    ///
    /// Covers role, tag and projection sequences as well as preserved fields.
    #[must_use]
    pub fn untyped(&self) -> Vec<&'a Value> {
        match *self {
            Element::Node(node) => {
                let mut values: Vec<&'a Value> = [
                    &node.simplified_navigation_role_ids,
                    &node.structure_roles,
                    &node.instruction_parts,
                    &node.received_data_projections,
                    &node.projected_data_projections,
                    &node.api_columns,
                    &node.logbook_template_ids,
                    &node.tags,
                    &node.product_structures,
                    &node.template_table_entities,
                    &node.simplified_navigation_roles,
                ]
                .into_iter()
                .flatten()
                .collect();
                if let Some(details) = &node.master_template_details {
                    values.extend(details.extra.values());
                }
                values.extend(node.extra.values());
                values
            }
            Element::Step(step) => {
                let mut values: Vec<&'a Value> = [
                    &step.data_capture_roles,
                    &step.notification_role_ids,
                    &step.received_data_projections,
                    &step.projected_data_projections,
                    &step.data_capture_step_notifications,
                ]
                .into_iter()
                .flatten()
                .collect();
                if let Some(entries) = &step.suggested_entries {
                    values.extend(entries);
                }
                values.extend(step.extra.values());
                values
            }
            Element::Trigger(trigger) => trigger
                .notifications
                .iter()
                .chain(&trigger.not_applicable_structures)
                .chain(trigger.extra.values())
                .collect(),
            Element::Action(action) => action.extra.values().collect(),
        }
    }

    /// Short label for diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Node(_) => "node",
            Element::Step(_) => "data capture step",
            Element::Trigger(_) => "action trigger",
            Element::Action(_) => "trigger action",
        }
    }
}

impl ElementMut<'_> {
    /// Mutable variant of [`Element::preserved`]
    pub fn preserved_mut(&mut self) -> Vec<&mut Map<String, Value>> {
        match self {
            ElementMut::Node(node) => {
                let node: &mut Node = node;
                let mut maps = vec![&mut node.extra];
                if let Some(details) = &mut node.master_template_details {
                    maps.push(&mut details.extra);
                }
                maps
            }
            ElementMut::Step(step) => vec![&mut step.extra],
            ElementMut::Trigger(trigger) => vec![&mut trigger.extra],
            ElementMut::Action(action) => vec![&mut action.extra],
        }
    }

    /// Mutable variant of [`Element::untyped`]
    pub fn untyped_mut(&mut self) -> Vec<&mut Value> {
        match self {
            ElementMut::Node(node) => {
                let node: &mut Node = node;
                let mut values: Vec<&mut Value> = [
                    &mut node.simplified_navigation_role_ids,
                    &mut node.structure_roles,
                    &mut node.instruction_parts,
                    &mut node.received_data_projections,
                    &mut node.projected_data_projections,
                    &mut node.api_columns,
                    &mut node.logbook_template_ids,
                    &mut node.tags,
                    &mut node.product_structures,
                    &mut node.template_table_entities,
                    &mut node.simplified_navigation_roles,
                ]
                .into_iter()
                .flatten()
                .collect();
                if let Some(details) = &mut node.master_template_details {
                    values.extend(details.extra.values_mut());
                }
                values.extend(node.extra.values_mut());
                values
            }
            ElementMut::Step(step) => {
                let step: &mut DataCaptureStep = step;
                let mut values: Vec<&mut Value> = [
                    &mut step.data_capture_roles,
                    &mut step.notification_role_ids,
                    &mut step.received_data_projections,
                    &mut step.projected_data_projections,
                    &mut step.data_capture_step_notifications,
                ]
                .into_iter()
                .flatten()
                .collect();
                if let Some(entries) = &mut step.suggested_entries {
                    values.extend(entries.iter_mut());
                }
                values.extend(step.extra.values_mut());
                values
            }
            ElementMut::Trigger(trigger) => {
                let trigger: &mut ActionTrigger = trigger;
                trigger
                    .notifications
                    .iter_mut()
                    .chain(trigger.not_applicable_structures.iter_mut())
                    .chain(trigger.extra.values_mut())
                    .collect()
            }
            ElementMut::Action(action) => action.extra.values_mut().collect(),
        }
    }
}

impl Node {
    /// Visit every record in this subtree, pre-order
    ///
    /// A node is visited before its capture steps, which are visited before
    /// its children.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(Element<'a>),
    {
        visit(Element::Node(self));
        for step in &self.data_capture_steps {
            visit(Element::Step(step));
            for trigger in &step.action_triggers {
                visit(Element::Trigger(trigger));
                for action in &trigger.actions {
                    visit(Element::Action(action));
                }
            }
        }
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Mutable variant of [`Node::walk`]
    pub fn walk_mut<F>(&mut self, visit: &mut F)
    where
        F: FnMut(ElementMut<'_>),
    {
        visit(ElementMut::Node(&mut *self));
        for step in &mut self.data_capture_steps {
            visit(ElementMut::Step(&mut *step));
            for trigger in &mut step.action_triggers {
                visit(ElementMut::Trigger(&mut *trigger));
                for action in &mut trigger.actions {
                    visit(ElementMut::Action(action));
                }
            }
        }
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}

/// Visit every object nested in an untyped JSON value, depth-first
pub fn walk_json_objects_mut<F>(value: &mut Value, visit: &mut F)
where
    F: FnMut(&mut Map<String, Value>),
{
    match value {
        Value::Object(map) => {
            visit(&mut *map);
            for nested in map.values_mut() {
                walk_json_objects_mut(nested, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_json_objects_mut(item, visit);
            }
        }
        _ => {}
    }
}

/// Visit every object nested in an untyped JSON value, depth-first
pub fn walk_json_objects<'a, F>(value: &'a Value, visit: &mut F)
where
    F: FnMut(&'a Map<String, Value>),
{
    match value {
        Value::Object(map) => {
            visit(map);
            for nested in map.values() {
                walk_json_objects(nested, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_json_objects(item, visit);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::MasterTemplateDetails;
    use serde_json::json;

    fn sample() -> Node {
        serde_json::from_value(json!({
            "id": 1,
            "type": "PARENT",
            "level": "PHASE",
            "dataCaptureSteps": [{
                "id": 2,
                "structureId": 1,
                "type": "GENERAL_TEXT",
                "actionTriggers": [{
                    "id": 3,
                    "dataCaptureStepId": 2,
                    "triggerType": "OUT_OF_NUMERIC_RANGE",
                    "actions": [{"id": 4, "stepActionTriggerId": 3, "type": "REJECT"}]
                }]
            }],
            "children": [{"id": 5, "type": "ITERATION_REVIEW", "level": "PHASE_STEP"}]
        }))
        .unwrap()
    }

    #[test]
    fn walk_visits_every_record_in_order() {
        let node = sample();
        let mut seen = Vec::new();
        node.walk(&mut |element| seen.push((element.kind(), element.id())));

        assert_eq!(
            seen,
            vec![
                ("node", 1),
                ("data capture step", 2),
                ("action trigger", 3),
                ("trigger action", 4),
                ("node", 5),
            ]
        );
    }

    #[test]
    fn walk_mut_reaches_nested_records() {
        let mut node = sample();
        node.walk_mut(&mut |element| {
            if let ElementMut::Action(action) = element {
                action.id = 40;
            }
        });
        assert_eq!(node.data_capture_steps[0].action_triggers[0].actions[0].id, 40);
    }

    #[test]
    fn untyped_covers_sequences_and_preserved_fields() {
        let mut node = sample();
        node.tags.push(json!({"id": 90}));
        node.extra.insert("vendor".into(), json!({"id": 91}));
        let step = &mut node.data_capture_steps[0];
        step.data_capture_roles.push(json!({"localReferenceId": "r"}));

        let mut count = 0;
        node.walk(&mut |element| count += element.untyped().len());
        assert_eq!(count, 3);

        node.walk_mut(&mut |mut element| {
            for value in element.untyped_mut() {
                *value = Value::Null;
            }
        });
        assert_eq!(node.tags, vec![Value::Null]);
        assert_eq!(node.data_capture_steps[0].data_capture_roles, vec![Value::Null]);
    }

    #[test]
    fn preserved_includes_details_of_root() {
        let mut node = sample();
        node.master_template_details = Some(MasterTemplateDetails::default());
        node.walk_mut(&mut |mut element| {
            for map in element.preserved_mut() {
                map.insert("seen".into(), json!(true));
            }
        });

        let details = node.master_template_details.as_ref().unwrap();
        assert_eq!(details.extra["seen"], json!(true));
        assert_eq!(node.data_capture_steps[0].action_triggers[0].actions[0].extra["seen"], json!(true));

        let mut count = 0;
        node.walk(&mut |element| count += element.preserved().len());
        assert_eq!(count, 6);
    }

    #[test]
    fn json_walk_finds_deep_objects() {
        let mut value = json!({"a": [{"b": {"c": 1}}, 2]});
        let mut count = 0;
        walk_json_objects_mut(&mut value, &mut |_| count += 1);
        assert_eq!(count, 3);
    }
}

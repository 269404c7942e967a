//! Document finalization
//!
//! Replaces every identity token in the document with a fresh one and stamps
//! the generation date onto the title and product code. Numeric ids are never
//! touched. Finalizing twice stamps twice.

use crate::config::EngineConfig;
use crate::ids::mint_token;
use chrono::{DateTime, NaiveDate, Utc};
use mxt_model::{
    walk_json_objects_mut, Document, ElementMut, GLOBAL_SERIAL_ID, LOCAL_REFERENCE_ID,
};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Arc;

/// Source of the generation timestamp
pub trait Clock: Debug + Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// What one finalization pass changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeReport {
    /// Number of identity tokens replaced
    pub tokens_rewritten: usize,
    /// Date stamped onto the title and product code
    pub generated_on: NaiveDate,
}

/// Rewrites identity tokens and stamps generation suffixes
#[derive(Debug, Clone)]
pub struct Finalizer {
    suffix_label: String,
    product_marker: String,
    clock: Arc<dyn Clock>,
}

impl Finalizer {
    /// Create finalizer using the wall clock
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create finalizer with an explicit clock
    #[must_use]
    pub fn with_clock(config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            suffix_label: config.suffix_label.clone(),
            product_marker: config.product_marker.clone(),
            clock,
        }
    }

    /// Finalize `document` in place
    pub fn finalize(&self, document: &mut Document) -> FinalizeReport {
        let tokens_rewritten = regenerate_tokens(document);
        let generated_on = self.clock.now().date_naive();
        let date = generated_on.format("%Y-%m-%d").to_string();

        let root = document.root_mut();
        if !root.title.is_empty() {
            root.title = format!("{} ({} {date})", root.title, self.suffix_label);
        }
        if let Some(product_id) = root
            .master_template_details
            .as_mut()
            .and_then(|details| details.product_id.as_mut())
            .filter(|product_id| !product_id.is_empty())
        {
            *product_id = format!("{product_id}-{}-{date}", self.product_marker);
        }

        tracing::debug!("Regenerated {} identity tokens", tokens_rewritten);
        FinalizeReport {
            tokens_rewritten,
            generated_on,
        }
    }
}

/// Replace every identity token in the document, returning how many were
/// replaced
///
/// Typed token fields are always written, so a node or capture step missing a
/// token gains one. Token keys in untyped JSON, on a record itself or nested at
/// any depth below it, are replaced only where present.
pub fn regenerate_tokens(document: &mut Document) -> usize {
    let mut rewritten = 0;
    document.root_mut().walk_mut(&mut |mut element| {
        match &mut element {
            ElementMut::Node(node) => {
                node.global_serial_id = mint_token();
                node.local_reference_id = mint_token();
                rewritten += 2;
            }
            ElementMut::Step(step) => {
                step.local_reference_id = mint_token();
                rewritten += 1;
            }
            ElementMut::Trigger(_) | ElementMut::Action(_) => {}
        }
        for map in element.preserved_mut() {
            rewritten += rewrite_token_keys(map);
        }
        for value in element.untyped_mut() {
            walk_json_objects_mut(value, &mut |map| rewritten += rewrite_token_keys(map));
        }
    });
    rewritten
}

fn rewrite_token_keys(map: &mut Map<String, Value>) -> usize {
    let mut rewritten = 0;
    for key in [GLOBAL_SERIAL_ID, LOCAL_REFERENCE_ID] {
        if let Some(token) = map.get_mut(key) {
            *token = mint_token().into();
            rewritten += 1;
        }
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mxt_test_utils::{collect_tokens, BaselineBuilder};
    use serde_json::json;
    use std::collections::HashSet;

    fn finalizer() -> Finalizer {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 0).unwrap());
        Finalizer::with_clock(&EngineConfig::default(), Arc::new(clock))
    }

    #[test]
    fn stamps_title_and_product_code() {
        let mut doc = BaselineBuilder::new()
            .with_title("Tablet Line")
            .with_product_id(Some("PRD-7"))
            .build();
        let report = finalizer().finalize(&mut doc);

        assert_eq!(doc.title(), "Tablet Line (Generated 2024-03-09)");
        assert_eq!(doc.product_id(), Some("PRD-7-GEN-2024-03-09"));
        assert_eq!(report.generated_on, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }

    #[test]
    fn absent_product_code_stays_absent() {
        let mut doc = BaselineBuilder::new().with_product_id(None).build();
        finalizer().finalize(&mut doc);
        assert_eq!(doc.product_id(), None);
    }

    #[test]
    fn every_token_changes_and_ids_do_not() {
        let mut doc = BaselineBuilder::new().build();
        let before_tokens = collect_tokens(&doc);
        let before_ids = doc.numeric_ids();

        let report = finalizer().finalize(&mut doc);
        let after_tokens = collect_tokens(&doc);

        assert_eq!(report.tokens_rewritten, after_tokens.len());
        assert_eq!(before_tokens.len(), after_tokens.len());
        let before: HashSet<_> = before_tokens.into_iter().collect();
        assert!(after_tokens.iter().all(|t| !before.contains(t)));
        assert_eq!(
            after_tokens.iter().collect::<HashSet<_>>().len(),
            after_tokens.len()
        );
        assert_eq!(doc.numeric_ids(), before_ids);
    }

    #[test]
    fn nested_untyped_tokens_are_regenerated() {
        let mut doc = BaselineBuilder::new().build();
        doc.root_mut().extra.insert(
            "linkedRecords".into(),
            json!([{"globalSerialId": "old-g", "nested": {"localReferenceId": "old-l"}}]),
        );
        doc.root_mut().tags.push(json!({"localReferenceId": "old-tag"}));
        finalizer().finalize(&mut doc);

        let linked = &doc.root().extra["linkedRecords"][0];
        assert_ne!(linked["globalSerialId"], "old-g");
        assert_ne!(linked["nested"]["localReferenceId"], "old-l");
        assert_ne!(doc.root().tags[0]["localReferenceId"], "old-tag");
    }

    #[test]
    fn tokens_directly_on_records_are_regenerated() {
        let mut value = BaselineBuilder::new().build_value();
        value["masterTemplateDetails"]["globalSerialId"] = json!("OLD-DETAILS");
        let step = &mut value["children"][0]["children"][0]["children"][0]["dataCaptureSteps"][0];
        let step_id = step["id"].clone();
        step["globalSerialId"] = json!("OLD-STEP-G");
        step["actionTriggers"] = json!([{
            "id": 900,
            "dataCaptureStepId": step_id,
            "triggerType": "OUT_OF_NUMERIC_RANGE",
            "localReferenceId": "OLD-TRIGGER",
            "actions": [{
                "id": 901,
                "stepActionTriggerId": 900,
                "type": "REJECT",
                "localReferenceId": "OLD-ACTION"
            }]
        }]);
        let mut doc: Document = serde_json::from_value(value).unwrap();
        let before = collect_tokens(&doc).len();

        let report = finalizer().finalize(&mut doc);

        let text = doc.to_json_pretty().unwrap();
        assert!(!text.contains("OLD-"), "stale token left in {text}");
        assert_eq!(report.tokens_rewritten, before);
        assert_eq!(collect_tokens(&doc).len(), before);
    }

    #[test]
    fn refinalizing_appends_again() {
        let mut doc = BaselineBuilder::new().with_title("T").build();
        let finalizer = finalizer();
        finalizer.finalize(&mut doc);
        finalizer.finalize(&mut doc);
        assert_eq!(doc.title(), "T (Generated 2024-03-09) (Generated 2024-03-09)");
    }

    #[test]
    fn custom_labels_from_config() {
        let config = EngineConfig::default()
            .with_suffix_label("Copy")
            .with_product_marker("CP");
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap());
        let mut doc = BaselineBuilder::new()
            .with_title("T")
            .with_product_id(Some("P"))
            .build();
        Finalizer::with_clock(&config, Arc::new(clock)).finalize(&mut doc);
        assert_eq!(doc.title(), "T (Copy 2025-01-02)");
        assert_eq!(doc.product_id(), Some("P-CP-2025-01-02"));
    }
}

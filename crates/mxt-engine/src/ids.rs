//! Identifier allocation
//!
//! One [`IdAllocator`] is owned by one edit. It is seeded from the largest
//! numeric id in the document and hands out strictly increasing ids from
//! there. Identity tokens are independent UUID v4 strings.

use mxt_model::Document;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-edit source of fresh numeric ids and identity tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Start handing out ids after `last`
    #[inline]
    #[must_use]
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }

    /// Seed from the largest numeric id found anywhere in `document`
    #[must_use]
    pub fn seeded_from(document: &Document) -> Self {
        let max = max_numeric_id(document);
        tracing::debug!("Allocator seeded at max id {}", max);
        Self::starting_after(max)
    }

    /// Next fresh numeric id
    ///
    /// Saturates at `u64::MAX`; documents never come close.
    #[inline]
    pub fn next_id(&mut self) -> u64 {
        self.last = self.last.saturating_add(1);
        self.last
    }

    /// Last id handed out (or the seed, if none yet)
    #[inline]
    #[must_use]
    pub fn last_issued(&self) -> u64 {
        self.last
    }

    /// Fresh opaque identity token
    #[inline]
    #[must_use]
    pub fn mint_token(&self) -> String {
        mint_token()
    }
}

/// Largest numeric id in the document, or 0 for a document without ids
#[must_use]
pub fn max_numeric_id(document: &Document) -> u64 {
    document.numeric_ids().into_iter().max().unwrap_or(0)
}

/// Fresh opaque identity token (UUID v4, hyphenated)
#[inline]
#[must_use]
pub fn mint_token() -> String {
    Uuid::new_v4().to_string()
}

/// Numeric ids that occur more than once, ascending
#[must_use]
pub fn duplicate_ids(document: &Document) -> Vec<u64> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for id in document.numeric_ids() {
        *counts.entry(id).or_default() += 1;
    }
    let mut duplicates: Vec<u64> = counts
        .into_iter()
        .filter_map(|(id, count)| (count > 1).then_some(id))
        .collect();
    duplicates.sort_unstable();
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use mxt_test_utils::BaselineBuilder;
    use std::collections::HashSet;

    #[test]
    fn seeds_from_max_and_counts_up() {
        let doc = BaselineBuilder::new().build();
        let max = max_numeric_id(&doc);
        let mut ids = IdAllocator::seeded_from(&doc);

        assert_eq!(ids.next_id(), max + 1);
        assert_eq!(ids.next_id(), max + 2);
        assert_eq!(ids.last_issued(), max + 2);
    }

    #[test]
    fn max_includes_steps_triggers_and_untyped_ids() {
        let mut doc = BaselineBuilder::new().build();
        doc.root_mut()
            .extra
            .insert("vendorRows".into(), serde_json::json!([{"id": 9_000}]));
        assert_eq!(max_numeric_id(&doc), 9_000);
    }

    #[test]
    fn empty_allocator_starts_at_one() {
        let mut ids = IdAllocator::starting_after(0);
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn tokens_are_unique() {
        let ids = IdAllocator::starting_after(0);
        let tokens: HashSet<String> = (0..256).map(|_| ids.mint_token()).collect();
        assert_eq!(tokens.len(), 256);
        assert!(tokens.iter().all(|t| Uuid::parse_str(t).is_ok()));
    }

    #[test]
    fn detects_duplicate_ids() {
        let doc = BaselineBuilder::new().build();
        assert!(duplicate_ids(&doc).is_empty());

        let mut doc = doc;
        let first_phase_id = doc.operations()[0].children[0].id;
        doc.root_mut()
            .extra
            .insert("shadow".into(), serde_json::json!({"id": first_phase_id}));
        assert_eq!(duplicate_ids(&doc), vec![first_phase_id]);
    }
}

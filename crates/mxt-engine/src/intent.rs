//! Request interpretation
//!
//! Maps a short free-form instruction to an [`EditIntent`]. Only phase
//! insertion is understood; anything else is reported as unrecognized rather
//! than guessed at.
//!
//! ```text
//! add phase QC Check with witness and verify
//! create a new phase called "Line Clearance" in operation Packaging
//! please add a phase step called Weight, general numeric, review by exception
//! ```

use crate::assembler::{EntryKind, PhaseFeatures};
use crate::error::InterpretError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ADD_PHASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)\b(?:add|create|insert)\s+(?:(?:a|an)\s+)?(?:new\s+)?phase(?:\s+step)?\b(?:\s+(?:called|named|titled)\b)?(?P<rest>.*)$",
    )
    .expect("static regex")
});

static PHASE_STEP_CALLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\bphase\s+step\s+called\b(?P<rest>.*)$").expect("static regex")
});

/// Where a title ends when it is not quoted
static TITLE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|\s)(?:with\b|(?:in|into|to|under|for)\s+(?:the\s+)?operation\b)|[.;!?\n](?:\s|$)|,",
    )
    .expect("static regex")
});

static TARGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(?:in|into|to|under|for)\s+(?:the\s+)?operation\s+(?:(?:called|named|titled)\s+)?(?:"(?P<dq>[^"]+)"|'(?P<sq>[^']+)'|(?P<bare>.+?)(?:\s+(?:with|and)\b|[.;!?,]|$))"#,
    )
    .expect("static regex")
});

static WITNESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bwitness(?:ed)?\b").expect("static regex"));
static VERIFY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bverif(?:y|ied|ication)\b").expect("static regex"));
static NOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bnotes\b").expect("static regex"));
static RBE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:rbe|review\s+by\s+exception)\b").expect("static regex"));
static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bnumeric\b").expect("static regex"));
static TEXT_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:general\s+text|phase\s+step|text\s+entry|data\s+entry)\b")
        .expect("static regex")
});

/// Which OPERATION receives the new phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "title")]
pub enum OperationTarget {
    /// First OPERATION in document order
    First,
    /// OPERATION whose title matches, ignoring case
    Titled(String),
}

/// Structured edit extracted from a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditIntent {
    pub title: String,
    pub target: OperationTarget,
    pub features: PhaseFeatures,
}

/// Outcome of interpreting a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Recognized(EditIntent),
    Unrecognized(String),
}

impl Interpretation {
    /// Recognized intent, if any
    #[inline]
    #[must_use]
    pub fn intent(&self) -> Option<&EditIntent> {
        match self {
            Self::Recognized(intent) => Some(intent),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Interpret a free-form instruction
///
/// # Errors
/// Returns `MissingTitle` when a phase-creation phrase matched but no title
/// follows it
pub fn interpret(instruction: &str) -> Result<Interpretation, InterpretError> {
    let request = instruction.trim();
    if request.is_empty() {
        return Ok(Interpretation::Unrecognized("empty request".to_string()));
    }

    let Some(captures) = ADD_PHASE
        .captures(request)
        .or_else(|| PHASE_STEP_CALLED.captures(request))
    else {
        return Ok(Interpretation::Unrecognized(format!(
            "no supported edit found in {request:?}"
        )));
    };
    let rest = captures.name("rest").map_or("", |m| m.as_str());

    let title = extract_title(rest).ok_or_else(|| InterpretError::MissingTitle {
        request: request.to_string(),
    })?;

    Ok(Interpretation::Recognized(EditIntent {
        title,
        target: extract_target(request),
        features: extract_features(request),
    }))
}

fn extract_title(rest: &str) -> Option<String> {
    let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ':');

    if let Some(quoted) = quoted_prefix(rest) {
        let title = quoted.trim();
        return (!title.is_empty()).then(|| title.to_string());
    }

    let end = TITLE_END.find(rest).map_or(rest.len(), |m| m.start());
    let title = rest[..end].trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn quoted_prefix(text: &str) -> Option<&str> {
    let (open, close) = match text.chars().next()? {
        '"' => ('"', '"'),
        '\'' => ('\'', '\''),
        '\u{201c}' => ('\u{201c}', '\u{201d}'),
        _ => return None,
    };
    let body = &text[open.len_utf8()..];
    body.find(close).map(|end| &body[..end])
}

fn extract_target(request: &str) -> OperationTarget {
    TARGET
        .captures(request)
        .and_then(|c| c.name("dq").or_else(|| c.name("sq")).or_else(|| c.name("bare")))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .map_or(OperationTarget::First, |name| {
            OperationTarget::Titled(name.to_string())
        })
}

fn extract_features(request: &str) -> PhaseFeatures {
    let entry = if NUMERIC.is_match(request) {
        Some(EntryKind::Numeric)
    } else if TEXT_ENTRY.is_match(request) {
        Some(EntryKind::Text)
    } else {
        None
    };

    PhaseFeatures {
        witness: WITNESS.is_match(request),
        verify: VERIFY.is_match(request),
        notes: NOTES.is_match(request),
        review_by_exception: RBE.is_match(request),
        entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recognized(request: &str) -> EditIntent {
        match interpret(request).unwrap() {
            Interpretation::Recognized(intent) => intent,
            Interpretation::Unrecognized(reason) => panic!("unrecognized: {reason}"),
        }
    }

    #[test]
    fn add_phase_with_witness() {
        let intent = recognized("add phase QC Check with witness");
        assert_eq!(intent.title, "QC Check");
        assert_eq!(intent.target, OperationTarget::First);
        assert!(intent.features.witness);
        assert!(!intent.features.verify);
        assert_eq!(intent.features.entry, None);
        assert_eq!(intent.features.entry_kind(), Some(EntryKind::Text));
    }

    #[test]
    fn title_stops_before_with_clause() {
        let intent = recognized("Add a phase Final Inspection with witness and verify");
        assert_eq!(intent.title, "Final Inspection");
        assert!(intent.features.witness && intent.features.verify);
    }

    #[test]
    fn naming_verbs_and_articles_are_skipped() {
        assert_eq!(recognized("create a new phase called Mixing").title, "Mixing");
        assert_eq!(recognized("insert an phase named Drying.").title, "Drying");
        assert_eq!(recognized("add phase titled: Coating").title, "Coating");
    }

    #[test]
    fn phase_step_called_phrase() {
        let intent = recognized("I need a phase step called Label Check. Display on RBE.");
        assert_eq!(intent.title, "Label Check");
        assert!(intent.features.review_by_exception);
        assert_eq!(intent.features.entry, Some(EntryKind::Text));
    }

    #[test]
    fn quoted_title_is_verbatim() {
        let intent = recognized(r#"add phase "Mix, then Hold. With care" with verification"#);
        assert_eq!(intent.title, "Mix, then Hold. With care");
        assert!(intent.features.verify);
        assert!(!intent.features.witness);
    }

    #[test]
    fn operation_target_by_title() {
        let intent = recognized("add phase Sieving in operation Blending with notes");
        assert_eq!(intent.title, "Sieving");
        assert_eq!(intent.target, OperationTarget::Titled("Blending".to_string()));
        assert!(intent.features.notes);

        let quoted = recognized(r#"add phase X to the operation named "Final Pack""#);
        assert_eq!(quoted.target, OperationTarget::Titled("Final Pack".to_string()));
    }

    #[test]
    fn numeric_entry_wins_over_text_keywords() {
        let intent = recognized("add phase step called Weight with general numeric entry");
        assert_eq!(intent.title, "Weight");
        assert_eq!(intent.features.entry, Some(EntryKind::Numeric));
    }

    #[test]
    fn general_text_and_review_by_exception() {
        let intent = recognized("add phase Notes Review with general text, review by exception");
        assert_eq!(intent.features.entry, Some(EntryKind::Text));
        assert!(intent.features.review_by_exception);
    }

    #[test]
    fn unrelated_requests_are_unrecognized() {
        assert!(matches!(
            interpret("remove the second operation").unwrap(),
            Interpretation::Unrecognized(_)
        ));
        assert!(matches!(
            interpret("   ").unwrap(),
            Interpretation::Unrecognized(_)
        ));
    }

    #[test]
    fn missing_title_is_malformed() {
        assert_eq!(
            interpret("add phase with witness"),
            Err(InterpretError::MissingTitle {
                request: "add phase with witness".to_string()
            })
        );
        assert!(interpret("add a phase").is_err());
        assert!(interpret(r#"add phase """#).is_err());
    }
}

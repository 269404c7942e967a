//! Display names and output file names

use chrono::{DateTime, Utc};

/// Display names of templates shipped with the library
pub const KNOWN_NAMES: &[(&str, &str)] = &[
    ("baseline-simple", "Simple Baseline Template"),
    ("WunderDrug-5678", "WunderDrug Manufacturing (Realistic Example)"),
    (
        "Levera_Drug_-_Albert-Levera_Drug_-_Albert",
        "Levera Drug Production (Complex Example)",
    ),
    ("Equipment_Linking_to_PR-ABCD-REVISED", "Equipment Linking Example"),
    ("Simple_MT-Test_Record_Creation-REVISED", "Simple Master Template"),
];

/// Name derived from a template id: drop a `baseline-` prefix, split on `-`
/// and `_`, capitalize each word
#[must_use]
pub fn display_name(id: &str) -> String {
    let stem = id.strip_prefix("baseline-").unwrap_or(id);
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// File name for a template generated from `id` at `now`
#[must_use]
pub fn output_file_name(id: &str, now: DateTime<Utc>) -> String {
    format!("{id}-{}.mt", now.format("%Y-%m-%d_%H-%M-%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn derives_names_from_ids() {
        assert_eq!(display_name("baseline-tablet_press"), "Tablet Press");
        assert_eq!(display_name("WunderDrug-5678"), "WunderDrug 5678");
        assert_eq!(display_name("a--b"), "A B");
    }

    #[test]
    fn output_names_carry_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 8, 3, 9).unwrap();
        assert_eq!(
            output_file_name("baseline-simple", now),
            "baseline-simple-2024-05-20_08-03-09.mt"
        );
    }
}

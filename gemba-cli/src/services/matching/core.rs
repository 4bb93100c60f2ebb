//! Core matching functions for facility/dataset pairing
//!
//! The heuristic is deliberately loose and can pair short or generic
//! facility names with the wrong export. Iteration order decides ties.

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{FacilityMatch, MatchRule};
use crate::migration::Dataset;

/// First parenthesized group, ASCII or full-width parentheses
static PAREN_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[（(](.+?)[）)]").expect("valid parenthesis pattern"));

/// Generic plant-type words stripped from file-name tags
static GENERIC_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"水処理|水再生|センター|下水道|浄化").expect("valid generic word pattern"));

/// Extract the facility tag from an export file name.
///
/// `点検ツリー（浄水センター）.csv` -> `浄水`. Returns an empty string when
/// the name has no parenthesized group.
pub fn extract_facility_name(file_name: &str) -> String {
    PAREN_GROUP
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|group| GENERIC_WORDS.replace_all(group.as_str(), "").trim().to_string())
        .unwrap_or_default()
}

/// First `n` characters of a name (characters, not bytes)
pub fn name_prefix(name: &str, n: usize) -> &str {
    match name.char_indices().nth(n) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// Pick the dataset for a facility. First match wins.
///
/// A dataset matches when the facility name contains its tag, or when its
/// tag contains the first two characters of the facility name.
pub fn find_dataset<'a>(facility_name: &str, datasets: &'a [Dataset]) -> Option<FacilityMatch<'a>> {
    let prefix = name_prefix(facility_name, 2);

    for dataset in datasets {
        let tag = dataset.facility_tag.as_str();

        let rule = if facility_name.contains(tag) {
            MatchRule::NameContainsTag
        } else if tag.contains(prefix) {
            MatchRule::TagContainsPrefix
        } else {
            continue;
        };

        if tag.is_empty() {
            log::warn!(
                "Dataset {} has no facility tag and matches '{}' unconditionally",
                dataset.source_name,
                facility_name
            );
        }

        log::debug!(
            "Matched '{}' -> {} {}",
            facility_name,
            dataset.source_name,
            rule.label()
        );
        return Some(FacilityMatch { dataset, rule });
    }

    None
}

//! EIDR identifier recognition.
//!
//! Content identifiers live under `10.5240` and carry six hyphenated groups
//! with a trailing check character. Party (`10.5237`) and service
//! (`10.5239`) identifiers carry two groups of four hex digits.

use once_cell::sync::Lazy;
use regex::Regex;

static CONTENT_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^10\.5240/(?:[0-9A-F]{4}-){5}[0-9A-Z]$").expect("content id pattern is valid")
});

static OTHER_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^10\.523[79]/[0-9A-F]{4}-[0-9A-F]{4}$").expect("other id pattern is valid")
});

/// Returns true if `id` has the shape of a content, party or service identifier.
pub fn validate(id: &str) -> bool {
    is_content_id(id) || is_other_id(id)
}

pub fn is_content_id(id: &str) -> bool {
    CONTENT_ID.is_match(id)
}

pub fn is_other_id(id: &str) -> bool {
    OTHER_ID.is_match(id)
}

/// The DOI prefix of an identifier (the part before the first `/`).
pub fn prefix(id: &str) -> &str {
    id.split_once('/').map(|(prefix, _)| prefix).unwrap_or(id)
}

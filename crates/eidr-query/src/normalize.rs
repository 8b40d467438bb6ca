//! Value-wrapping normalizer.
//!
//! The registry returns some fields either as bare text or, when the element
//! carries attributes, as a record holding the text under `value` next to the
//! attribute marker. Rules name those fields by dotted path so that scalars
//! found there can be lifted to `{ "value": scalar }`, giving consumers one
//! shape to read.

use crate::error::{EidrError, Result};
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Key holding the scalar in a wrapped value.
pub const VALUE_KEY: &str = "value";

const WILDCARD: &str = "*";

const DEFAULT_RULES: [&str; 15] = [
    "ResourceName",
    "AlternateResourceName",
    "OriginalLanguage",
    "VersionLanguage",
    "AlternateID",
    "AssociatedOrg.DisplayName",
    "AssociatedOrg.AlternateName",
    "Credits.Actor.DisplayName",
    "Credits.Director.DisplayName",
    "*.SequenceInfo.DistributionNumber",
    "*.SequenceInfo.HouseSequence",
    "PartyName.DisplayName",
    "PartyName.AlternateName",
    "DisplayName",
    "AlternateName",
];

static RULES: Lazy<Vec<WrapRule>> = Lazy::new(|| {
    DEFAULT_RULES
        .iter()
        .map(|rule| rule.parse::<WrapRule>().expect("built-in wrap rule is valid"))
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Any,
}

/// A dotted path whose final segment names scalars to wrap.
///
/// `*` matches any single key and may only appear before the final segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapRule {
    segments: Vec<Segment>,
}

impl FromStr for WrapRule {
    type Err = EidrError;

    fn from_str(rule: &str) -> Result<Self> {
        let parts: Vec<&str> = rule.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(EidrError::invalid(format!(
                "wrap rule '{rule}' has an empty segment"
            )));
        }
        if parts.last() == Some(&WILDCARD) {
            return Err(EidrError::invalid(format!(
                "wrap rule '{rule}' cannot end with a wildcard"
            )));
        }
        let segments = parts
            .into_iter()
            .map(|p| {
                if p == WILDCARD {
                    Segment::Any
                } else {
                    Segment::Key(p.to_string())
                }
            })
            .collect();
        Ok(WrapRule { segments })
    }
}

impl fmt::Display for WrapRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Key(k) => k.as_str(),
                Segment::Any => WILDCARD,
            })
            .collect();
        f.write_str(&parts.join("."))
    }
}

impl WrapRule {
    /// Apply this rule to `tree` in place.
    pub fn apply(&self, tree: &mut Value) {
        apply_segments(tree, &self.segments);
    }
}

/// The rule set used for every record the dispatcher returns.
pub fn default_rules() -> &'static [WrapRule] {
    &RULES
}

/// Normalize `tree` with the default rule set.
pub fn normalize(tree: Value) -> Value {
    normalize_with(tree, default_rules())
}

/// Normalize `tree` with an explicit rule set. Non-object roots are returned unchanged.
pub fn normalize_with(mut tree: Value, rules: &[WrapRule]) -> Value {
    if !tree.is_object() {
        return tree;
    }
    for rule in rules {
        rule.apply(&mut tree);
    }
    tree
}

fn apply_segments(node: &mut Value, segments: &[Segment]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    match node {
        Value::Array(items) => {
            for item in items {
                apply_segments(item, segments);
            }
        }
        Value::Object(map) => match head {
            Segment::Any => {
                for child in map.values_mut() {
                    apply_segments(child, rest);
                }
            }
            Segment::Key(key) => {
                let Some(child) = map.get_mut(key) else {
                    return;
                };
                if rest.is_empty() {
                    wrap_scalars(child);
                } else {
                    apply_segments(child, rest);
                }
            }
        },
        _ => {}
    }
}

fn wrap_scalars(value: &mut Value) {
    match value {
        Value::Object(_) => {}
        Value::Array(items) => {
            for item in items.iter_mut().filter(|item| is_scalar(item)) {
                wrap(item);
            }
        }
        _ => wrap(value),
    }
}

fn is_scalar(value: &Value) -> bool {
    !value.is_object() && !value.is_array()
}

fn wrap(value: &mut Value) {
    let scalar = value.take();
    let mut record = Map::new();
    record.insert(VALUE_KEY.to_string(), scalar);
    *value = Value::Object(record);
}

//! Structured query nodes and their parse step from JSON.
//!
//! A JSON query node is an object with exactly one key naming the
//! predicate or combinator, e.g. `{"title": {"exact": "Abominable"}}` or
//! `{"and": [..]}`. Parsing is exhaustive: unknown keys, extra keys and
//! wrongly-typed arguments are rejected before anything is compiled.

use super::fields::Element;
use crate::error::{EidrError, Result};
use crate::id;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Any path contains any of the words.
    Words,
    /// Any path loosely matches the whole phrase.
    Contains,
    /// Any path is exactly the phrase.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMode {
    Words,
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    On,
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMode {
    Exactly,
    Max,
    Min,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistsTarget {
    Element(Element),
    Date,
    Length,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    And(Vec<QueryNode>),
    Or(Vec<QueryNode>),
    Not(Box<QueryNode>),
    Text {
        element: Element,
        mode: TextMode,
        text: String,
    },
    Id {
        mode: IdMode,
        ids: Vec<String>,
    },
    Date {
        mode: DateMode,
        value: String,
    },
    Length {
        mode: LengthMode,
        value: String,
    },
    Exists(ExistsTarget),
    IsRoot(bool),
    Parent(String),
}

impl QueryNode {
    pub fn text(element: Element, mode: TextMode, text: impl Into<String>) -> Self {
        QueryNode::Text {
            element,
            mode,
            text: text.into(),
        }
    }

    /// Parse a JSON query object into a node tree.
    pub fn from_json(value: &Value) -> Result<Self> {
        let (key, arg) = single_entry(value, "query node")?;

        match key {
            "and" => Ok(QueryNode::And(parse_children(key, arg)?)),
            "or" => Ok(QueryNode::Or(parse_children(key, arg)?)),
            "not" => Ok(QueryNode::Not(Box::new(QueryNode::from_json(arg)?))),
            "id" => parse_id(arg),
            "date" | "before" | "after" => {
                let mode = match key {
                    "date" => DateMode::On,
                    "before" => DateMode::Before,
                    _ => DateMode::After,
                };
                Ok(QueryNode::Date {
                    mode,
                    value: string_arg(key, arg)?.to_string(),
                })
            }
            "length" | "maxlength" | "minlength" => {
                let mode = match key {
                    "length" => LengthMode::Exactly,
                    "maxlength" => LengthMode::Max,
                    _ => LengthMode::Min,
                };
                Ok(QueryNode::Length {
                    mode,
                    value: string_arg(key, arg)?.to_string(),
                })
            }
            "exists" => {
                let name = string_arg(key, arg)?;
                let target = match name {
                    "date" => ExistsTarget::Date,
                    "length" => ExistsTarget::Length,
                    other => ExistsTarget::Element(other.parse().map_err(|_| {
                        EidrError::invalid(format!("exists: unknown element '{other}'"))
                    })?),
                };
                Ok(QueryNode::Exists(target))
            }
            "isroot" => match arg {
                Value::Bool(b) => Ok(QueryNode::IsRoot(*b)),
                other => Err(EidrError::invalid(format!(
                    "isroot expects a boolean, got {other}"
                ))),
            },
            "parent" => Ok(QueryNode::Parent(string_arg(key, arg)?.to_string())),
            other => match other.parse::<Element>() {
                Ok(element) => parse_text(element, arg),
                Err(()) => Err(EidrError::invalid(format!(
                    "unrecognized query element '{other}'"
                ))),
            },
        }
    }
}

/// The sole `(key, value)` of a JSON object.
fn single_entry<'a>(value: &'a Value, what: &str) -> Result<(&'a str, &'a Value)> {
    let map: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| EidrError::invalid(format!("{what} must be an object, got {value}")))?;

    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((key, arg)), None) => Ok((key.as_str(), arg)),
        _ => Err(EidrError::invalid(format!(
            "{what} must have exactly one key, got {value}"
        ))),
    }
}

fn parse_children(key: &str, arg: &Value) -> Result<Vec<QueryNode>> {
    let items = arg
        .as_array()
        .ok_or_else(|| EidrError::invalid(format!("{key} expects an array, got {arg}")))?;
    if items.is_empty() {
        return Err(EidrError::invalid(format!(
            "{key} requires at least one operand"
        )));
    }
    items.iter().map(QueryNode::from_json).collect()
}

fn string_arg<'a>(key: &str, arg: &'a Value) -> Result<&'a str> {
    arg.as_str()
        .ok_or_else(|| EidrError::invalid(format!("{key} expects a string, got {arg}")))
}

fn parse_text(element: Element, arg: &Value) -> Result<QueryNode> {
    let (mode_key, text) = single_entry(arg, element.key())?;
    let mode = match mode_key {
        "words" => TextMode::Words,
        "contains" => TextMode::Contains,
        "exact" => TextMode::Exact,
        other => {
            return Err(EidrError::invalid(format!(
                "{element}: unknown match mode '{other}'"
            )))
        }
    };
    let text = string_arg(&format!("{element}.{mode_key}"), text)?;
    Ok(QueryNode::text(element, mode, text))
}

fn parse_id(arg: &Value) -> Result<QueryNode> {
    let (mode_key, ids) = single_entry(arg, "id")?;
    let mode = match mode_key {
        "words" => IdMode::Words,
        "exact" => IdMode::Exact,
        other => {
            return Err(EidrError::invalid(format!(
                "id: unknown match mode '{other}'"
            )))
        }
    };
    let ids = string_arg(&format!("id.{mode_key}"), ids)?;
    Ok(QueryNode::Id {
        mode,
        ids: ids.split_whitespace().map(str::to_string).collect(),
    })
}

/// Fail unless `value` is a well-formed identifier.
pub(crate) fn require_id(value: &str) -> Result<()> {
    if id::validate(value) {
        Ok(())
    } else {
        Err(EidrError::invalid(format!("invalid EIDR identifier '{value}'")))
    }
}

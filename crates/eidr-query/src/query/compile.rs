//! Compilation of [`QueryNode`] trees into query expressions.

use super::fields::Element;
use super::node::{
    require_id, DateMode, ExistsTarget, IdMode, LengthMode, QueryNode, TextMode,
};
use crate::error::{EidrError, Result};
use crate::expression::{self, LogicalOp, Tree};
use serde_json::Value;
use tracing::debug;

const ID_PATH: &str = "ID";
const RELEASE_DATE_PATH: &str = "ReleaseDate";
const LENGTH_PATH: &str = "ApproximateLength";

/// Extra metadata blocks whose presence marks a record as derived from a parent.
const DERIVATIVE_INFO: [&str; 5] = [
    "SeasonInfo",
    "ClipInfo",
    "ManifestationInfo",
    "EpisodeInfo",
    "EditInfo",
];

/// Compile a node tree into a single expression string.
pub fn compile(node: &QueryNode) -> Result<String> {
    let expr = compile_node(node)?;
    debug!(expression = %expr, "compiled query");
    Ok(expr)
}

/// Parse a JSON query object and compile it.
pub fn compile_json(value: &Value) -> Result<String> {
    compile(&QueryNode::from_json(value)?)
}

fn compile_node(node: &QueryNode) -> Result<String> {
    match node {
        QueryNode::And(children) => combine(LogicalOp::And, children),
        QueryNode::Or(children) => combine(LogicalOp::Or, children),
        QueryNode::Not(child) => expression::negate(&compile_node(child)?),
        QueryNode::Text {
            element,
            mode,
            text,
        } => compile_text(*element, *mode, text),
        QueryNode::Id { mode, ids } => compile_id(*mode, ids),
        QueryNode::Date { mode, value } => {
            let path = Tree::Base.path(RELEASE_DATE_PATH);
            let value = non_blank("date", value)?;
            Ok(match mode {
                DateMode::On => expression::equals(&path, value),
                DateMode::Before => expression::at_most(&path, value),
                DateMode::After => expression::at_least(&path, value),
            })
        }
        QueryNode::Length { mode, value } => {
            let path = Tree::Base.path(LENGTH_PATH);
            let value = non_blank("length", value)?;
            Ok(match mode {
                LengthMode::Exactly => expression::equals(&path, value),
                LengthMode::Max => expression::at_most(&path, value),
                LengthMode::Min => expression::at_least(&path, value),
            })
        }
        QueryNode::Exists(target) => compile_exists(*target),
        QueryNode::IsRoot(is_root) => {
            let leaves: Vec<String> = DERIVATIVE_INFO
                .iter()
                .map(|info| expression::exists(&Tree::Extra.path(info)))
                .collect();
            let derived = expression::join_many(LogicalOp::Or, &leaves)?;
            if *is_root {
                expression::negate(&derived)
            } else {
                Ok(derived)
            }
        }
        QueryNode::Parent(parent) => {
            require_id(parent)?;
            let leaves: Vec<String> = DERIVATIVE_INFO
                .iter()
                .map(|info| {
                    let path = Tree::Extra.path(&format!("{info}/Parent"));
                    expression::equals(&path, parent)
                })
                .collect();
            expression::join_many(LogicalOp::Or, &leaves)
        }
    }
}

fn combine(op: LogicalOp, children: &[QueryNode]) -> Result<String> {
    let compiled = children
        .iter()
        .map(compile_node)
        .collect::<Result<Vec<_>>>()?;
    expression::join_many(op, &compiled)
}

fn compile_text(element: Element, mode: TextMode, text: &str) -> Result<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(EidrError::invalid(format!(
            "{element}: search text is blank"
        )));
    }

    let paths = element.paths();
    let leaves: Vec<String> = match mode {
        TextMode::Words => paths
            .iter()
            .flat_map(|path| tokens.iter().map(move |token| expression::equals(path, token)))
            .collect(),
        TextMode::Contains => {
            let phrase = tokens.join(" ");
            paths
                .iter()
                .map(|path| expression::equals(path, &phrase))
                .collect()
        }
        TextMode::Exact => {
            let phrase = tokens.join(" ");
            paths
                .iter()
                .map(|path| expression::exact(path, &phrase))
                .collect()
        }
    };
    expression::join_many(LogicalOp::Or, &leaves)
}

fn compile_id(mode: IdMode, ids: &[String]) -> Result<String> {
    if ids.is_empty() {
        return Err(EidrError::invalid("id: no identifiers given"));
    }
    for id in ids {
        require_id(id)?;
    }

    let path = Tree::Base.path(ID_PATH);
    match mode {
        IdMode::Words => {
            let leaves: Vec<String> = ids.iter().map(|id| expression::equals(&path, id)).collect();
            expression::join_many(LogicalOp::Or, &leaves)
        }
        IdMode::Exact => match ids {
            [id] => Ok(expression::exact(&path, id)),
            _ => Err(EidrError::invalid(format!(
                "id: exact match takes exactly one identifier, got {}",
                ids.join(" ")
            ))),
        },
    }
}

fn compile_exists(target: ExistsTarget) -> Result<String> {
    let path = match target {
        ExistsTarget::Date => Tree::Base.path(RELEASE_DATE_PATH),
        ExistsTarget::Length => Tree::Base.path(LENGTH_PATH),
        ExistsTarget::Element(element) => element.single_path().ok_or_else(|| {
            EidrError::invalid(format!(
                "exists: '{element}' maps to more than one field path"
            ))
        })?,
    };
    Ok(expression::exists(&path))
}

fn non_blank<'a>(what: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(EidrError::invalid(format!("{what}: value is blank")))
    } else {
        Ok(trimmed)
    }
}

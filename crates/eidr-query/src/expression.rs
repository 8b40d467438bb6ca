//! Building blocks of the registry's query grammar.
//!
//! Every expression is a parenthesized term. Terms are combined with
//! `AND`/`OR`, negated with `NOT`, and leaves address a field by its
//! absolute path under either the base object data or the extra object
//! metadata tree.

use crate::error::{EidrError, Result};
use std::fmt;

/// Root of every field path understood by the query service.
pub const FULL_METADATA: &str = "/FullMetadata";

/// The two metadata trees a field path can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tree {
    /// `BaseObjectData`: the descriptive record every object has.
    Base,
    /// `ExtraObjectMetadata`: per-type information (episodes, edits, ...).
    Extra,
}

impl Tree {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tree::Base => "BaseObjectData",
            Tree::Extra => "ExtraObjectMetadata",
        }
    }

    /// Absolute path of `relative` inside this tree.
    pub fn path(&self, relative: &str) -> String {
        format!("{FULL_METADATA}/{}/{relative}", self.as_str())
    }
}

/// N-ary logical operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join expressions with `op`.
///
/// A single expression is returned as-is; two or more are wrapped in exactly
/// one pair of parentheses.
pub fn join_many<S: AsRef<str>>(op: LogicalOp, exprs: &[S]) -> Result<String> {
    if exprs.is_empty() {
        return Err(EidrError::invalid(format!(
            "{op} requires at least one expression"
        )));
    }

    let mut terms = Vec::with_capacity(exprs.len());
    for (index, expr) in exprs.iter().enumerate() {
        let expr = expr.as_ref().trim();
        if expr.is_empty() {
            return Err(EidrError::invalid(format!(
                "{op} operand {index} is blank"
            )));
        }
        terms.push(expr);
    }

    if terms.len() == 1 {
        return Ok(terms[0].to_string());
    }
    Ok(format!("({})", terms.join(&format!(" {op} "))))
}

/// `(NOT <expr>)`.
pub fn negate(expr: &str) -> Result<String> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(EidrError::invalid("NOT requires a non-blank expression"));
    }
    Ok(format!("(NOT {expr})"))
}

/// Loose (tokenized) match: `(<path> <value>)`.
pub fn equals(path: &str, value: &str) -> String {
    format!("({path} {value})")
}

/// Exact text match: `(<path> IS "<value>")`.
pub fn exact(path: &str, value: &str) -> String {
    format!("({path} IS \"{}\")", escape_quoted(value))
}

/// Inclusive upper bound: `(<path> <= <value>)`.
pub fn at_most(path: &str, value: &str) -> String {
    format!("({path} <= {value})")
}

/// Inclusive lower bound: `(<path> >= <value>)`.
pub fn at_least(path: &str, value: &str) -> String {
    format!("({path} >= {value})")
}

/// `(<path> EXISTS)`.
pub fn exists(path: &str) -> String {
    format!("({path} EXISTS)")
}

fn escape_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

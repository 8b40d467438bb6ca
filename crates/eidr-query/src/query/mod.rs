//! Structured query compiler.
//!
//! Turns a tagged query tree into the registry's field-path expression
//! language.
//!
//! # Module Structure
//!
//! - `fields` - Named elements and the field paths they expand to
//! - `node` - The closed [`QueryNode`] sum type and its JSON parse step
//! - `compile` - Node tree to expression string

mod compile;
mod fields;
mod node;

pub use compile::{compile, compile_json};
pub use fields::Element;
pub use node::{DateMode, ExistsTarget, IdMode, LengthMode, QueryNode, TextMode};

use crate::error::{EidrError, Result};

/// A query as supplied by a caller: either a ready-made expression or a
/// structured tree to compile.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Expression(String),
    Structured(QueryNode),
}

impl Query {
    /// The expression text to send to the registry.
    pub fn to_expression(&self) -> Result<String> {
        match self {
            Query::Expression(expr) => {
                let expr = expr.trim();
                if expr.is_empty() {
                    return Err(EidrError::invalid("query expression is blank"));
                }
                Ok(expr.to_string())
            }
            Query::Structured(node) => compile(node),
        }
    }
}

impl From<QueryNode> for Query {
    fn from(node: QueryNode) -> Self {
        Query::Structured(node)
    }
}

impl From<&str> for Query {
    fn from(expr: &str) -> Self {
        Query::Expression(expr.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_raw_expression_passes_through() {
        let query = Query::from("  (/FullMetadata/BaseObjectData/ResourceName Up)  ");
        assert_eq!(
            query.to_expression().unwrap(),
            "(/FullMetadata/BaseObjectData/ResourceName Up)"
        );
        assert!(Query::from(" ").to_expression().is_err());
    }

    fn leaf() -> impl Strategy<Value = QueryNode> {
        let element = proptest::sample::select(Element::ALL.to_vec());
        let mode = prop_oneof![
            Just(TextMode::Words),
            Just(TextMode::Contains),
            Just(TextMode::Exact)
        ];
        prop_oneof![
            (element, mode, "[a-zA-Z]{1,8}( [a-zA-Z]{1,8}){0,2}")
                .prop_map(|(element, mode, text)| QueryNode::text(element, mode, text)),
            any::<bool>().prop_map(QueryNode::IsRoot),
            "[0-9]{4}".prop_map(|value| QueryNode::Date {
                mode: DateMode::After,
                value
            }),
        ]
    }

    fn tree() -> impl Strategy<Value = QueryNode> {
        leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 1..4).prop_map(QueryNode::And),
                prop::collection::vec(inner.clone(), 1..4).prop_map(QueryNode::Or),
                inner.prop_map(|node| QueryNode::Not(Box::new(node))),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_compile_is_deterministic(node in tree()) {
            let first = compile(&node).unwrap();
            let second = compile(&node.clone()).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.matches('(').count(), first.matches(')').count());
        }
    }
}

//! XML response decoding.
//!
//! Registry responses are XML. They are decoded into a `serde_json::Value`
//! tree using these conventions:
//!
//! - the root element is kept as the single top-level key
//! - repeated sibling elements become an array; a lone element does not
//! - an element holding only text becomes a string (empty elements become `""`)
//! - attributes are collected under `$`, keyed by local name
//! - text next to attributes or child elements is stored under `value`
//! - namespace prefixes are dropped from element and attribute names

use eidr_query::normalize::VALUE_KEY;
use eidr_query::resolve::ATTRIBUTE_MARKER;
use eidr_query::EidrError;
use serde_json::{Map, Value};
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element};
use sxd_document::parser;

/// Decode an XML document into a value tree.
pub fn parse_document(body: &str) -> Result<Value, EidrError> {
    let package = parser::parse(body).map_err(|e| {
        EidrError::UnrecognizedResponse(format!("response is not well-formed XML: {e:?}"))
    })?;
    let document = package.as_document();

    let root = document
        .root()
        .children()
        .into_iter()
        .find_map(|child| match child {
            ChildOfRoot::Element(element) => Some(element),
            _ => None,
        })
        .ok_or_else(|| {
            EidrError::UnrecognizedResponse("response has no root element".to_string())
        })?;

    let mut tree = Map::new();
    tree.insert(root.name().local_part().to_string(), element_to_value(root)?);
    Ok(Value::Object(tree))
}

fn element_to_value(element: Element) -> Result<Value, EidrError> {
    let mut attributes = Map::new();
    for attribute in element.attributes() {
        attributes.insert(
            attribute.name().local_part().to_string(),
            Value::String(attribute.value().to_string()),
        );
    }

    let mut children = Map::new();
    let mut text = String::new();
    for child in element.children() {
        match child {
            ChildOfElement::Element(inner) => {
                let value = element_to_value(inner)?;
                insert_child(&mut children, inner.name().local_part(), value)
            }
            ChildOfElement::Text(t) => text.push_str(t.text()),
            _ => {}
        }
    }
    let text = text.trim();

    if attributes.is_empty() && children.is_empty() {
        return Ok(Value::String(text.to_string()));
    }
    if !text.is_empty() && children.contains_key(VALUE_KEY) {
        return Err(EidrError::UnrecognizedResponse(format!(
            "element '{}' has both text and a '{VALUE_KEY}' child",
            element.name().local_part()
        )));
    }

    let mut record = Map::new();
    if !attributes.is_empty() {
        record.insert(ATTRIBUTE_MARKER.to_string(), Value::Object(attributes));
    }
    if !text.is_empty() {
        record.insert(VALUE_KEY.to_string(), Value::String(text.to_string()));
    }
    record.extend(children);
    Ok(Value::Object(record))
}

/// Insert a child, turning repeated names into arrays.
fn insert_child(children: &mut Map<String, Value>, name: &str, value: Value) {
    match children.get_mut(name) {
        None => {
            children.insert(name.to_string(), value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

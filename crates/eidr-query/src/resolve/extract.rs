//! Status checking and payload extraction over parsed registry documents.

use super::view::Extraction;
use crate::error::{EidrError, Result};
use serde_json::{Map, Value};

/// Key under which the XML decoder places element attributes.
pub const ATTRIBUTE_MARKER: &str = "$";

const RESPONSE: &str = "Response";
const STATUS: &str = "Status";
const SUCCESS_CODE: &str = "0";

/// The part of the document holding `Status` and the payload attributes.
///
/// Error and query responses are wrapped in a `Response` element; resolve
/// responses carry the payload element at the root.
pub fn envelope(doc: &Value) -> &Value {
    doc.get(RESPONSE).unwrap_or(doc)
}

/// Fail if the envelope reports a non-zero registry status.
pub fn check_status(envelope: &Value) -> Result<()> {
    let Some(status) = envelope.get(STATUS) else {
        return Ok(());
    };

    let code = status
        .get("Code")
        .and_then(scalar_text)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| {
            EidrError::UnrecognizedResponse("registry status has no code".to_string())
        })?;
    if code == SUCCESS_CODE {
        return Ok(());
    }

    let message = ["Details", "Type"]
        .iter()
        .find_map(|key| status.get(*key).and_then(scalar_text))
        .unwrap_or_default();
    Err(EidrError::Registry { code, message })
}

/// Text of a scalar or of a wrapped `{ value }` record.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get("value").and_then(scalar_text),
        _ => None,
    }
}

/// Remove the attribute marker from a record's top level.
pub(crate) fn strip_marker(mut record: Map<String, Value>) -> Map<String, Value> {
    record.remove(ATTRIBUTE_MARKER);
    record
}

/// Lift a missing, single or sequence value into a sequence.
pub(crate) fn lift_to_sequence(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(single) => vec![single.clone()],
    }
}

/// Reshape the payload named by `extraction` out of `envelope`.
///
/// `Ok(None)` means the expected attribute or one of its required fields is
/// absent; the caller turns that into an error naming the identifier and view.
pub(crate) fn extract_payload(
    envelope: &Value,
    extraction: &Extraction,
) -> Option<Map<String, Value>> {
    let payload = envelope.get(extraction.attribute())?.as_object()?;

    match extraction {
        Extraction::Merged { .. } => {
            let base = payload.get("BaseObjectData")?.as_object()?;
            let mut merged = strip_marker(base.clone());
            if let Some(Value::Object(extra)) = payload.get("ExtraObjectMetadata") {
                merged.extend(strip_marker(extra.clone()));
            }
            Some(merged)
        }
        Extraction::IdList { property, .. } => {
            let id = payload.get("ID")?;
            let mut record = Map::new();
            record.insert("ID".to_string(), id.clone());
            record.insert(
                property.to_string(),
                Value::Array(lift_to_sequence(payload.get(*property))),
            );
            Some(record)
        }
        Extraction::Stripped { .. } => Some(strip_marker(payload.clone())),
    }
}

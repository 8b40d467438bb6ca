//! Response resolution dispatcher.
//!
//! A resolve call moves through `Dispatch → NetworkCall → StatusCheck →
//! ShapeExtract → Normalize`. Queries add an authorization check before the
//! network call. This module owns every step except the network call itself,
//! which belongs to the transport: [`ResolutionPlan::new`] covers dispatch,
//! [`ResolutionPlan::extract`] covers the status check through
//! normalization, and [`extract_query_results`] is its counterpart for
//! query responses.

mod extract;
mod view;

pub use extract::{check_status, envelope, ATTRIBUTE_MARKER};
pub use view::{extraction_for, Extraction, Namespace, View};

use crate::error::{EidrError, Result};
use crate::normalize::normalize;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// HTTP verb of a registry operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated resolve request: what to call and how to read the answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionPlan {
    pub id: String,
    pub namespace: Namespace,
    pub view: View,
    pub method: Method,
    pub path: String,
    pub extraction: Extraction,
}

impl ResolutionPlan {
    /// Validate `id` and `view` and select the endpoint and extraction.
    pub fn new(id: &str, view: &str) -> Result<Self> {
        let namespace = Namespace::of(id)?;
        let view: View = view.parse()?;
        let extraction = extraction_for(namespace, view).ok_or_else(|| {
            EidrError::unsupported(format!(
                "resolution type '{view}' is not available for {namespace} identifiers"
            ))
        })?;

        let path = format!(
            "{}{}?type={}",
            namespace.resolve_path(),
            urlencoding::encode(id),
            view.as_str()
        );
        debug!(%id, %namespace, %view, %path, "dispatching resolve");

        Ok(Self {
            id: id.to_string(),
            namespace,
            view,
            method: Method::Get,
            path,
            extraction,
        })
    }

    /// Check the registry status, extract this plan's payload and normalize it.
    pub fn extract(&self, doc: &Value) -> Result<Value> {
        let envelope = envelope(doc);
        check_status(envelope)?;

        let record = extract::extract_payload(envelope, &self.extraction).ok_or_else(|| {
            EidrError::UnrecognizedResponse(format!(
                "response for '{}' with resolution type '{}' is missing '{}'",
                self.id,
                self.view,
                self.extraction.attribute()
            ))
        })?;
        Ok(normalize(Value::Object(record)))
    }
}

/// Which list a query returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultFormat {
    /// Simple metadata records.
    #[default]
    Metadata,
    /// Bare identifiers.
    IdOnly,
}

impl ResultFormat {
    fn list_key(&self) -> &'static str {
        match self {
            ResultFormat::Metadata => "SimpleMetadata",
            ResultFormat::IdOnly => "ID",
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResults {
    pub total_matches: u64,
    pub results: Vec<Value>,
}

/// Check the status of a query response and pull out its result page.
pub fn extract_query_results(doc: &Value, format: ResultFormat) -> Result<QueryResults> {
    let envelope = envelope(doc);
    check_status(envelope)?;

    let unrecognized = |what: &str| {
        EidrError::UnrecognizedResponse(format!("query response is missing {what}"))
    };

    let query_results = envelope
        .get("QueryResults")
        .and_then(Value::as_object)
        .ok_or_else(|| unrecognized("'QueryResults'"))?;

    let total_matches = query_results
        .get("TotalMatches")
        .and_then(extract::scalar_text)
        .and_then(|text| text.parse::<u64>().ok())
        .ok_or_else(|| unrecognized("a numeric 'TotalMatches'"))?;

    let results = extract::lift_to_sequence(query_results.get(format.list_key()))
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => normalize(Value::Object(extract::strip_marker(record))),
            other => other,
        })
        .collect();

    Ok(QueryResults {
        total_matches,
        results,
    })
}

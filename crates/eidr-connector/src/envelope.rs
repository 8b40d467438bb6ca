//! Query request envelope.

use eidr_query::id;
use eidr_query::EidrError;

const SCHEMA_NAMESPACE: &str = "http://www.eidr.org/schema";

/// Paging and scoping options for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// 1-based page number
    pub page_number: u32,
    /// `None` uses the configured default
    pub page_size: Option<u32>,
    /// Restrict the search to descendants of this record
    pub root: Option<String>,
    /// Return bare identifiers instead of simple metadata
    pub ids_only: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: None,
            root: None,
            ids_only: false,
        }
    }
}

impl QueryOptions {
    pub fn validate(&self) -> Result<(), EidrError> {
        if self.page_number == 0 {
            return Err(EidrError::invalid("page number must be at least 1"));
        }
        if self.page_size == Some(0) {
            return Err(EidrError::invalid("page size must be at least 1"));
        }
        if let Some(root) = &self.root {
            if !id::validate(root) {
                return Err(EidrError::invalid(format!(
                    "invalid root identifier '{root}'"
                )));
            }
        }
        Ok(())
    }
}

/// Build the XML body of a query request.
pub fn query_body(
    expression: &str,
    page_number: u32,
    page_size: u32,
    root: Option<&str>,
) -> String {
    let root = root
        .map(|id| format!("<ID>{id}</ID>"))
        .unwrap_or_default();
    format!(
        "<Request xmlns=\"{SCHEMA_NAMESPACE}\"><Operation><Query>{root}<Expression><![CDATA[{}]]></Expression><PageNumber>{page_number}</PageNumber><PageSize>{page_size}</PageSize></Query></Operation></Request>",
        escape_cdata(expression)
    )
}

/// Split any `]]>` so it cannot terminate the CDATA section early.
fn escape_cdata(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}

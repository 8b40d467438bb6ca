//! Registry client: drives resolve and query calls end to end.

use crate::config::ConnectorConfig;
use crate::credentials::Credentials;
use crate::envelope::{query_body, QueryOptions};
use crate::transport::{HttpTransport, RegistryRequest, Transport};
use eidr_query::resolve::Method;
use eidr_query::{
    extract_query_results, EidrError, Query, QueryResults, ResolutionPlan, ResultFormat,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

const QUERY_PATH: &str = "/EIDR/query/";

pub struct Registry {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    api_version: String,
    default_page_size: u32,
}

impl Registry {
    /// Client talking HTTP to the configured endpoint.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self, EidrError> {
        let transport = HttpTransport::new(config.base_url(), config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &ConnectorConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            credentials: config.credentials.clone(),
            api_version: config.api_version.clone(),
            default_page_size: config.page_size,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Resolve `id` to the record shape selected by `view`.
    pub async fn resolve(&self, id: &str, view: &str) -> Result<Value, EidrError> {
        let plan = ResolutionPlan::new(id, view)?;
        info!(%id, view = %plan.view, "resolving");

        let request = self.request(plan.method, plan.path.clone(), None);
        let doc = self.transport.send(request).await.inspect_err(|e| {
            warn!(%id, error = %e, "resolve failed");
        })?;

        plan.extract(&doc).inspect_err(|e| {
            warn!(%id, view = %plan.view, error = %e, "resolve failed");
        })
    }

    /// Run a query. Requires fully authenticated credentials.
    pub async fn query(
        &self,
        query: impl Into<Query>,
        options: &QueryOptions,
    ) -> Result<QueryResults, EidrError> {
        let expression = query.into().to_expression()?;
        options.validate()?;
        if !self.credentials.is_authenticated() {
            return Err(EidrError::Unauthorized(
                "queries require user, party and password credentials".to_string(),
            ));
        }

        let page_size = options.page_size.unwrap_or(self.default_page_size);
        let (path, format) = if options.ids_only {
            (format!("{QUERY_PATH}?type=ID"), ResultFormat::IdOnly)
        } else {
            (QUERY_PATH.to_string(), ResultFormat::Metadata)
        };
        let body = query_body(
            &expression,
            options.page_number,
            page_size,
            options.root.as_deref(),
        );
        info!(%expression, page = options.page_number, page_size, "querying");

        let doc = self
            .transport
            .send(self.request(Method::Post, path, Some(body)))
            .await
            .inspect_err(|e| warn!(error = %e, "query failed"))?;

        extract_query_results(&doc, format).inspect_err(|e| warn!(error = %e, "query failed"))
    }

    fn request(&self, method: Method, path: String, body: Option<String>) -> RegistryRequest {
        let mut headers = vec![
            ("Content-Type".to_string(), "text/xml".to_string()),
            ("EIDR-Version".to_string(), self.api_version.clone()),
        ];
        if let Some(authorization) = self.credentials.authorization() {
            headers.push(("Authorization".to_string(), authorization));
        }
        RegistryRequest {
            method,
            path,
            headers,
            body,
        }
    }
}

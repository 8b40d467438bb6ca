//! End-to-end tests for the registry client against a scripted transport.

use assert_json_diff::assert_json_eq;
use async_trait::async_trait;
use eidr_connector::xml::parse_document;
use eidr_connector::{
    ConnectorConfig, Credentials, QueryOptions, Registry, RegistryRequest, Transport,
};
use eidr_query::resolve::Method;
use eidr_query::{EidrError, ErrorKind, QueryNode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

const CONTENT_ID: &str = "10.5240/5CA7-2626-3EF6-2B05-AD9C-M";
const PARTY_ID: &str = "10.5237/9F2B-A0E3";

/// Transport that records every request and replays a canned XML body.
struct ScriptedTransport {
    reply: Result<String, EidrError>,
    requests: Mutex<Vec<RegistryRequest>>,
}

impl ScriptedTransport {
    fn xml(body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(body.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(err: EidrError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<RegistryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: RegistryRequest) -> Result<Value, EidrError> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Ok(body) => parse_document(body),
            Err(e) => Err(e.clone()),
        }
    }
}

fn config(credentials: Credentials) -> ConnectorConfig {
    ConnectorConfig {
        endpoint: "https://sandbox1.eidr.org".to_string(),
        credentials,
        ..Default::default()
    }
}

fn authenticated() -> Credentials {
    Credentials::new("10.5238/ABCD-0123", PARTY_ID, "c2hhZG93")
}

const FULL_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<FullMetadata xmlns="http://www.eidr.org/schema">
  <BaseObjectData>
    <ID>10.5240/5CA7-2626-3EF6-2B05-AD9C-M</ID>
    <StructuralType>Performance</StructuralType>
    <Mode>AudioVisual</Mode>
    <ReferentType>Movie</ReferentType>
    <ResourceName lang="en" titleClass="release">Abominable</ResourceName>
    <OriginalLanguage mode="Audio" type="primary">en</OriginalLanguage>
    <AssociatedOrg idType="EIDRPartyID" organizationID="10.5237/9F2B-A0E3" role="producer">
      <DisplayName>DreamWorks Animation</DisplayName>
    </AssociatedOrg>
    <ReleaseDate>2019</ReleaseDate>
    <Credits>
      <Director><DisplayName>Jill Culton</DisplayName></Director>
      <Actor><DisplayName>Chloe Bennet</DisplayName></Actor>
      <Actor><DisplayName>Albert Tsai</DisplayName></Actor>
    </Credits>
    <AlternateID type="IMDB">tt6324278</AlternateID>
  </BaseObjectData>
</FullMetadata>"#;

#[tokio::test]
async fn test_resolve_full_record() {
    let transport = ScriptedTransport::xml(FULL_RESPONSE);
    let registry = Registry::with_transport(&config(Credentials::anonymous()), transport.clone());

    let record = registry.resolve(CONTENT_ID, "Full").await.unwrap();

    assert_json_eq!(
        record,
        json!({
            "ID": CONTENT_ID,
            "StructuralType": "Performance",
            "Mode": "AudioVisual",
            "ReferentType": "Movie",
            "ResourceName": {"$": {"lang": "en", "titleClass": "release"}, "value": "Abominable"},
            "OriginalLanguage": {"$": {"mode": "Audio", "type": "primary"}, "value": "en"},
            "AssociatedOrg": {
                "$": {"idType": "EIDRPartyID", "organizationID": PARTY_ID, "role": "producer"},
                "DisplayName": {"value": "DreamWorks Animation"}
            },
            "ReleaseDate": "2019",
            "Credits": {
                "Director": {"DisplayName": {"value": "Jill Culton"}},
                "Actor": [
                    {"DisplayName": {"value": "Chloe Bennet"}},
                    {"DisplayName": {"value": "Albert Tsai"}}
                ]
            },
            "AlternateID": {"$": {"type": "IMDB"}, "value": "tt6324278"}
        })
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(
        request.path,
        "/EIDR/object/10.5240%2F5CA7-2626-3EF6-2B05-AD9C-M?type=Full"
    );
    assert_eq!(request.header("Content-Type"), Some("text/xml"));
    assert_eq!(request.header("EIDR-Version"), Some("2.7.1"));
    assert_eq!(request.header("Authorization"), None);
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_resolve_missing_attribute_is_unrecognized() {
    let transport = ScriptedTransport::xml(
        "<SimpleMetadata><ID>10.5240/5CA7-2626-3EF6-2B05-AD9C-M</ID></SimpleMetadata>",
    );
    let registry = Registry::with_transport(&config(Credentials::anonymous()), transport);

    let err = registry.resolve(CONTENT_ID, "Full").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnrecognizedResponse);
    assert!(err.detail().contains(CONTENT_ID));
    assert!(err.detail().contains("Full"));
}

#[tokio::test]
async fn test_resolve_party_kernel() {
    let transport = ScriptedTransport::xml(
        r#"<kernelMetadata version="2.0"><referent>10.5237/9F2B-A0E3</referent><primaryTitle>DreamWorks</primaryTitle></kernelMetadata>"#,
    );
    let registry = Registry::with_transport(&config(authenticated()), transport.clone());

    let record = registry.resolve(PARTY_ID, "DOIKernel").await.unwrap();
    assert_json_eq!(
        record,
        json!({"referent": PARTY_ID, "primaryTitle": "DreamWorks"})
    );
    assert_eq!(
        transport.requests()[0].path,
        "/EIDR/party/resolve/10.5237%2F9F2B-A0E3?type=DOIKernel"
    );
    assert_eq!(
        transport.requests()[0].header("Authorization"),
        Some("Eidr 10.5238/ABCD-0123:10.5237/9F2B-A0E3:c2hhZG93")
    );
}

#[tokio::test]
async fn test_local_validation_precedes_network() {
    let transport = ScriptedTransport::xml(FULL_RESPONSE);
    let registry = Registry::with_transport(&config(authenticated()), transport.clone());

    let err = registry.resolve("10.5240/ABC", "Full").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = registry.resolve(PARTY_ID, "Provenance").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
    assert!(err.detail().contains("Provenance"));

    let bad_query = QueryNode::from_json(&json!({"id": {"exact": "10.5240/ABC"}})).unwrap();
    let err = registry
        .query(bad_query, &QueryOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_registry_status_access_denied() {
    let transport = ScriptedTransport::xml(
        "<Response><Status><Code>5</Code><Type>authorization error</Type></Status></Response>",
    );
    let registry = Registry::with_transport(&config(authenticated()), transport);

    let err = registry.resolve(CONTENT_ID, "Simple").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RegistryError);
    assert!(err.is_access_denied());
    assert_eq!(err.detail(), "[5] authorization error");
}

#[tokio::test]
async fn test_transport_error_passes_through() {
    let transport = ScriptedTransport::failing(EidrError::Transport {
        status: 503,
        message: "Service Unavailable".to_string(),
    });
    let registry = Registry::with_transport(&config(authenticated()), transport);

    let err = registry.resolve(CONTENT_ID, "Full").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert_eq!(err.status_code(), 503);
}

#[tokio::test]
async fn test_query_requires_authentication() {
    let transport = ScriptedTransport::xml("<Response/>");
    let registry = Registry::with_transport(&config(Credentials::anonymous()), transport.clone());

    let err = registry
        .query("(/FullMetadata/BaseObjectData/ResourceName Up)", &QueryOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.status_code(), 401);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_query_metadata_results() {
    let transport = ScriptedTransport::xml(
        r#"<Response xmlns="http://www.eidr.org/schema" version="2.7.1">
  <Status><Code>0</Code><Type>success</Type></Status>
  <QueryResults>
    <TotalMatches>1</TotalMatches>
    <SimpleMetadata>
      <ID>10.5240/5CA7-2626-3EF6-2B05-AD9C-M</ID>
      <ResourceName lang="en">Abominable</ResourceName>
      <ReferentType>Movie</ReferentType>
    </SimpleMetadata>
  </QueryResults>
</Response>"#,
    );
    let registry = Registry::with_transport(&config(authenticated()), transport.clone());

    let query = QueryNode::from_json(&json!({
        "and": [
            {"title": {"exact": "Abominable"}},
            {"reftype": {"exact": "Movie"}}
        ]
    }))
    .unwrap();
    let results = registry.query(query, &QueryOptions::default()).await.unwrap();

    assert_eq!(results.total_matches, 1);
    assert_json_eq!(
        Value::Array(results.results),
        json!([{
            "ID": CONTENT_ID,
            "ResourceName": {"$": {"lang": "en"}, "value": "Abominable"},
            "ReferentType": "Movie"
        }])
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path, "/EIDR/query/");
    assert_eq!(
        requests[0].body.as_deref(),
        Some(
            "<Request xmlns=\"http://www.eidr.org/schema\"><Operation><Query>\
             <Expression><![CDATA[(((/FullMetadata/BaseObjectData/ResourceName IS \"Abominable\") OR \
             (/FullMetadata/BaseObjectData/AlternateResourceName IS \"Abominable\")) AND \
             (/FullMetadata/BaseObjectData/ReferentType IS \"Movie\"))]]></Expression>\
             <PageNumber>1</PageNumber><PageSize>25</PageSize></Query></Operation></Request>"
        )
    );
}

#[tokio::test]
async fn test_query_ids_only_with_root() {
    let transport = ScriptedTransport::xml(
        "<Response><Status><Code>0</Code></Status><QueryResults><TotalMatches>42</TotalMatches>\
         <ID>10.5240/0000-0000-0000-0000-0000-7</ID><ID>10.5240/1111-1111-1111-1111-1111-X</ID>\
         </QueryResults></Response>",
    );
    let registry = Registry::with_transport(&config(authenticated()), transport.clone());

    let options = QueryOptions {
        page_number: 2,
        page_size: Some(2),
        root: Some(CONTENT_ID.to_string()),
        ids_only: true,
    };
    let results = registry
        .query(QueryNode::IsRoot(false), &options)
        .await
        .unwrap();

    assert_eq!(results.total_matches, 42);
    assert_eq!(
        results.results,
        vec![
            json!("10.5240/0000-0000-0000-0000-0000-7"),
            json!("10.5240/1111-1111-1111-1111-1111-X")
        ]
    );

    let request = &transport.requests()[0];
    assert_eq!(request.path, "/EIDR/query/?type=ID");
    let body = request.body.as_deref().unwrap();
    assert!(body.contains(&format!("<Query><ID>{CONTENT_ID}</ID><Expression>")));
    assert!(body.contains("<PageNumber>2</PageNumber><PageSize>2</PageSize>"));
}

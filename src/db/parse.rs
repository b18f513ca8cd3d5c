use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::{Map, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::core::config::Settings;
use crate::db::{Document, DocumentStore, Filter, StoreError};

const RESERVED_FIELDS: &[&str] = &["objectId", "createdAt", "updatedAt", "ACL"];

/// REST client for a hosted Parse server (Back4App).
#[derive(Debug, Clone)]
pub(crate) struct ParseStore {
    client: Client,
    server_url: String,
    app_id: String,
    javascript_key: String,
}

impl ParseStore {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let parse = settings.parse();
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(parse.timeout_seconds))
            .build()
            .context("Failed to build Parse HTTP client")?;

        Ok(Self::new(client, &parse.server_url, &parse.app_id, &parse.javascript_key))
    }

    pub(crate) fn new(client: Client, server_url: &str, app_id: &str, javascript_key: &str) -> Self {
        Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            javascript_key: javascript_key.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.server_url, path))
            .header("X-Parse-Application-Id", &self.app_id)
            .header("X-Parse-JavaScript-Key", &self.javascript_key)
    }

    async fn read_json(response: reqwest::Response) -> Result<(StatusCode, Value), StoreError> {
        let status = response.status();
        let raw_body = response.text().await?;
        let parsed = serde_json::from_str::<Value>(&raw_body).map_err(|err| {
            StoreError::Protocol(format!("non-JSON body (status {status}): {err}: {raw_body}"))
        })?;
        Ok((status, parsed))
    }
}

#[async_trait]
impl DocumentStore for ParseStore {
    fn backend(&self) -> &'static str {
        "parse"
    }

    async fn insert(&self, class: &str, fields: Map<String, Value>) -> Result<String, StoreError> {
        let response = self
            .request(Method::POST, &format!("classes/{class}"))
            .json(&Value::Object(fields))
            .send()
            .await?;
        let (status, body) = Self::read_json(response).await?;

        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        body.get("objectId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| StoreError::Protocol(format!("create response missing objectId: {body}")))
    }

    async fn get(&self, class: &str, id: &str) -> Result<Option<Document>, StoreError> {
        if !is_valid_object_id(id) {
            return Ok(None);
        }

        let response =
            self.request(Method::GET, &format!("classes/{class}/{id}")).send().await?;
        // Proxies in front of Parse may answer 404 with an HTML page.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let (status, body) = Self::read_json(response).await?;

        if is_object_not_found(&body) {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        document_from_object(body).map(Some)
    }

    async fn find_first(
        &self,
        class: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let where_clause = filter.to_json().to_string();
        let response = self
            .request(Method::GET, &format!("classes/{class}"))
            .query(&[("where", where_clause.as_str()), ("limit", "1"), ("order", "createdAt")])
            .send()
            .await?;
        let (status, body) = Self::read_json(response).await?;

        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let results = body
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| StoreError::Protocol(format!("query response missing results: {body}")))?;

        results.first().cloned().map(document_from_object).transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let response = self.request(Method::GET, "health").send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::Rejected { status: status.as_u16(), message: "health check failed".into() })
        }
    }
}

fn document_from_object(value: Value) -> Result<Document, StoreError> {
    let Value::Object(mut fields) = value else {
        return Err(StoreError::Protocol(format!("expected object, got {value}")));
    };

    let id = fields
        .get("objectId")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| StoreError::Protocol("object missing objectId".to_string()))?;

    let created_at = fields
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok());

    for reserved in RESERVED_FIELDS {
        fields.remove(*reserved);
    }

    Ok(Document { id, created_at, fields })
}

// Ids are spliced into the request path.
fn is_valid_object_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// Parse reports a missing object as code 101 regardless of HTTP status.
fn is_object_not_found(payload: &Value) -> bool {
    payload.get("code").and_then(Value::as_i64) == Some(101)
}

fn extract_error_message(payload: &Value) -> String {
    payload
        .get("error")
        .and_then(Value::as_str)
        .or_else(|| payload.get("message").and_then(Value::as_str))
        .unwrap_or("unknown_error")
        .to_string()
}

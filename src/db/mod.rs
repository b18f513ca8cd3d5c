pub(crate) mod memory;
pub(crate) mod models;
pub(crate) mod parse;
pub(crate) mod postgres;
pub(crate) mod types;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::config::{Settings, StoreBackend};
use crate::core::metrics;
use crate::db::models::{Record, Stored};

/// One schemaless document as the store hands it back.
#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub(crate) id: String,
    pub(crate) created_at: Option<OffsetDateTime>,
    pub(crate) fields: Map<String, Value>,
}

/// Conjunction of exact-match constraints on top-level fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Filter {
    constraints: Map<String, Value>,
}

impl Filter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.constraints.insert(field.to_string(), value.into());
        self
    }

    pub(crate) fn matches(&self, fields: &Map<String, Value>) -> bool {
        self.constraints.iter().all(|(field, expected)| fields.get(field) == Some(expected))
    }

    pub(crate) fn to_json(&self) -> Value {
        Value::Object(self.constraints.clone())
    }
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("document mapping failed: {0}")]
    Mapping(#[from] serde_json::Error),
    #[error("unexpected store response: {0}")]
    Protocol(String),
}

#[async_trait]
pub(crate) trait DocumentStore: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Persists a new document and returns its store-assigned id.
    async fn insert(&self, class: &str, fields: Map<String, Value>) -> Result<String, StoreError>;

    /// `Ok(None)` when no document of `class` has this id.
    async fn get(&self, class: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// First document in store order matching `filter`.
    async fn find_first(&self, class: &str, filter: &Filter)
        -> Result<Option<Document>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub(crate) async fn init_store(settings: &Settings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match settings.store().backend {
        StoreBackend::Parse => Arc::new(parse::ParseStore::from_settings(settings)?),
        StoreBackend::Postgres => {
            let store = postgres::PostgresStore::connect(settings).await?;
            store.run_migrations().await?;
            Arc::new(store)
        }
        StoreBackend::Memory => Arc::new(memory::MemoryStore::new()),
    };

    Ok(store)
}

pub(crate) async fn insert_record<R: Record>(
    store: &dyn DocumentStore,
    record: &R,
) -> Result<String, StoreError> {
    let result = match serde_json::to_value(record)? {
        Value::Object(fields) => store.insert(R::CLASS, fields).await,
        other => Err(StoreError::Protocol(format!(
            "{} did not encode to an object: {other}",
            R::CLASS
        ))),
    };
    metrics::record_store_operation(store.backend(), "insert", result.is_ok());
    result
}

pub(crate) async fn get_record<R: Record>(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Stored<R>>, StoreError> {
    let result = store.get(R::CLASS, id).await;
    metrics::record_store_operation(store.backend(), "get", result.is_ok());
    result?.map(decode::<R>).transpose()
}

pub(crate) async fn find_first_record<R: Record>(
    store: &dyn DocumentStore,
    filter: &Filter,
) -> Result<Option<Stored<R>>, StoreError> {
    let result = store.find_first(R::CLASS, filter).await;
    metrics::record_store_operation(store.backend(), "find_first", result.is_ok());
    result?.map(decode::<R>).transpose()
}

fn decode<R: Record>(document: Document) -> Result<Stored<R>, StoreError> {
    let record = serde_json::from_value(Value::Object(document.fields))?;
    Ok(Stored { id: document.id, created_at: document.created_at, record })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_matches_all_constraints() {
        let filter = Filter::new().eq("examName", "Physics").eq("status", "active");
        let mut fields = Map::new();
        fields.insert("examName".to_string(), json!("Physics"));
        fields.insert("status".to_string(), json!("active"));
        fields.insert("totalQuestions".to_string(), json!(44));
        assert!(filter.matches(&fields));

        fields.insert("status".to_string(), json!("retired"));
        assert!(!filter.matches(&fields));
    }

    #[test]
    fn filter_requires_field_presence() {
        let filter = Filter::new().eq("registrationNumber", "REG-1");
        assert!(!filter.matches(&Map::new()));
    }

    #[test]
    fn filter_serializes_to_where_clause() {
        let filter = Filter::new().eq("registrationNumber", "REG-1");
        assert_eq!(filter.to_json(), json!({"registrationNumber": "REG-1"}));
    }
}

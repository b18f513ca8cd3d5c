use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::time::now_utc;
use crate::db::{Document, DocumentStore, Filter, StoreError};

/// Process-local store for development runs and tests. Documents of each class keep
/// insertion order.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    classes: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn count(&self, class: &str) -> usize {
        self.classes.read().await.get(class).map(Vec::len).unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, class: &str, fields: Map<String, Value>) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        let document = Document { id: id.clone(), created_at: Some(now_utc()), fields };
        self.classes.write().await.entry(class.to_string()).or_default().push(document);
        Ok(id)
    }

    async fn get(&self, class: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let classes = self.classes.read().await;
        Ok(classes
            .get(class)
            .and_then(|documents| documents.iter().find(|document| document.id == id))
            .cloned())
    }

    async fn find_first(
        &self,
        class: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let classes = self.classes.read().await;
        Ok(classes
            .get(class)
            .and_then(|documents| documents.iter().find(|document| filter.matches(&document.fields)))
            .cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let first = store.insert("Candidate", fields(&[("registrationNumber", json!("R1"))])).await;
        let second = store.insert("Candidate", fields(&[("registrationNumber", json!("R1"))])).await;

        let (first, second) = (first.expect("first"), second.expect("second"));
        assert!(!first.is_empty());
        assert_ne!(first, second);
        assert_eq!(store.count("Candidate").await, 2);
    }

    #[tokio::test]
    async fn find_first_returns_earliest_match() {
        let store = MemoryStore::new();
        let first = store
            .insert("ExamResult", fields(&[("registrationNumber", json!("R1")), ("n", json!(1))]))
            .await
            .expect("first");
        store
            .insert("ExamResult", fields(&[("registrationNumber", json!("R1")), ("n", json!(2))]))
            .await
            .expect("second");

        let found = store
            .find_first("ExamResult", &Filter::new().eq("registrationNumber", "R1"))
            .await
            .expect("query")
            .expect("match");
        assert_eq!(found.id, first);
        assert_eq!(found.fields["n"], 1);
    }

    #[tokio::test]
    async fn classes_are_isolated() {
        let store = MemoryStore::new();
        let id = store
            .insert("Candidate", fields(&[("registrationNumber", json!("R1"))]))
            .await
            .expect("insert");

        assert!(store.get("ExamResult", &id).await.expect("get").is_none());
        assert!(store
            .find_first("ExamResult", &Filter::new().eq("registrationNumber", "R1"))
            .await
            .expect("query")
            .is_none());
        assert!(store.get("Candidate", &id).await.expect("get").is_some());
    }
}

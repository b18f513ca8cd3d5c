use crate::db::models::{AnswerKey, Stored};
use crate::db::types::AnswerKeyStatus;
use crate::db::{self, DocumentStore, Filter, StoreError};

pub(crate) async fn create(store: &dyn DocumentStore, key: &AnswerKey) -> Result<String, StoreError> {
    db::insert_record(store, key).await
}

pub(crate) async fn find_active_by_exam_name(
    store: &dyn DocumentStore,
    exam_name: &str,
) -> Result<Option<Stored<AnswerKey>>, StoreError> {
    let filter = Filter::new()
        .eq("examName", exam_name)
        .eq("status", serde_json::to_value(AnswerKeyStatus::Active)?);
    db::find_first_record(store, &filter).await
}

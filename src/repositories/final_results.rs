use crate::db::models::FinalResult;
use crate::db::{self, DocumentStore, StoreError};

pub(crate) async fn create(
    store: &dyn DocumentStore,
    result: &FinalResult,
) -> Result<String, StoreError> {
    db::insert_record(store, result).await
}

use crate::db::models::{ExamResult, Stored};
use crate::db::{self, DocumentStore, Filter, StoreError};

pub(crate) async fn create(
    store: &dyn DocumentStore,
    result: &ExamResult,
) -> Result<String, StoreError> {
    db::insert_record(store, result).await
}

pub(crate) async fn find_by_registration_number(
    store: &dyn DocumentStore,
    registration_number: &str,
) -> Result<Option<Stored<ExamResult>>, StoreError> {
    let filter = Filter::new().eq("registrationNumber", registration_number);
    db::find_first_record(store, &filter).await
}

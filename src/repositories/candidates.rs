use crate::db::models::{Candidate, Stored};
use crate::db::{self, DocumentStore, Filter, StoreError};

pub(crate) async fn create(
    store: &dyn DocumentStore,
    candidate: &Candidate,
) -> Result<String, StoreError> {
    db::insert_record(store, candidate).await
}

pub(crate) async fn find_by_id(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Stored<Candidate>>, StoreError> {
    db::get_record(store, id).await
}

pub(crate) async fn find_by_registration_number(
    store: &dyn DocumentStore,
    registration_number: &str,
) -> Result<Option<Stored<Candidate>>, StoreError> {
    let filter = Filter::new().eq("registrationNumber", registration_number);
    db::find_first_record(store, &filter).await
}

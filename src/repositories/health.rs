use crate::db::{DocumentStore, StoreError};

pub(crate) async fn ping(store: &dyn DocumentStore) -> Result<(), StoreError> {
    store.ping().await
}

use std::sync::Arc;

use crate::core::config::Settings;
use crate::db::DocumentStore;
use crate::services::omr_processor::OmrProcessor;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    store: Arc<dyn DocumentStore>,
    omr: OmrProcessor,
}

impl AppState {
    pub(crate) fn new(settings: Settings, store: Arc<dyn DocumentStore>, omr: OmrProcessor) -> Self {
        Self { inner: Arc::new(InnerState { settings, store, omr }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    pub(crate) fn omr(&self) -> &OmrProcessor {
        &self.inner.omr
    }
}

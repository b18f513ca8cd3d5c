pub(crate) mod api;
pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod repositories;
pub(crate) mod schemas;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use crate::core::{config::Settings, state::AppState, telemetry};
use crate::services::omr_processor::OmrProcessor;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    if settings.omr().base_url_defaulted {
        tracing::warn!(
            omr_api_url = %settings.omr().base_url,
            "OMR_API_URL is not set; using the local development default"
        );
    }

    let store = db::init_store(&settings).await?;
    if let Err(err) = repositories::health::ping(store.as_ref()).await {
        tracing::error!(
            error = %err,
            backend = store.backend(),
            "Document store health check failed; continuing"
        );
    } else {
        tracing::info!(backend = store.backend(), "Document store reachable");
    }

    let omr = OmrProcessor::from_settings(&settings)?;
    let state = AppState::new(settings, store, omr);

    let app = api::router::router(state.clone());
    let listener = tokio::net::TcpListener::bind(state.settings().server_addr()).await?;

    tracing::info!(
        host = %state.settings().server_host(),
        port = state.settings().server_port(),
        environment = %state.settings().runtime().environment.as_str(),
        store_backend = state.settings().store().backend.as_str(),
        omr_endpoint = %state.omr().endpoint(),
        "ExamFlow API listening"
    );

    axum::serve(listener, app).with_graceful_shutdown(core::shutdown::shutdown_signal()).await?;

    tracing::info!("ExamFlow API stopped");
    Ok(())
}

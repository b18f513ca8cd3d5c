use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::IgnoredAny;

use crate::core::config::Settings;
use crate::core::metrics;
use crate::schemas::omr::OmrResult;
use crate::services::synthetic_omr;

const LOGGED_BODY_CHARS: usize = 500;

/// One multipart field of the incoming upload, forwarded as-is.
#[derive(Debug, Clone)]
pub(crate) struct UploadPart {
    pub(crate) name: String,
    pub(crate) file_name: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) bytes: Vec<u8>,
}

#[derive(Debug)]
pub(crate) enum OmrOutcome {
    /// Upstream response body, unmodified.
    Upstream(Bytes),
    Synthetic(OmrResult),
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum UpstreamError {
    #[error("OMR service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("OMR service returned a non-JSON body: {0}")]
    InvalidBody(String),
    #[error("OMR service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("OMR service did not answer within {0:?}")]
    Timeout(Duration),
}

impl UpstreamError {
    fn reason(&self) -> &'static str {
        match self {
            Self::Status { .. } => "upstream_status",
            Self::InvalidBody(_) => "invalid_body",
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OmrProcessor {
    client: Client,
    endpoint: String,
    timeout: Duration,
    synthetic_fallback: bool,
    synthetic_questions: u32,
}

impl OmrProcessor {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let omr = settings.omr();
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build OMR HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/process-omr", omr.base_url.trim_end_matches('/')),
            timeout: Duration::from_secs(omr.timeout_seconds),
            synthetic_fallback: omr.synthetic_fallback,
            synthetic_questions: omr.synthetic_questions,
        })
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Forwards the upload once. Failures turn into a synthetic result unless the
    /// fallback is switched off, in which case the upstream error is returned.
    pub(crate) async fn process(&self, parts: Vec<UploadPart>) -> Result<OmrOutcome, UpstreamError> {
        let started = Instant::now();
        let attempt = tokio::time::timeout(self.timeout, self.forward(parts)).await;
        let elapsed = started.elapsed();

        let error = match attempt {
            Ok(Ok(body)) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    latency_ms = elapsed.as_millis() as u64,
                    body_bytes = body.len(),
                    "OMR service processed sheet"
                );
                metrics::record_omr_submission("upstream", elapsed);
                return Ok(OmrOutcome::Upstream(body));
            }
            Ok(Err(err)) => err,
            Err(_) => UpstreamError::Timeout(self.timeout),
        };

        if !self.synthetic_fallback {
            tracing::error!(
                endpoint = %self.endpoint,
                latency_ms = elapsed.as_millis() as u64,
                reason = error.reason(),
                error = %error,
                "OMR service failed and synthetic fallback is disabled"
            );
            metrics::record_omr_submission("failed", elapsed);
            return Err(error);
        }

        tracing::warn!(
            endpoint = %self.endpoint,
            latency_ms = elapsed.as_millis() as u64,
            reason = error.reason(),
            error = %error,
            "OMR service failed; returning synthetic result"
        );
        metrics::record_omr_submission("synthetic", elapsed);
        let result = synthetic_omr::generate(&mut rand::thread_rng(), self.synthetic_questions);
        Ok(OmrOutcome::Synthetic(result))
    }

    async fn forward(&self, parts: Vec<UploadPart>) -> Result<Bytes, UpstreamError> {
        let form = build_form(parts)?;
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&String::from_utf8_lossy(&body)),
            });
        }

        serde_json::from_slice::<IgnoredAny>(&body).map_err(|err| {
            UpstreamError::InvalidBody(format!(
                "{err}: {}",
                truncate_for_log(&String::from_utf8_lossy(&body))
            ))
        })?;

        Ok(body)
    }
}

fn build_form(parts: Vec<UploadPart>) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();
    for upload in parts {
        let mut part = Part::bytes(upload.bytes);
        if let Some(file_name) = upload.file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = upload.content_type {
            part = part.mime_str(&content_type)?;
        }
        form = form.part(upload.name, part);
    }
    Ok(form)
}

fn truncate_for_log(body: &str) -> String {
    if body.chars().count() <= LOGGED_BODY_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(LOGGED_BODY_CHARS).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_for_log("model crashed"), "model crashed");
    }

    #[test]
    fn truncate_caps_long_bodies() {
        let body = "x".repeat(2_000);
        let truncated = truncate_for_log(&body);
        assert_eq!(truncated.len(), LOGGED_BODY_CHARS + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn build_form_rejects_invalid_content_type() {
        let parts = vec![UploadPart {
            name: "file".to_string(),
            file_name: Some("sheet.jpg".to_string()),
            content_type: Some("not a mime".to_string()),
            bytes: b"img".to_vec(),
        }];
        assert!(build_form(parts).is_err());
    }

    #[test]
    fn failure_reasons_are_stable() {
        assert_eq!(UpstreamError::Timeout(Duration::from_secs(1)).reason(), "timeout");
        assert_eq!(
            UpstreamError::Status { status: 500, body: String::new() }.reason(),
            "upstream_status"
        );
    }
}

use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::errors::ApiError;

/// JSON body that has been deserialized and passed its `Validate` rules. Both
/// failures surface as 400.
pub(crate) struct ValidatedJson<T>(pub(crate) T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        payload.validate().map_err(|errors| ApiError::BadRequest(errors.to_string()))?;
        Ok(Self(payload))
    }
}

/// Query parameters arrive as `Option`; blank values count as missing.
pub(crate) fn require_param(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {name} parameter")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_param_rejects_missing_and_blank() {
        assert!(require_param(None, "examName").is_err());
        assert!(require_param(Some("   ".to_string()), "examName").is_err());
        assert_eq!(require_param(Some("Physics".to_string()), "examName").unwrap(), "Physics");
    }

    #[test]
    fn missing_param_message_names_the_parameter() {
        match require_param(None, "registrationNumber") {
            Err(ApiError::BadRequest(message)) => {
                assert_eq!(message, "Missing registrationNumber parameter")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}

//! JSON body extractor with validation using the validator crate.

use crate::errors::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

/// JSON extractor with validation.
///
/// Reads the whole body and deserializes it regardless of `Content-Type`.
/// Every failure is a `400`:
/// - unreadable body, malformed JSON, or JSON that is not an object (arrays,
///   scalars, `null`): `INVALID_JSON`
/// - `Validate` rule violations: `VALIDATION_ERROR` with per-field details
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct NewItem {
///     #[validate(length(max = 50))]
///     name: String,
/// }
///
/// async fn create(ValidatedJson(item): ValidatedJson<NewItem>) -> String {
///     item.name
/// }
///
/// let app = Router::new().route("/items", post(create));
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            AppError::InvalidJson(format!("Failed to read request body: {}", e.body_text()))
                .into_response()
        })?;

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::InvalidJson(e.to_string()).into_response())?;

        // Derived struct deserializers also accept sequences
        if !value.is_object() {
            return Err(
                AppError::InvalidJson("request body must be a JSON object".to_string())
                    .into_response(),
            );
        }

        let data: T = serde_json::from_value(value)
            .map_err(|e| AppError::InvalidJson(e.to_string()).into_response())?;

        data.validate()
            .map_err(|e| AppError::ValidationError(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

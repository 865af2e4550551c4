//! Integer id path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Extractor for a non-zero, base-10 `i64` id path parameter.
///
/// Anything else (`abc`, `1.5`, `0`, out-of-range numbers) is rejected with
/// `400 INVALID_ID` before the handler runs.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_user(IdPath(id): IdPath) -> String {
///     format!("User ID: {}", id)
/// }
///
/// let app = Router::new().route("/users/{id}", get(get_user));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

impl IdPath {
    /// Parse a raw path segment
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let id: i64 = raw
            .parse()
            .map_err(|_| AppError::InvalidId(format!("id must be an integer, got '{}'", raw)))?;

        if id == 0 {
            return Err(AppError::InvalidId("id can't be 0".to_string()));
        }

        Ok(IdPath(id))
    }
}

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidId(e.body_text()).into_response())?;

        IdPath::parse(&raw).map_err(IntoResponse::into_response)
    }
}

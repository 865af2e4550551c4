use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(i64),

    /// The storage backend failed; `operation` names the repository call and
    /// `id` the user it targeted, if any
    #[error("Failed to {operation}{}: {source}", id_suffix(.id))]
    Storage {
        operation: &'static str,
        id: Option<i64>,
        #[source]
        source: sea_orm::DbErr,
    },
}

fn id_suffix(id: &Option<i64>) -> String {
    id.map(|id| format!(" {}", id)).unwrap_or_default()
}

impl UserError {
    /// Storage failure of an operation that targets no single user
    pub fn storage(operation: &'static str, source: sea_orm::DbErr) -> Self {
        Self::Storage {
            operation,
            id: None,
            source,
        }
    }

    /// Storage failure of an operation on user `id`
    pub fn storage_for(operation: &'static str, id: i64, source: sea_orm::DbErr) -> Self {
        Self::Storage {
            operation,
            id: Some(id),
            source,
        }
    }
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            UserError::Storage { .. } => AppError::Database(err.to_string()),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = UserError::NotFound(5).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_maps_to_500_and_keeps_operation() {
        let err = UserError::storage("list users", sea_orm::DbErr::Custom("timeout".into()));
        assert!(err.to_string().starts_with("Failed to list users"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_message_names_the_user() {
        let err = UserError::storage_for("get user", 42, sea_orm::DbErr::Custom("timeout".into()));
        assert!(err.to_string().starts_with("Failed to get user 42: "));
        assert!(err.to_string().contains("timeout"));

        match AppError::from(err) {
            AppError::Database(msg) => assert!(msg.contains("get user 42")),
            other => panic!("expected Database, got {other:?}"),
        }
    }
}

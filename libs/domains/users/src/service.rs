use std::sync::Arc;
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{User, UserInput};
use crate::repository::UserRepository;

/// Service layer for User operations.
///
/// Every call forwards to the repository unchanged, inside its own span.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user
    #[instrument(skip(self, input))]
    pub async fn create_user(&self, input: UserInput) -> UserResult<User> {
        self.repository.create(input).await
    }

    /// Get a user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> UserResult<User> {
        self.repository.get_by_id(id).await
    }

    /// List all users
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    /// Replace a user's fields
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: i64, input: UserInput) -> UserResult<User> {
        self.repository.update(id, input).await
    }

    /// Delete a user
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        self.repository.delete(id).await
    }
}

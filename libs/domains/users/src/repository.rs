use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserInput};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user under a freshly assigned id
    async fn create(&self, input: UserInput) -> UserResult<User>;

    /// Get a user by ID, `NotFound` if absent
    async fn get_by_id(&self, id: i64) -> UserResult<User>;

    /// All users in ascending id order
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Replace name, age and sex of an existing user
    async fn update(&self, id: i64, input: UserInput) -> UserResult<User>;

    /// Delete a user by ID, `NotFound` if absent
    async fn delete(&self, id: i64) -> UserResult<()>;
}

#[derive(Debug)]
struct Store {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            users: BTreeMap::new(),
        }
    }
}

/// In-memory implementation of UserRepository.
///
/// Ids start at 1 and are never reused, even after deletes. Clones share the
/// same store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: UserInput) -> UserResult<User> {
        let mut store = self.store.write().await;

        let id = store.next_id;
        store.next_id += 1;

        let user = User::from_input(id, input);
        store.users.insert(id, user.clone());

        tracing::info!(user_id = id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: i64) -> UserResult<User> {
        let store = self.store.read().await;
        store.users.get(&id).cloned().ok_or(UserError::NotFound(id))
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn update(&self, id: i64, input: UserInput) -> UserResult<User> {
        let mut store = self.store.write().await;

        let user = store.users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        *user = User::from_input(id, input);
        let updated = user.clone();

        tracing::info!(user_id = id, "Updated user");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> UserResult<()> {
        let mut store = self.store.write().await;

        store.users.remove(&id).ok_or(UserError::NotFound(id))?;

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}

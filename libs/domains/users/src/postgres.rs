use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{User, UserInput},
    repository::UserRepository,
};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `users` table if it does not exist yet
    pub async fn init_schema(&self) -> UserResult<()> {
        self.db
            .execute_unprepared(entity::CREATE_TABLE_SQL)
            .await
            .map_err(|e| UserError::storage("create users table", e))?;

        tracing::info!("Users table is ready");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: UserInput) -> UserResult<User> {
        let active_model = entity::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            age: Set(input.age),
            sex: Set(input.sex),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| UserError::storage("create user", e))?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> UserResult<User> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UserError::storage_for("get user", id, e))?
            .ok_or(UserError::NotFound(id))?;

        Ok(model.into())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| UserError::storage("list users", e))?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, input: UserInput) -> UserResult<User> {
        let active_model = entity::ActiveModel {
            id: Unchanged(id),
            name: Set(input.name),
            age: Set(input.age),
            sex: Set(input.sex),
            created_at: NotSet,
            updated_at: Set(chrono::Utc::now().fixed_offset()),
        };

        let model = match active_model.update(&self.db).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => return Err(UserError::NotFound(id)),
            Err(e) => return Err(UserError::storage_for("update user", id, e)),
        };

        tracing::info!(user_id = id, "Updated user");
        Ok(model.into())
    }

    async fn delete(&self, id: i64) -> UserResult<()> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UserError::storage_for("delete user", id, e))?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id));
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: i64, name: &str) -> entity::Model {
        let now = chrono::Utc::now().fixed_offset();
        entity::Model {
            id,
            name: name.to_string(),
            age: 30,
            sex: "F".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn input(name: &str) -> UserInput {
        UserInput {
            name: name.to_string(),
            age: 30,
            sex: "F".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_returns_stored_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "Ann")]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user = repo.create(input("Ann")).await.unwrap();
        assert_eq!(user, User::from_input(1, input("Ann")));
    }

    #[tokio::test]
    async fn test_get_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let result = repo.get_by_id(3).await;
        assert!(matches!(result, Err(UserError::NotFound(3))));
    }

    #[tokio::test]
    async fn test_list_maps_rows_in_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "a"), model(2, "b")]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let users = repo.list().await.unwrap();
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_update_without_matching_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let result = repo.update(8, input("x")).await;
        assert!(matches!(result, Err(UserError::NotFound(8))));
    }

    #[tokio::test]
    async fn test_delete_reports_not_found_when_nothing_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgUserRepository::new(db);

        repo.delete(1).await.unwrap();
        assert!(matches!(repo.delete(1).await, Err(UserError::NotFound(1))));
    }

    #[tokio::test]
    async fn test_query_failure_is_storage_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let result = repo.list().await;
        assert!(matches!(
            result,
            Err(UserError::Storage {
                operation: "list users",
                id: None,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_lookup_failure_carries_user_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".into())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let err = repo.get_by_id(4242).await.unwrap_err();
        assert!(matches!(
            err,
            UserError::Storage {
                operation: "get user",
                id: Some(4242),
                ..
            }
        ));
        assert!(err.to_string().starts_with("Failed to get user 4242"));
    }
}

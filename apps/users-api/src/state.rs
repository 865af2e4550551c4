//! Application state management.
//!
//! This module defines the shared application state handed to the routers:
//! - Configuration
//! - The user store selected by `STORAGE_BACKEND`

use domain_users::{InMemoryUserRepository, PgUserRepository};
use tracing::info;

use crate::config::{Config, StorageBackend};

/// The backing store for users, one variant per [`StorageBackend`].
#[derive(Clone)]
pub enum Storage {
    /// PostgreSQL connection pool
    Postgres(database::postgres::DatabaseConnection),
    /// Process-local store, lost on restart
    Memory(InMemoryUserRepository),
}

impl Storage {
    pub fn backend(&self) -> StorageBackend {
        match self {
            Storage::Postgres(_) => StorageBackend::Postgres,
            Storage::Memory(_) => StorageBackend::Memory,
        }
    }
}

/// Shared application state.
///
/// Cloning is cheap: both stores are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    pub storage: Storage,
}

impl AppState {
    /// Opens the store named by `config.storage`.
    ///
    /// For PostgreSQL this connects with retry and creates the users table.
    pub async fn connect(config: Config) -> eyre::Result<Self> {
        let storage = match config.storage {
            StorageBackend::Postgres => {
                let db = database::postgres::connect_from_config_with_retry(
                    config.database.clone(),
                    config.retry.clone(),
                )
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

                PgUserRepository::new(db.clone())
                    .init_schema()
                    .await
                    .map_err(|e| eyre::eyre!("Schema initialization failed: {}", e))?;

                Storage::Postgres(db)
            }
            StorageBackend::Memory => {
                info!("Using in-memory storage, data is lost on restart");
                Storage::Memory(InMemoryUserRepository::new())
            }
        };

        Ok(Self { config, storage })
    }

    /// State backed by a fresh in-memory store, for tests.
    #[cfg(test)]
    pub fn in_memory(config: Config) -> Self {
        Self {
            config,
            storage: Storage::Memory(InMemoryUserRepository::new()),
        }
    }

    /// Releases the store's resources on shutdown.
    pub async fn close(self) {
        if let Storage::Postgres(db) = self.storage {
            info!("Shutting down: closing database connections");
            database::postgres::close(db).await;
        }
    }
}

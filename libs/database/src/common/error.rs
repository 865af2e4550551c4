/// Error type for connection management and health probing
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Connection could not be established within the retry budget
    #[cfg(feature = "postgres")]
    #[error("Connection to {target} failed after {attempts} attempt(s): {source}")]
    ConnectionFailed {
        target: String,
        attempts: u32,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A stored invariant is broken (for example two ranked scores for
    /// one player in the same zone). This signals prior data corruption;
    /// the recalculation pass aborts instead of attempting repair.
    #[error("Consistency violation: {0}")]
    Consistency(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

//! Error types for the persistence layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors with additional context about which operation failed.
//! Compare-and-swap failures surface as [`DbError::Conflict`] so callers
//! can apply their retry-once policy.

/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A conditional write found the row changed since it was read.
    ///
    /// Never silently applied: the caller re-reads, re-validates and
    /// retries once, or surfaces the conflict.
    #[error("write conflict on {entity}")]
    Conflict {
        /// The entity whose compare-and-swap failed.
        entity: &'static str,
    },

    /// A requested row does not exist.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing row.
        what: String,
    },

    /// A stored value could not be decoded into its domain type.
    #[error("corrupt row: {context}")]
    Decode {
        /// What failed to decode.
        context: String,
    },

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Whether this error is a compare-and-swap conflict.
    ///
    /// Conflicts are the only transient, caller-retryable failure in the
    /// taxonomy.
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

//! Errors from building and executing statements.

use thiserror::Error;

/// Result of a build, execution or pool call.
pub type DbResult<T> = Result<T, DbError>;

/// Everything a [`DbAdapter`](crate::DbAdapter) or the pool can fail with.
///
/// Build-time problems are always [`DbError::Configuration`] and nothing is
/// sent; everything else comes back from the server or the pool.
#[derive(Debug, Error)]
pub enum DbError {
    /// The pending statement cannot be built, or an `exec_*` call does not
    /// match its kind.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `connect` could not reach the server.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server rejected a rendered statement.
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// An INSERT with RETURNING produced no row.
    #[error("Not found: {0}")]
    NotFound(String),

    /// SQLSTATE 23505 on an INSERT or UPDATE.
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// SQLSTATE 23503.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A returned column did not decode into the requested type.
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// No pooled connection could be checked out.
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    #[error("{0}")]
    Other(String),
}

impl DbError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Whether the statement was rejected before reaching the server.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Classify a driver error by SQLSTATE; unknown codes stay [`DbError::Query`].
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{constraint}: {message}")),
                "23503" => return Self::ForeignKeyViolation(format!("{constraint}: {message}")),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

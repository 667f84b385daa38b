//! Translate pool and Diesel failures into repository port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through the port's connection constructor.
pub(super) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.detail().to_owned())
}

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum DieselFailure {
    /// The server dropped the connection.
    Connection(&'static str),
    /// A unique constraint rejected the write; carries the constraint name.
    UniqueViolation(Option<String>),
    /// Anything else.
    Query(&'static str),
}

/// Classify a Diesel error, logging the driver detail at debug level.
pub(super) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            match kind {
                DatabaseErrorKind::ClosedConnection => {
                    DieselFailure::Connection("database connection error")
                }
                DatabaseErrorKind::UniqueViolation => {
                    DieselFailure::UniqueViolation(info.constraint_name().map(str::to_owned))
                }
                _ => DieselFailure::Query("database error"),
            }
        }
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        other => {
            debug!(error = %other, "diesel operation failed");
            DieselFailure::Query("database error")
        }
    }
}

/// Map a Diesel error through query and connection constructors.
///
/// Unique violations are reported as query errors; repositories with a
/// dedicated conflict variant inspect [`classify_diesel_error`] first.
pub(super) fn map_diesel_error<E>(
    error: &DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::UniqueViolation(_) => query("unique constraint violated"),
        DieselFailure::Query(message) => query(message),
    }
}

//! Shared mapping from Diesel and pool failures to port error constructors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through the port's connection constructor.
pub(super) fn map_pool_error<E, C>(error: &PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.message().to_owned())
}

/// Map a Diesel failure through the port's query or connection constructor.
///
/// Lost connections become connection errors so callers can answer with
/// `service_unavailable`. Everything else is a query error. Database
/// messages are logged at debug level and never forwarded.
pub(super) fn map_diesel_error<E, Q, C>(error: &DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
            _,
        )
        | DieselError::BrokenTransactionManager => connection("database connection error"),
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("database constraint violated")
        }
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        _ => query("database error"),
    }
}

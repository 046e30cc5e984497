//! Translation of sqlx failures into store errors.

use domain::StoreError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps a sqlx error to the backend-neutral [`StoreError`].
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) => {
            let constraint = db.constraint().unwrap_or_default().to_string();
            match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => StoreError::UniqueViolation(constraint),
                Some(FOREIGN_KEY_VIOLATION) => StoreError::MissingReference(
                    fk_column(&constraint, db.table().unwrap_or_default()),
                ),
                _ => StoreError::Query(db.message().to_string()),
            }
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(e.to_string()),
        sqlx::Error::Tls(e) => StoreError::Unavailable(e.to_string()),
        sqlx::Error::Protocol(msg) => StoreError::Unavailable(msg),
        sqlx::Error::PoolTimedOut => StoreError::Unavailable("connection pool timed out".into()),
        sqlx::Error::PoolClosed => StoreError::Unavailable("connection pool closed".into()),
        sqlx::Error::WorkerCrashed => StoreError::Unavailable("database worker crashed".into()),
        e @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)) => StoreError::InvalidRow(e.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}

/// Extracts the referencing column from a default PostgreSQL foreign key name.
///
/// `zone_drivers_driver_id_fkey` on table `zone_drivers` yields `driver_id`.
/// Names that do not follow the convention are returned unchanged.
pub fn fk_column(constraint: &str, table: &str) -> String {
    let without_suffix = constraint.strip_suffix("_fkey").unwrap_or(constraint);
    let prefix = format!("{}_", table);
    without_suffix
        .strip_prefix(prefix.as_str())
        .unwrap_or(without_suffix)
        .to_string()
}

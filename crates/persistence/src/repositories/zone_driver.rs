//! Zone membership repository.

use async_trait::async_trait;
use domain::models::ZoneDriverInfo;
use domain::stores::{AssignmentStore, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::ZoneDriverEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// Repository for the zone_drivers join table.
///
/// The composite primary key `(zone_id, driver_id)` is what keeps assignment
/// idempotent; inserts never check for an existing row first.
#[derive(Clone)]
pub struct ZoneDriverRepository {
    pool: PgPool,
}

impl ZoneDriverRepository {
    /// Creates a new ZoneDriverRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for ZoneDriverRepository {
    async fn insert_assignment(&self, zone_id: Uuid, driver_id: Uuid) -> StoreResult<()> {
        let timer = QueryTimer::new("insert_zone_driver");

        let result = sqlx::query("INSERT INTO zone_drivers (zone_id, driver_id) VALUES ($1, $2)")
            .bind(zone_id)
            .bind(driver_id)
            .execute(&self.pool)
            .await;

        timer.record();
        result.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn list_zone_drivers(&self, zone_id: Uuid) -> StoreResult<Vec<ZoneDriverInfo>> {
        let timer = QueryTimer::new("list_zone_drivers");

        let result = sqlx::query_as::<_, ZoneDriverEntity>(
            r#"
            SELECT d.id AS driver_id, d.name, d.phone, zd.assigned_at
            FROM zone_drivers zd
            JOIN drivers d ON d.id = zd.driver_id
            WHERE zd.zone_id = $1
            ORDER BY zd.assigned_at, d.id
            "#,
        )
        .bind(zone_id)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        Ok(result
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(ZoneDriverInfo::from)
            .collect())
    }

    async fn delete_assignment(&self, zone_id: Uuid, driver_id: Uuid) -> StoreResult<bool> {
        let timer = QueryTimer::new("delete_zone_driver");

        let result = sqlx::query("DELETE FROM zone_drivers WHERE zone_id = $1 AND driver_id = $2")
            .bind(zone_id)
            .bind(driver_id)
            .execute(&self.pool)
            .await;

        timer.record();
        Ok(result.map_err(map_sqlx_error)?.rows_affected() > 0)
    }
}

//! Driver repository.

use std::collections::HashMap;

use async_trait::async_trait;
use domain::models::{Driver, DriverWithZones, NewDriver, ZoneSummary};
use domain::stores::{DriverStore, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{DriverEntity, DriverZoneEntity};
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// Repository for driver database operations.
#[derive(Clone)]
pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    /// Creates a new DriverRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn zones_for_drivers(
        &self,
        driver_ids: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, Vec<ZoneSummary>>> {
        let timer = QueryTimer::new("list_zones_for_drivers");

        let result = sqlx::query_as::<_, DriverZoneEntity>(
            r#"
            SELECT zd.driver_id, z.id AS zone_id, z.name AS zone_name, z.color AS zone_color
            FROM zone_drivers zd
            JOIN zones z ON z.id = zd.zone_id
            WHERE zd.driver_id = ANY($1)
            ORDER BY zd.assigned_at
            "#,
        )
        .bind(driver_ids)
        .fetch_all(&self.pool)
        .await;

        timer.record();

        let mut by_driver: HashMap<Uuid, Vec<ZoneSummary>> = HashMap::new();
        for row in result.map_err(map_sqlx_error)? {
            by_driver.entry(row.driver_id).or_default().push(ZoneSummary {
                id: row.zone_id,
                name: row.zone_name,
                color: row.zone_color,
            });
        }
        Ok(by_driver)
    }
}

#[async_trait]
impl DriverStore for DriverRepository {
    async fn insert_driver(&self, driver: NewDriver) -> StoreResult<Driver> {
        let timer = QueryTimer::new("insert_driver");

        let result = sqlx::query_as::<_, DriverEntity>(
            r#"
            INSERT INTO drivers (owner_id, name, phone, password_hash, account_details, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING id, owner_id, name, phone, account_details, is_active, created_at
            "#,
        )
        .bind(driver.owner_id)
        .bind(&driver.name)
        .bind(&driver.phone)
        .bind(&driver.password_hash)
        .bind(&driver.account_details)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        Ok(result.map_err(map_sqlx_error)?.into())
    }

    async fn list_active_drivers(&self) -> StoreResult<Vec<DriverWithZones>> {
        let timer = QueryTimer::new("list_active_drivers");

        let result = sqlx::query_as::<_, DriverEntity>(
            r#"
            SELECT id, owner_id, name, phone, account_details, is_active, created_at
            FROM drivers
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        timer.record();

        let drivers: Vec<Driver> = result
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(Driver::from)
            .collect();
        if drivers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = drivers.iter().map(|d| d.id).collect();
        let mut zones = self.zones_for_drivers(&ids).await?;

        Ok(drivers
            .into_iter()
            .map(|driver| DriverWithZones {
                zones: zones.remove(&driver.id).unwrap_or_default(),
                driver,
            })
            .collect())
    }
}

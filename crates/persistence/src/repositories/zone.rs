//! Zone repository.

use async_trait::async_trait;
use domain::models::{NewZone, Zone, ZonePatch};
use domain::stores::{StoreResult, ZoneStore};
use domain::StoreError;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::entities::ZoneEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

const ZONE_COLUMNS: &str =
    "id, owner_id, name, description, geometry, polygon, color, is_active, created_at, updated_at";

/// Repository for zone database operations.
#[derive(Clone)]
pub struct ZoneRepository {
    pool: PgPool,
}

impl ZoneRepository {
    /// Creates a new ZoneRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn geometry_json(zone_geometry: &domain::models::ZoneGeometry) -> StoreResult<serde_json::Value> {
    serde_json::to_value(zone_geometry).map_err(|e| StoreError::Query(e.to_string()))
}

#[async_trait]
impl ZoneStore for ZoneRepository {
    async fn insert_zone(&self, zone: NewZone) -> StoreResult<Zone> {
        let timer = QueryTimer::new("insert_zone");
        let geometry = geometry_json(&zone.geometry)?;

        let result = sqlx::query_as::<_, ZoneEntity>(&format!(
            r#"
            INSERT INTO zones (owner_id, name, description, geometry, color, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING {ZONE_COLUMNS}
            "#
        ))
        .bind(zone.owner_id)
        .bind(&zone.name)
        .bind(&zone.description)
        .bind(geometry)
        .bind(&zone.color)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result.map_err(map_sqlx_error)?.try_into()
    }

    async fn find_zone(&self, id: Uuid) -> StoreResult<Option<Zone>> {
        let timer = QueryTimer::new("find_zone_by_id");

        let result = sqlx::query_as::<_, ZoneEntity>(&format!(
            "SELECT {ZONE_COLUMNS} FROM zones WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result.map_err(map_sqlx_error)?.map(Zone::try_from).transpose()
    }

    async fn list_zones(&self, active_only: bool) -> StoreResult<Vec<Zone>> {
        let timer = QueryTimer::new("list_zones");

        let result = sqlx::query_as::<_, ZoneEntity>(&format!(
            r#"
            SELECT {ZONE_COLUMNS}
            FROM zones
            WHERE ($1 = FALSE OR is_active = TRUE)
            ORDER BY created_at DESC, id
            "#
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await;

        timer.record();

        let zones = result
            .map_err(map_sqlx_error)?
            .into_iter()
            .filter_map(|entity| match Zone::try_from(entity) {
                Ok(zone) => Some(zone),
                Err(e) => {
                    warn!(error = %e, "Skipping zone row");
                    None
                }
            })
            .collect();

        Ok(zones)
    }

    async fn update_zone(&self, id: Uuid, patch: ZonePatch) -> StoreResult<Option<Zone>> {
        let timer = QueryTimer::new("update_zone");
        let geometry = patch.geometry.as_ref().map(geometry_json).transpose()?;

        let result = sqlx::query_as::<_, ZoneEntity>(&format!(
            r#"
            UPDATE zones
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                geometry = COALESCE($4, geometry),
                color = COALESCE($5, color),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ZONE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(geometry)
        .bind(patch.color)
        .bind(patch.is_active)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result.map_err(map_sqlx_error)?.map(Zone::try_from).transpose()
    }

    async fn delete_zone(&self, id: Uuid) -> StoreResult<bool> {
        let timer = QueryTimer::new("delete_zone");

        // zone_drivers rows go with the zone through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM zones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        timer.record();
        Ok(result.map_err(map_sqlx_error)?.rows_affected() > 0)
    }
}

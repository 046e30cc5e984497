//! Warehouse repository.

use async_trait::async_trait;
use domain::models::{NewWarehouse, Warehouse, WarehouseWithZone};
use domain::stores::{StoreResult, WarehouseStore};
use sqlx::PgPool;
use tracing::warn;

use crate::entities::{WarehouseEntity, WarehouseWithZoneEntity};
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// Repository for warehouse database operations.
#[derive(Clone)]
pub struct WarehouseRepository {
    pool: PgPool,
}

impl WarehouseRepository {
    /// Creates a new WarehouseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WarehouseStore for WarehouseRepository {
    async fn insert_warehouse(&self, warehouse: NewWarehouse) -> StoreResult<Warehouse> {
        let timer = QueryTimer::new("insert_warehouse");

        let result = sqlx::query_as::<_, WarehouseEntity>(
            r#"
            INSERT INTO warehouses (
                owner_id, name, description, address, city, state, country, postal_code,
                latitude, longitude, phone, email, manager_name, manager_phone,
                working_hours, capacity, warehouse_type, features, assigned_zone_id, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, TRUE)
            RETURNING
                id, owner_id, name, description, address, city, state, country, postal_code,
                latitude, longitude, phone, email, manager_name, manager_phone,
                working_hours, capacity, warehouse_type, features, assigned_zone_id,
                is_active, created_at
            "#,
        )
        .bind(warehouse.owner_id)
        .bind(&warehouse.name)
        .bind(&warehouse.description)
        .bind(&warehouse.address)
        .bind(&warehouse.city)
        .bind(&warehouse.state)
        .bind(&warehouse.country)
        .bind(&warehouse.postal_code)
        .bind(warehouse.latitude)
        .bind(warehouse.longitude)
        .bind(&warehouse.phone)
        .bind(&warehouse.email)
        .bind(&warehouse.manager_name)
        .bind(&warehouse.manager_phone)
        .bind(&warehouse.working_hours)
        .bind(warehouse.capacity)
        .bind(warehouse.warehouse_type.as_str())
        .bind(&warehouse.features)
        .bind(warehouse.assigned_zone_id)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result.map_err(map_sqlx_error)?.try_into()
    }

    async fn list_active_warehouses(&self) -> StoreResult<Vec<WarehouseWithZone>> {
        let timer = QueryTimer::new("list_active_warehouses");

        let result = sqlx::query_as::<_, WarehouseWithZoneEntity>(
            r#"
            SELECT
                w.id, w.owner_id, w.name, w.description, w.address, w.city, w.state,
                w.country, w.postal_code, w.latitude, w.longitude, w.phone, w.email,
                w.manager_name, w.manager_phone, w.working_hours, w.capacity,
                w.warehouse_type, w.features, w.assigned_zone_id, w.is_active, w.created_at,
                z.id AS zone_ref_id, z.name AS zone_name, z.color AS zone_color
            FROM warehouses w
            LEFT JOIN zones z ON z.id = w.assigned_zone_id
            WHERE w.is_active = TRUE
            ORDER BY w.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        timer.record();

        Ok(result
            .map_err(map_sqlx_error)?
            .into_iter()
            .filter_map(|entity| match WarehouseWithZone::try_from(entity) {
                Ok(warehouse) => Some(warehouse),
                Err(e) => {
                    warn!(error = %e, "Skipping warehouse row");
                    None
                }
            })
            .collect())
    }
}

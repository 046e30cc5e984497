use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use domain::services::{
    DriverRegistry, DriverZoneLinker, GeometryStore, WarehouseRegistry, ZoneAssignmentResolver,
};
use domain::errors::DomainError;
use domain::stores::Stores;
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Config, DatabaseConfig};
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{auth, drivers, health, warehouses, zone_drivers, zones};
use crate::services::auth::SessionAuthenticator;
use crate::services::cookies::CookieHelper;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub stores: Stores,
    /// Present when running against PostgreSQL; `None` for the in-memory backend.
    pub pool: Option<PgPool>,
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookieHelper,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn new(config: Config, stores: Stores, pool: Option<PgPool>) -> Result<Self, JwtError> {
        let jwt = Arc::new(config.jwt.signing_config()?);
        let cookies = CookieHelper::new(config.cookies.clone(), jwt.session_expiry_secs);
        let rate_limiter = RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new);

        Ok(Self {
            config: Arc::new(config),
            stores,
            pool,
            jwt,
            cookies,
            rate_limiter,
        })
    }

    pub fn geometry_store(&self) -> GeometryStore {
        GeometryStore::new(
            self.stores.zones.clone(),
            self.config.zones.default_color.clone(),
        )
    }

    pub fn zone_resolver(&self) -> ZoneAssignmentResolver {
        ZoneAssignmentResolver::new(self.stores.zones.clone())
    }

    pub fn driver_zone_linker(&self) -> DriverZoneLinker {
        DriverZoneLinker::new(self.stores.zones.clone(), self.stores.assignments.clone())
    }

    pub fn warehouse_registry(&self) -> WarehouseRegistry {
        WarehouseRegistry::new(
            self.stores.warehouses.clone(),
            self.zone_resolver(),
            self.config.warehouses.defaults(),
        )
    }

    pub fn driver_registry(&self) -> DriverRegistry {
        DriverRegistry::new(
            self.stores.drivers.clone(),
            self.stores.zones.clone(),
            self.driver_zone_linker(),
        )
    }

    pub fn authenticator(&self) -> SessionAuthenticator {
        SessionAuthenticator::new(self.stores.users.clone(), self.jwt.clone())
    }
}

/// Builds the application over PostgreSQL.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let stores = persistence::stores(pool.clone());
    create_app_with_stores(config, stores, Some(pool))
}

/// Fresh in-memory stores, with the configured operator seeded if both
/// credentials are set.
pub fn in_memory_stores(database: &DatabaseConfig) -> Result<Stores, DomainError> {
    let (stores, backend) = Stores::in_memory();

    if !database.seed_operator_email.is_empty() && !database.seed_operator_password.is_empty() {
        let hash = shared::password::hash_password(&database.seed_operator_password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        backend.seed_user(&database.seed_operator_email, None, &hash, true)?;
    }

    Ok(stores)
}

/// Builds the application over any store backend.
pub fn create_app_with_stores(
    config: Config,
    stores: Stores,
    pool: Option<PgPool>,
) -> Result<Router, JwtError> {
    let state = AppState::new(config, stores, pool)?;
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        // Development: allow any origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Middleware order: auth runs first, then rate limiting (needs the user id)
    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route(
            "/api/v1/zones",
            get(zones::list_zones).post(zones::create_zone),
        )
        .route("/api/v1/zones/resolve", get(zones::resolve_zone))
        .route(
            "/api/v1/zones/:zone_id",
            get(zones::get_zone)
                .put(zones::update_zone)
                .delete(zones::delete_zone),
        )
        .route(
            "/api/v1/zones/:zone_id/drivers",
            get(zone_drivers::list_zone_drivers).post(zone_drivers::assign_drivers),
        )
        .route(
            "/api/v1/zones/:zone_id/drivers/:driver_id",
            delete(zone_drivers::remove_driver),
        )
        .route(
            "/api/v1/warehouses",
            get(warehouses::list_warehouses).post(warehouses::create_warehouse),
        )
        .route(
            "/api/v1/drivers",
            get(drivers::list_drivers).post(drivers::create_driver),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    let public_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}

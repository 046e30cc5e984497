use serde::Deserialize;
use shared::jwt::{JwtConfig, JwtError};
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// Session token signing configuration
    pub jwt: JwtAuthConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
    #[serde(default)]
    pub zones: ZonesConfig,
    #[serde(default)]
    pub warehouses: WarehousesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Operator account created at startup by the in-memory backend.
    #[serde(default)]
    pub seed_operator_email: String,

    #[serde(default)]
    pub seed_operator_password: String,
}

/// Where zones, drivers, warehouses and operators are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process-local; everything is lost on restart.
    InMemory,
}

impl DatabaseConfig {
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Requests per minute per operator; 0 disables rate limiting
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Only enable behind TLS termination
    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// RSA private key in PEM format for signing tokens
    #[serde(default)]
    pub private_key: String,

    /// RSA public key in PEM format for verifying tokens
    #[serde(default)]
    pub public_key: String,

    /// Shared HS256 secret, used only when no RSA key pair is configured
    #[serde(default)]
    pub secret: String,

    /// Session token lifetime in seconds (default: 604800 = 7 days)
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: i64,

    /// Clock skew tolerance in seconds
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

impl JwtAuthConfig {
    /// Builds the signing config: RS256 when a key pair is set, else HS256.
    pub fn signing_config(&self) -> Result<JwtConfig, JwtError> {
        if !self.private_key.is_empty() && !self.public_key.is_empty() {
            JwtConfig::from_rsa_pem(
                &self.private_key,
                &self.public_key,
                self.session_expiry_secs,
                self.leeway_secs,
            )
        } else if !self.secret.is_empty() {
            Ok(JwtConfig::from_secret(&self.secret, self.session_expiry_secs))
        } else {
            Err(JwtError::InvalidKey(
                "no signing key configured".to_string(),
            ))
        }
    }
}

/// Session cookie settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,

    #[serde(default = "default_cookie_secure")]
    pub secure: bool,

    #[serde(default = "default_cookie_same_site")]
    pub same_site: String,

    #[serde(default = "default_cookie_path")]
    pub path: String,

    #[serde(default)]
    pub domain: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            secure: default_cookie_secure(),
            same_site: default_cookie_same_site(),
            path: default_cookie_path(),
            domain: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZonesConfig {
    #[serde(default = "default_zone_color")]
    pub default_color: String,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            default_color: default_zone_color(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarehousesConfig {
    #[serde(default = "default_capacity")]
    pub default_capacity: i32,

    #[serde(default = "default_country")]
    pub default_country: String,
}

impl Default for WarehousesConfig {
    fn default() -> Self {
        Self {
            default_capacity: default_capacity(),
            default_country: default_country(),
        }
    }
}

impl WarehousesConfig {
    pub fn defaults(&self) -> domain::models::warehouse::WarehouseDefaults {
        domain::models::warehouse::WarehouseDefaults {
            capacity: self.default_capacity,
            country: self.default_country.clone(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    100
}
fn default_session_expiry() -> i64 {
    604800 // 7 days
}
fn default_jwt_leeway() -> u64 {
    30
}
fn default_cookie_name() -> String {
    "auth-token".to_string()
}
fn default_cookie_secure() -> bool {
    true
}
fn default_cookie_same_site() -> String {
    "Lax".to_string()
}
fn default_cookie_path() -> String {
    "/".to_string()
}
fn default_zone_color() -> String {
    domain::services::DEFAULT_ZONE_COLOR.to_string()
}
fn default_capacity() -> i32 {
    100
}
fn default_country() -> String {
    "Saudi Arabia".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("LMA").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        // Embedded so tests do not depend on the working directory
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 100
            hsts_enabled = false

            [jwt]
            secret = "unit-test-secret"
            session_expiry_secs = 604800
            leeway_secs = 30
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        // Skip validation to allow partial configs
        builder.build()?.try_deserialize()
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.backend == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "LMA__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.jwt.signing_config().is_err() {
            return Err(ConfigValidationError::MissingRequired(
                "jwt.private_key and jwt.public_key (or jwt.secret) must be set".to_string(),
            ));
        }

        if self.warehouses.default_capacity <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "warehouses.default_capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}

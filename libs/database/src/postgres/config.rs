use core_config::{env_or_default, env_parse, env_required, ConfigError, Environment, FromEnv};
use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

/// PostgreSQL connection pool configuration
///
/// Construct manually with [`PostgresConfig::with_pool_size`] or load it with
/// [`FromEnv::from_env`].
///
/// ```ignore
/// use database::postgres::PostgresConfig;
/// use core_config::FromEnv;
///
/// let config = PostgresConfig::from_env()?;
/// let options = config.into_connect_options();
/// ```
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,

    /// Enable SQL statement logging
    pub sqlx_logging: bool,
}

impl PostgresConfig {
    /// Create a config with a custom pool size
    pub fn with_pool_size(
        url: impl Into<String>,
        max_connections: u32,
        min_connections: u32,
    ) -> Self {
        Self {
            url: url.into(),
            max_connections,
            min_connections,
            ..Self::default()
        }
    }

    /// Build a connection URL from discrete parts
    pub fn url_from_parts(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        database: &str,
    ) -> String {
        format!("postgres://{username}:{password}@{host}:{port}/{database}")
    }

    /// Convert this config into SeaORM `ConnectOptions`
    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(&self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(LevelFilter::Debug);
        opt
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            sqlx_logging: false,
        }
    }
}

/// Load `PostgresConfig` from environment variables
///
/// - `DATABASE_URL` wins when set. Otherwise the URL is built from
///   `DATABASE_HOST` (default `localhost`), `DATABASE_PORT` (default 5432),
///   and the required `DATABASE_USERNAME`, `DATABASE_PASSWORD`, `DATABASE_NAME`.
/// - `DB_MAX_CONNECTIONS` (default 20), `DB_MIN_CONNECTIONS` (default 2)
/// - `DB_CONNECT_TIMEOUT_SECS`, `DB_ACQUIRE_TIMEOUT_SECS` (default 8)
/// - `DB_SQLX_LOGGING` (default: on in development only)
impl FromEnv for PostgresConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => {
                let host = env_or_default("DATABASE_HOST", "localhost");
                let port: u16 = env_parse("DATABASE_PORT", "5432")?;
                let username = env_required("DATABASE_USERNAME")?;
                let password = env_required("DATABASE_PASSWORD")?;
                let database = env_required("DATABASE_NAME")?;
                Self::url_from_parts(&host, port, &username, &password, &database)
            }
        };

        let default_logging = Environment::from_env().is_development().to_string();

        Ok(Self {
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS", "20")?,
            min_connections: env_parse("DB_MIN_CONNECTIONS", "2")?,
            connect_timeout_secs: env_parse("DB_CONNECT_TIMEOUT_SECS", "8")?,
            acquire_timeout_secs: env_parse("DB_ACQUIRE_TIMEOUT_SECS", "8")?,
            sqlx_logging: env_parse("DB_SQLX_LOGGING", &default_logging)?,
        })
    }
}

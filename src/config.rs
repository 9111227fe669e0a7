use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path:?}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to load config from environment: {0}")]
    Environment(#[from] envy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub bind_address: String,
    pub port: u16,
    /// Reported by `/health`, e.g. "development" or "production".
    pub environment: String,
    pub log_dir: String,
    pub simulator: SimulatorConfig,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url_override: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection URL. `DATABASE_URL` wins over the individual parts.
    pub fn url(&self) -> String {
        if let Some(url) = &self.url_override {
            return url.clone();
        }
        format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.name
        )
    }

    /// Human-readable target for log lines. Never includes credentials.
    pub fn describe(&self) -> String {
        if self.url_override.is_some() {
            "DATABASE_URL".to_string()
        } else {
            format!("{} on {}:{}", self.name, self.host, self.port)
        }
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url_override", &self.url_override.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Timer periods and odds for the telemetry simulator.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub session_update_secs: u64,
    pub host_pool_update_secs: u64,
    pub metrics_secs: u64,
    pub alert_secs: u64,
    pub user_activity_secs: u64,
    pub alert_create_probability: f64,
    pub alert_resolve_probability: f64,
    pub session_create_probability: f64,
    pub session_disconnect_probability: f64,
    pub metric_sample_size: u64,
    pub metric_retention_hours: i64,
    pub alert_resolve_min_age_minutes: i64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            session_update_secs: 5,
            host_pool_update_secs: 10,
            metrics_secs: 15,
            alert_secs: 30,
            user_activity_secs: 20,
            alert_create_probability: 0.2,
            alert_resolve_probability: 0.3,
            session_create_probability: 0.1,
            session_disconnect_probability: 0.05,
            metric_sample_size: 3,
            metric_retention_hours: 24,
            alert_resolve_min_age_minutes: 5,
        }
    }
}

impl SimulatorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("session_update_secs", self.session_update_secs),
            ("host_pool_update_secs", self.host_pool_update_secs),
            ("metrics_secs", self.metrics_secs),
            ("alert_secs", self.alert_secs),
            ("user_activity_secs", self.user_activity_secs),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, secs)| *secs == 0) {
            return Err(ConfigError::Invalid(format!("simulator.{name} must be greater than 0")));
        }

        let probabilities = [
            ("alert_create_probability", self.alert_create_probability),
            ("alert_resolve_probability", self.alert_resolve_probability),
            ("session_create_probability", self.session_create_probability),
            ("session_disconnect_probability", self.session_disconnect_probability),
        ];
        if let Some((name, p)) = probabilities.iter().find(|(_, p)| !(0.0..=1.0).contains(p)) {
            return Err(ConfigError::Invalid(format!(
                "simulator.{name} must be within [0, 1], got {p}"
            )));
        }

        if self.metric_retention_hours <= 0 {
            return Err(ConfigError::Invalid(
                "simulator.metric_retention_hours must be greater than 0".to_string(),
            ));
        }
        if self.alert_resolve_min_age_minutes < 0 {
            return Err(ConfigError::Invalid(
                "simulator.alert_resolve_min_age_minutes must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

// Partial config for layering. Field names double as env var names (uppercased).
#[derive(Deserialize, Default, Debug)]
pub struct PartialAppConfig {
    database_url: Option<String>,
    db_host: Option<String>,
    db_port: Option<u16>,
    db_user: Option<String>,
    db_password: Option<String>,
    db_name: Option<String>,
    db_max_connections: Option<u32>,
    bind_address: Option<String>,
    port: Option<u16>,
    app_env: Option<String>,
    log_dir: Option<String>,
}

#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    #[serde(flatten)]
    base: PartialAppConfig,
    simulator: Option<SimulatorConfig>,
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config = match config_path {
            Some(path_str) => {
                let path = Path::new(path_str);
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })?;
                FileConfig::parse(&contents).map_err(|source| ConfigError::ParseFile {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => FileConfig::default(),
        };

        // 2. Load from environment variables
        let env_config = envy::from_env::<PartialAppConfig>()?;

        // 3. Merge: environment overrides file
        Self::from_layers(file_config, env_config)
    }

    pub fn from_layers(file: FileConfig, env: PartialAppConfig) -> Result<Self, ConfigError> {
        let base = file.base;
        let database = DatabaseConfig {
            url_override: env.database_url.or(base.database_url).filter(|url| !url.is_empty()),
            host: env.db_host.or(base.db_host).unwrap_or_else(|| "localhost".to_string()),
            port: env.db_port.or(base.db_port).unwrap_or(5432),
            user: env.db_user.or(base.db_user).unwrap_or_else(|| "avd_user".to_string()),
            password: env
                .db_password
                .or(base.db_password)
                .unwrap_or_else(|| "avd_password".to_string()),
            name: env.db_name.or(base.db_name).unwrap_or_else(|| "avd_dashboard".to_string()),
            max_connections: env.db_max_connections.or(base.db_max_connections).unwrap_or(10),
        };

        if database.max_connections == 0 {
            return Err(ConfigError::Invalid("DB_MAX_CONNECTIONS must be greater than 0".to_string()));
        }

        let simulator = file.simulator.unwrap_or_default();
        simulator.validate()?;

        Ok(AppConfig {
            database,
            bind_address: env
                .bind_address
                .or(base.bind_address)
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env.port.or(base.port).unwrap_or(3000),
            environment: env.app_env.or(base.app_env).unwrap_or_else(|| "development".to_string()),
            log_dir: env.log_dir.or(base.log_dir).unwrap_or_else(|| "logs".to_string()),
            simulator,
        })
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

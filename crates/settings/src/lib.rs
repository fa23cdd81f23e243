//! `settings` crate: typed application configuration.
//!
//! Values come from the process environment (the compose `env_file`s feed
//! them in).  Keys are matched case-insensitively, so `POSTGRES_HOST` maps
//! onto [`Settings::postgres_host`].

use std::fmt;

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors produced while loading configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A variable is missing or has the wrong shape.
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// All variables parsed but a value is out of range.
    #[error("invalid setting {key}: {message}")]
    Invalid {
        key: &'static str,
        message: String,
    },
}

/// Mode the API runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Dev,
    Test,
    Prod,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => write!(f, "DEV"),
            Self::Test => write!(f, "TEST"),
            Self::Prod => write!(f, "PROD"),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub mode: Mode,
    #[serde(default = "default_app_version")]
    pub app_version: String,

    // Security
    pub cors_origins: Vec<String>,

    // Postgres
    pub postgres_db: String,
    pub postgres_user: String,
    pub postgres_password: String,
    pub postgres_host: String,
    pub postgres_port: u16,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_connect_retries")]
    pub db_connect_retries: u32,
    #[serde(default = "default_db_connect_interval_secs")]
    pub db_connect_interval_secs: u64,

    // JWT
    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    pub jwt_access_expire_minutes: i64,
    pub jwt_refresh_expire_minutes: i64,
}

fn default_app_version() -> String {
    "0.1.0".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_connect_retries() -> u32 {
    10
}

fn default_db_connect_interval_secs() -> u64 {
    2
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::load(environment())
    }

    /// Load settings from an explicit `KEY => value` map instead of the
    /// process environment.
    pub fn from_map<I, K, V>(vars: I) -> Result<Self, SettingsError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(environment().source(Some(map)))
    }

    fn load(source: Environment) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.jwt_access_expire_minutes <= 0 {
            return Err(SettingsError::Invalid {
                key: "JWT_ACCESS_EXPIRE_MINUTES",
                message: "must be positive".into(),
            });
        }
        if self.jwt_refresh_expire_minutes <= 0 {
            return Err(SettingsError::Invalid {
                key: "JWT_REFRESH_EXPIRE_MINUTES",
                message: "must be positive".into(),
            });
        }
        if self.db_max_connections == 0 {
            return Err(SettingsError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Postgres connection string assembled from the `POSTGRES_*` variables.
    ///
    /// User, password and database name are percent-encoded, so values
    /// containing `@`, `:` or `/` survive the round trip.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        let invalid_host = |message: String| SettingsError::Invalid {
            key: "POSTGRES_HOST",
            message,
        };

        let mut url = Url::parse(&format!(
            "postgres://{}:{}",
            self.postgres_host, self.postgres_port
        ))
        .map_err(|e| invalid_host(e.to_string()))?;

        url.set_username(&self.postgres_user)
            .map_err(|_| invalid_host("cannot carry credentials".into()))?;
        url.set_password(Some(&self.postgres_password))
            .map_err(|_| invalid_host("cannot carry credentials".into()))?;
        url.path_segments_mut()
            .map_err(|_| invalid_host("cannot carry a database name".into()))?
            .clear()
            .push(&self.postgres_db);

        Ok(url.into())
    }
}

fn environment() -> Environment {
    Environment::default()
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors_origins")
}

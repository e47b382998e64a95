use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SHELF_ENV";
const CONFIG_DIR_ENV: &str = "SHELF_CONFIG_DIR";
const ENV_OVERRIDE_PREFIX: &str = "SHELF";
const ENV_OVERRIDE_SEPARATOR: &str = "__";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay
    /// and `SHELF__`-prefixed environment variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .context("unable to resolve current directory")?,
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from an explicit config directory and environment name.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let parsed_environment = environment.parse::<Environment>()?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_OVERRIDE_PREFIX)
                    .prefix_separator(ENV_OVERRIDE_SEPARATOR)
                    .separator(ENV_OVERRIDE_SEPARATOR)
                    .try_parsing(true),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected environment always wins over any `environment` key in the files.
        settings.environment = parsed_environment;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Which storage backend the book repository talks to.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "DatabaseSettings::default_uri")]
    pub uri: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_collection")]
    pub collection: String,
    #[serde(default = "DatabaseSettings::default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Upper bound for every single storage operation.
    #[serde(default = "DatabaseSettings::default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl DatabaseSettings {
    fn default_uri() -> String {
        "mongodb://localhost:27017".to_string()
    }

    fn default_name() -> String {
        "booksDB".to_string()
    }

    fn default_collection() -> String {
        "books".to_string()
    }

    fn default_connect_timeout_ms() -> u64 {
        20000
    }

    fn default_operation_timeout_ms() -> u64 {
        10000
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            uri: Self::default_uri(),
            name: Self::default_name(),
            collection: Self::default_collection(),
            connect_timeout_ms: Self::default_connect_timeout_ms(),
            operation_timeout_ms: Self::default_operation_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_database_points_at_local_mongodb() {
        let settings = Settings::default();
        assert_eq!(settings.database.backend, StorageBackend::Mongodb);
        assert_eq!(settings.database.uri, "mongodb://localhost:27017");
        assert_eq!(settings.database.name, "booksDB");
        assert_eq!(settings.database.collection, "books");
        assert_eq!(settings.database.operation_timeout_ms, 10000);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let error = "qa".parse::<Environment>().unwrap_err();
        assert!(error.to_string().contains("unsupported environment 'qa'"));
    }

    #[test]
    fn missing_config_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path(), "staging").unwrap();

        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn environment_file_overrides_base_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[server]\nport = 9000\n\n[database]\nname = \"shelf\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("local.toml"),
            "[server]\nport = 9100\n\n[database]\nbackend = \"memory\"\n\n[telemetry]\nlog_format = \"json\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(dir.path(), "local").unwrap();

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.database.name, "shelf");
        assert_eq!(settings.database.backend, StorageBackend::Memory);
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
        // untouched keys keep their defaults
        assert_eq!(settings.database.collection, "books");
    }
}

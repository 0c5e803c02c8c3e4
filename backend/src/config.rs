//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional `portal.toml` in
//! the working directory, then environment variables such as
//! `PORTAL__SERVER__PORT=9000` or `PORTAL__IMPORT__BATCH_SIZE=100`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

const CONFIG_FILE_NAME: &str = "portal";
const ENV_PREFIX: &str = "PORTAL";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
/// Largest JSON body accepted, enough for big form schemas.
const DEFAULT_MAX_JSON_PAYLOAD: usize = 10 * 1024 * 1024;

const DEFAULT_DATABASE_PATH: &str = "portal.sqlite";

/// Rows inserted per statement batch during CSV import.
pub const DEFAULT_IMPORT_BATCH_SIZE: usize = 50;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const DEFAULT_FROM_ADDRESS: &str = "scholarships@example.org";
const DEFAULT_PORTAL_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Opens the portal in the default browser once the server is up.
    pub open_browser: bool,
    pub max_json_payload: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    pub batch_size: usize,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub from_address: String,
    /// Base URL used for links inside emails.
    pub portal_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub import: ImportConfig,
    pub notifications: NotificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults only.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", DEFAULT_PORT as i64)?
            .set_default("server.open_browser", true)?
            .set_default("server.max_json_payload", DEFAULT_MAX_JSON_PAYLOAD as i64)?
            .set_default("database.path", DEFAULT_DATABASE_PATH)?
            .set_default("import.batch_size", DEFAULT_IMPORT_BATCH_SIZE as i64)?
            .set_default("import.upload_dir", DEFAULT_UPLOAD_DIR)?
            .set_default("import.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
            .set_default("notifications.enabled", true)?
            .set_default("notifications.from_address", DEFAULT_FROM_ADDRESS)?
            .set_default("notifications.portal_url", DEFAULT_PORTAL_URL)
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.server.host, self.server.port)
    }

    /// Batch size with a floor of one row.
    pub fn import_batch_size(&self) -> usize {
        self.import.batch_size.max(1)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    /// Defaults pointed at a scratch directory, for handler tests.
    pub(crate) fn scratch_config(dir: &Path) -> AppConfig {
        let mut config = AppConfig::defaults().unwrap();
        config.database.path = dir.join("portal.sqlite");
        config.import.upload_dir = dir.join("uploads");
        config.server.open_browser = false;
        config
    }

    #[test]
    fn defaults_are_complete() {
        let config = AppConfig::defaults().unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.import.batch_size, 50);
        assert_eq!(config.database.path, PathBuf::from("portal.sqlite"));
        assert_eq!(config.url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn batch_size_never_drops_to_zero() {
        let mut config = AppConfig::defaults().unwrap();
        config.import.batch_size = 0;
        assert_eq!(config.import_batch_size(), 1);
    }
}

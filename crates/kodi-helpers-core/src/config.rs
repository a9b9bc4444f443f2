use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use kodi_helpers_api::{Connection, Scheme};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    pub polling: PollingConfig,
    pub general: GeneralConfig,
    pub omdb: OmdbConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
    pub timeout_secs: u64,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Load config: user file at `path` (if it exists) merged over built-in defaults.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no user config, using defaults");
            return Self::parse("");
        }
        let user_str = std::fs::read_to_string(path)?;
        Self::parse(&user_str)
    }

    /// Parse a (possibly partial) user config on top of the defaults.
    pub fn parse(user_str: &str) -> Result<Self, CoreError> {
        let mut merged: toml::Table =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| CoreError::Config(e.to_string()))?;
        let user: toml::Table =
            toml::from_str(user_str).map_err(|e| CoreError::Config(e.to_string()))?;
        merge_tables(&mut merged, user);

        toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| CoreError::Config(e.to_string()))
    }

    /// Write the config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Default directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    /// Reject configurations a poll cycle cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.connection.host.trim().is_empty() {
            return Err(CoreError::Config("connection.host is required".into()));
        }
        if self.connection.port == 0 {
            return Err(CoreError::Config("connection.port must not be 0".into()));
        }
        if self.connection.timeout_secs == 0 {
            return Err(CoreError::Config(
                "connection.timeout_secs must be at least 1".into(),
            ));
        }
        if self.polling.interval_secs == 0 {
            return Err(CoreError::Config(
                "polling.interval_secs must be at least 1".into(),
            ));
        }
        if self.omdb.enabled && self.omdb.api_key().is_none() {
            return Err(CoreError::Config(
                "omdb.enabled requires omdb.api_key".into(),
            ));
        }
        Ok(())
    }

    /// Connection parameters for the Kodi client.
    pub fn connection(&self) -> Connection {
        let c = &self.connection;
        Connection {
            host: c.host.trim().to_string(),
            port: c.port,
            username: c.username.clone().filter(|u| !u.is_empty()),
            password: c.password.clone(),
            scheme: c.scheme,
            timeout: Duration::from_secs(c.timeout_secs),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "kodi-helpers")
    }
}

impl OmdbConfig {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// Recursively overlay `overlay` onto `base`; scalar values replace.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                merge_tables(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.connection.port, 8080);
        assert_eq!(config.connection.scheme, Scheme::Http);
        assert_eq!(config.connection.timeout_secs, 5);
        assert_eq!(config.polling.interval_secs, 30);
        assert_eq!(config.general.language, "de");
        assert!(!config.omdb.enabled);
        assert!(config.connection.username.is_none());
    }

    #[test]
    fn test_default_host_is_rejected() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn test_partial_user_config() {
        let config = AppConfig::parse(
            r#"
            [connection]
            host = "192.168.1.50"
            scheme = "https"
            username = "kodi"
            "#,
        )
        .unwrap();

        assert_eq!(config.connection.host, "192.168.1.50");
        assert_eq!(config.connection.scheme, Scheme::Https);
        assert_eq!(config.connection.port, 8080);
        assert_eq!(config.polling.interval_secs, 30);
        assert!(config.validate().is_ok());

        let conn = config.connection();
        assert_eq!(conn.base_url(), "https://192.168.1.50:8080");
        assert_eq!(conn.username.as_deref(), Some("kodi"));
        assert_eq!(conn.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_scheme() {
        let err = AppConfig::parse("[connection]\nscheme = \"ftp\"").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_omdb_requires_key() {
        let config = AppConfig::parse(
            "[connection]\nhost = \"kodi\"\n[omdb]\nenabled = true\napi_key = \" \"",
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.connection.host = "kodi.local".into();
        config.connection.scheme = Scheme::Https;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.connection.host, "kodi.local");
        assert_eq!(loaded.connection.scheme, Scheme::Https);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.connection.port, 8080);
    }
}

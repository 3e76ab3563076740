use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::TableKey;
use crate::remote::Environment;
use crate::sync::DEFAULT_MIN_INTERVAL_MINUTES;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Remote document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL (e.g., "https://coop.example.com/api")
    pub base_url: Option<String>,
    /// Bearer token sent with every request
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }
}

/// Sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Sync before read commands (default: false)
    #[serde(default)]
    pub auto_sync: bool,
    /// Minimum minutes between gated syncs
    #[serde(default = "default_min_interval")]
    pub min_interval_minutes: i64,
    /// Tables that must be current; every one needs a remote timestamp
    #[serde(default = "TableKey::default_critical")]
    pub critical_tables: Vec<TableKey>,
}

fn default_min_interval() -> i64 {
    DEFAULT_MIN_INTERVAL_MINUTES
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_sync: false,
            min_interval_minutes: default_min_interval(),
            critical_tables: TableKey::default_critical(),
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite cache
    pub database_path: ConfigValue<PathBuf>,
    /// Remote environment (develop or production)
    pub environment: ConfigValue<Environment>,
    /// Member whose order lines are cached
    pub user_id: ConfigValue<Option<String>>,
    /// Pins "today" for week calculations
    pub test_date: ConfigValue<Option<NaiveDate>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    environment: Option<Environment>,
    user_id: Option<String>,
    test_date: Option<NaiveDate>,
    remote: Option<RemoteConfig>,
    sync: Option<SyncConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let default_db_path = Self::default_data_dir().join("coop.db");

        // Start with defaults
        let mut database_path = ConfigValue::new(default_db_path, ConfigSource::Default);
        let mut environment = ConfigValue::new(Environment::default(), ConfigSource::Default);
        let mut user_id = ConfigValue::new(None, ConfigSource::Default);
        let mut test_date = ConfigValue::new(None, ConfigSource::Default);
        let mut config_file = None;
        let mut remote = RemoteConfig::default();
        let mut sync = SyncConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(db_path) = file_config.database_path {
                // Resolve relative paths against config file's directory
                let resolved_path = if db_path.is_relative() {
                    path.parent().map(|p| p.join(&db_path)).unwrap_or(db_path)
                } else {
                    db_path
                };
                database_path = ConfigValue::new(resolved_path, ConfigSource::File);
            }
            if let Some(env) = file_config.environment {
                environment = ConfigValue::new(env, ConfigSource::File);
            }
            if let Some(user) = file_config.user_id {
                user_id = ConfigValue::new(Some(user), ConfigSource::File);
            }
            if let Some(date) = file_config.test_date {
                test_date = ConfigValue::new(Some(date), ConfigSource::File);
            }
            if let Some(remote_config) = file_config.remote {
                remote = remote_config;
            }
            if let Some(sync_config) = file_config.sync {
                sync = sync_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("COOP_DATABASE_PATH") {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Ok(env) = std::env::var("COOP_ENVIRONMENT") {
            let parsed: Environment = env.parse().map_err(ConfigError::InvalidValue)?;
            environment = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Ok(user) = std::env::var("COOP_USER_ID") {
            user_id = ConfigValue::new(Some(user), ConfigSource::Environment);
        }
        if let Ok(date) = std::env::var("COOP_TEST_DATE") {
            let parsed = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                ConfigError::InvalidValue(format!("COOP_TEST_DATE '{}': {}", date, e))
            })?;
            test_date = ConfigValue::new(Some(parsed), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("COOP_REMOTE_URL") {
            remote.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("COOP_REMOTE_API_KEY") {
            remote.api_key = Some(key);
        }

        Ok(Self {
            database_path,
            environment,
            user_id,
            test_date,
            config_file,
            remote,
            sync,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/coop/
    /// - macOS: ~/Library/Application Support/coop/
    /// - Windows: %APPDATA%/coop/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("coop")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/coop/
    /// - macOS: ~/Library/Application Support/coop/
    /// - Windows: %APPDATA%/coop/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("coop")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

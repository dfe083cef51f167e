//! Configuration management
//!
//! This module provides YAML-based configuration management with support for:
//! - Environment variable overrides
//! - Multiple configuration file locations
//! - Default values for all settings

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::generator::LENGTH_OF_ORGANISATION_IDENTIFIER;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub user_profile: UserProfileConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub organisation: OrganisationConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_database_url() -> String {
    "sqlite://./data/professional-refdata.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

/// User profile (identity) service connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserProfileConfig {
    #[serde(default = "default_user_profile_url")]
    pub url: String,
    /// Timeout in seconds (supports both timeout_secs and timeout field names)
    #[serde(default = "default_timeout", alias = "timeout")]
    pub timeout_secs: u64,
}

fn default_user_profile_url() -> String {
    "http://localhost:8091".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for UserProfileConfig {
    fn default() -> Self {
        Self {
            url: default_user_profile_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Organisation lifecycle settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrganisationConfig {
    /// Length of generated organisation identifiers
    #[serde(default = "default_identifier_length")]
    pub identifier_length: usize,
    /// Roles attached to every super user created with an organisation
    #[serde(default = "default_super_user_roles")]
    pub super_user_roles: Vec<String>,
}

fn default_identifier_length() -> usize {
    LENGTH_OF_ORGANISATION_IDENTIFIER
}

fn default_super_user_roles() -> Vec<String> {
    vec![
        "pui-user-manager".to_string(),
        "pui-organisation-manager".to_string(),
        "pui-finance-manager".to_string(),
        "pui-case-manager".to_string(),
    ]
}

impl Default for OrganisationConfig {
    fn default() -> Self {
        Self {
            identifier_length: default_identifier_length(),
            super_user_roles: default_super_user_roles(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Log output target (console, file or both)
    #[serde(default = "default_log_target")]
    pub target: LogTarget,
    /// Directory for log files (used when target is "file" or "both")
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Log file name prefix
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    /// Enable daily log rotation
    #[serde(default = "default_log_rotation")]
    pub daily_rotation: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_log_target() -> LogTarget {
    LogTarget::Console
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("/var/log/professional-refdata")
}

fn default_log_prefix() -> String {
    "professional-refdata".to_string()
}

fn default_log_rotation() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            target: default_log_target(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_log_rotation(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    Console,
    File,
    Both,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: default_database_url(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
            },
            user_profile: UserProfileConfig::default(),
            logging: LoggingConfig::default(),
            organisation: OrganisationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values
    /// 2. Configuration file (YAML)
    /// 3. Environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("PRD_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(Self::find_config_file);

        let mut config = match config_path {
            Some(ref path) if path.exists() => {
                eprintln!("[CONFIG] Loading configuration from: {:?}", path);
                Self::from_file(path)?
            }
            Some(ref path) => {
                eprintln!("[CONFIG] Config file not found: {:?}, using defaults", path);
                AppConfig::default()
            }
            None => {
                eprintln!("[CONFIG] No config file found, using defaults");
                AppConfig::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_yaml(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Find the configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("config.yaml"),
            PathBuf::from("config/config.yaml"),
            PathBuf::from("/etc/professional-refdata/config.yaml"),
            dirs::config_dir()
                .map(|p| p.join("professional-refdata/config.yaml"))
                .unwrap_or_default(),
        ];

        paths.into_iter().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(url) = std::env::var("USER_PROFILE_URL") {
            self.user_profile.url = url;
        }
        if let Ok(timeout) = std::env::var("USER_PROFILE_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.user_profile.timeout_secs = t;
            }
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PRD_LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            };
        }
        if let Ok(target) = std::env::var("PRD_LOG_TARGET") {
            self.logging.target = match target.to_lowercase().as_str() {
                "file" => LogTarget::File,
                "both" => LogTarget::Both,
                _ => LogTarget::Console,
            };
        }
        if let Ok(dir) = std::env::var("PRD_LOG_DIR") {
            self.logging.log_dir = PathBuf::from(dir);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            bail!("database.url must not be empty");
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        if self.database.min_connections > self.database.max_connections {
            bail!("database.min_connections cannot exceed database.max_connections");
        }
        if self.user_profile.url.trim().is_empty() {
            bail!("user_profile.url must not be empty");
        }
        if !(1..=32).contains(&self.organisation.identifier_length) {
            bail!(
                "organisation.identifier_length must be between 1 and 32, got {}",
                self.organisation.identifier_length
            );
        }
        Ok(())
    }
}

//! Settings for the application under inspection
//!
//! Supports multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (PORTAL_* prefix)
//! 2. Settings file (TOML)
//! 3. Default values
//!
//! Loading never judges the values the checks are about (secret key, hosts,
//! databases); it only rejects settings this tool cannot work with.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Alias of the database the checks inspect
pub const DEFAULT_DATABASE_ALIAS: &str = "default";

/// Placeholder shown instead of secrets by `config show`
const MASK: &str = "********";

/// Complete application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Web application settings
    pub app: AppSettings,

    /// Database connections keyed by alias
    pub databases: BTreeMap<String, DatabaseSettings>,

    /// Tuning for the checks themselves
    pub checks: CheckSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Web application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Project name shown in the report title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Secret used for signing sessions and tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Verbose error pages
    pub debug: bool,

    /// Accepted request Host headers
    pub allowed_hosts: Vec<String>,
}

/// One database connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    /// Database name, or file path for SQLite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl DatabaseSettings {
    /// File-based engines have no user, host or port
    pub fn is_file_based(&self) -> bool {
        self.engine
            .as_deref()
            .is_some_and(|engine| engine.to_lowercase().contains("sqlite"))
    }
}

/// Tuning for the checks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Secret keys starting with this prefix are placeholders
    pub insecure_key_prefix: String,

    /// Upper bound for connect + `SELECT 1`
    pub connect_timeout_secs: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            insecure_key_prefix: "django-insecure".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl Settings {
    /// Load settings from file with environment variable overrides
    pub fn load(settings_path: Option<&str>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(path) = Self::find_settings_file(settings_path)? {
            debug!(path = %path.display(), "Loading settings file");
            let content = fs::read_to_string(&path).map_err(|source| Error::IoRead {
                path: path.clone(),
                source,
            })?;
            settings = toml::from_str(&content).map_err(|source| Error::ConfigParse {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "Settings loaded from file");
        }

        settings.apply_env_overrides();
        settings.expand_paths();
        settings.validate()?;

        Ok(settings)
    }

    /// Find the settings file to use
    fn find_settings_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        let search_paths = [
            PathBuf::from("portal.toml"),
            PathBuf::from("settings.toml"),
            dirs::config_dir()
                .map(|p| p.join("portal").join("settings.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".portal").join("settings.toml"))
                .unwrap_or_default(),
            PathBuf::from("/etc/portal/settings.toml"),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found settings file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No settings file found, using defaults");
        Ok(None)
    }

    /// Apply overrides from the process environment
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // App settings
        if let Some(val) = var("PORTAL_APP_NAME") {
            self.app.name = Some(val);
        }
        if let Some(val) = var("PORTAL_SECRET_KEY") {
            self.app.secret_key = Some(val);
        }
        if let Some(val) = var("PORTAL_DEBUG") {
            self.app.debug = parse_bool(&val);
        }
        if let Some(val) = var("PORTAL_ALLOWED_HOSTS") {
            self.app.allowed_hosts = val
                .split(',')
                .map(str::trim)
                .filter(|host| !host.is_empty())
                .map(str::to_string)
                .collect();
        }

        // Default database; any variable creates the alias
        let engine = var("PORTAL_DB_ENGINE");
        let name = var("PORTAL_DB_NAME");
        let user = var("PORTAL_DB_USER");
        let password = var("PORTAL_DB_PASSWORD");
        let host = var("PORTAL_DB_HOST");
        let port = var("PORTAL_DB_PORT");
        if [&engine, &name, &user, &password, &host, &port]
            .iter()
            .any(|val| val.is_some())
        {
            let db = self
                .databases
                .entry(DEFAULT_DATABASE_ALIAS.to_string())
                .or_default();
            if engine.is_some() {
                db.engine = engine;
            }
            if name.is_some() {
                db.name = name;
            }
            if user.is_some() {
                db.user = user;
            }
            if password.is_some() {
                db.password = password;
            }
            if host.is_some() {
                db.host = host;
            }
            if let Some(n) = port.and_then(|val| val.parse().ok()) {
                db.port = Some(n);
            }
        }

        // Check settings
        if let Some(val) = var("PORTAL_CONNECT_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.checks.connect_timeout_secs = n;
            }
        }

        // Logging settings
        if let Some(val) = var("PORTAL_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = var("PORTAL_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Some(val) = var("PORTAL_LOG_JSON") {
            self.logging.json_format = parse_bool(&val);
        }
    }

    /// Expand ~ and environment variables in paths
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the settings this tool depends on
    fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "invalid log level '{}', must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        if self.checks.connect_timeout_secs == 0 {
            return Err(Error::config_field_invalid(
                "checks.connect_timeout_secs",
                "must be greater than 0",
            ));
        }

        if self.checks.insecure_key_prefix.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "checks.insecure_key_prefix",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// The database the checks inspect
    pub fn default_database(&self) -> Option<&DatabaseSettings> {
        self.databases.get(DEFAULT_DATABASE_ALIAS)
    }

    /// Copy with secrets replaced, safe to print
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        if masked.app.secret_key.is_some() {
            masked.app.secret_key = Some(MASK.to_string());
        }
        for db in masked.databases.values_mut() {
            if db.password.is_some() {
                db.password = Some(MASK.to_string());
            }
        }
        masked
    }
}

fn parse_bool(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

/// Expand ~ and environment variables in paths
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Write a commented settings template
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let settings_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".portal")
                .join("settings.toml")
        });

    if settings_path.exists() && !force {
        return Err(Error::config_field_invalid(
            "path",
            format!(
                "settings file already exists: {}. Use --force to overwrite.",
                settings_path.display()
            ),
        ));
    }

    if let Some(parent) = settings_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::IoWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&settings_path, generate_default_config()).map_err(|source| Error::IoWrite {
        path: settings_path.clone(),
        source,
    })?;

    info!(path = %settings_path.display(), "Settings template written");
    Ok(settings_path)
}

/// Settings template with a throwaway development key
fn generate_default_config() -> String {
    let placeholder_key = format!(
        "{}-{}",
        CheckSettings::default().insecure_key_prefix,
        uuid::Uuid::new_v4().simple()
    );

    format!(
        r#"# Portal settings
#
# Every value can be overridden with a PORTAL_* environment variable.

[app]
# Project name shown in the report title
# name = "RHCI Portal"

# Development placeholder. Replace before deploying to production.
secret_key = "{placeholder_key}"

# Verbose error pages; never enable in production
debug = true

# Accepted Host headers (required when debug = false)
allowed_hosts = []

[databases.default]
# Engine: postgresql, mysql or sqlite
engine = "sqlite"

# Database name, or file path for sqlite
name = "db.sqlite3"

# Network settings (ignored for sqlite)
# user = "portal"
# password = ""
# host = "localhost"
# port = 5432

[checks]
# Secret keys starting with this prefix are reported as insecure
insecure_key_prefix = "django-insecure"

# Upper bound in seconds for the connection test
connect_timeout_secs = 10

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.portal/logs/check.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    )
}

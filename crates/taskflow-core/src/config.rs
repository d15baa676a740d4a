//! Configuration management for Taskflow.
//!
//! Loads configuration from ${TASKFLOW_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "TASKFLOW_API_URL";

/// Backend base URL used when neither env nor config sets one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for Taskflow configuration and data files.
    //!
    //! TASKFLOW_HOME resolution order:
    //! 1. TASKFLOW_HOME environment variable (if set)
    //! 2. ~/.config/taskflow (default)

    use std::path::PathBuf;

    /// Returns the Taskflow home directory.
    pub fn taskflow_home() -> PathBuf {
        if let Ok(home) = std::env::var("TASKFLOW_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("taskflow"))
            .unwrap_or_else(|| PathBuf::from(".taskflow"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        taskflow_home().join("config.toml")
    }

    /// Returns the path to the persisted token file.
    pub fn tokens_path() -> PathBuf {
        taskflow_home().join("tokens.json")
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Optional backend base URL.
    pub base_url: Option<String>,
    /// Overall request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: Config::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Returns the configured base URL if set and non-empty.
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Zero falls back to the default timeout.
    pub fn timeout(&self) -> Duration {
        let secs = if self.timeout_secs == 0 {
            Config::DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout_secs
        };
        Duration::from_secs(secs)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracing filter for the log file.
    pub log_level: String,

    /// Backend connection settings.
    pub api: ApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_LOG_LEVEL: &str = "info";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the backend base URL with precedence: env > config > default.
    ///
    /// Trailing slashes are stripped so paths can be appended verbatim.
    pub fn resolve_base_url(&self) -> Result<String> {
        let env_url = std::env::var(API_URL_ENV).ok();
        let candidate = env_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| self.api.effective_base_url())
            .unwrap_or(DEFAULT_BASE_URL);

        validate_url(candidate)?;
        Ok(candidate.trim_end_matches('/').to_string())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves only `api.base_url` to a specific config file path.
    ///
    /// Creates the file from the template if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_base_url_to(path: &Path, base_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, table, value};

        let trimmed = base_url.trim();
        validate_url(trimmed)?;

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        if !doc.contains_table("api") {
            doc["api"] = table();
        }
        doc["api"]["base_url"] = value(trimmed);

        Self::write_config(path, &doc.to_string())
    }

    fn write_config(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

/// Validates that a URL is well-formed and uses http(s).
fn validate_url(raw: &str) -> Result<()> {
    let parsed =
        url::Url::parse(raw).with_context(|| format!("Invalid backend base URL: {raw}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Invalid backend base URL: {raw} (expected http or https)");
    }
    Ok(())
}

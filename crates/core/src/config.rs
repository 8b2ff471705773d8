//! Configuration management for the Ragdesk client.
//!
//! Configuration is layered, later sources overriding earlier ones:
//! - Built-in defaults (the backend lives at [`DEFAULT_BASE_URL`])
//! - A YAML config file (`ragdesk.yaml` or the path in `RAGDESK_CONFIG`)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Address of the RAG backend when nothing overrides it.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "ragdesk.yaml";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the RAG backend (no trailing slash)
    pub base_url: String,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log filter override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Share one busy token between ask and upload
    pub single_flight: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    backend: Option<BackendSection>,
    logging: Option<LoggingSection>,
    session: Option<SessionSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BackendSection {
    #[serde(rename = "baseUrl")]
    base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionSection {
    #[serde(rename = "singleFlight")]
    single_flight: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            single_flight: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `RAGDESK_CONFIG`: Path to config file
    /// - `RAGDESK_BASE_URL`: Backend base URL
    /// - `RUST_LOG`: Log filter
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use ragdesk_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Backend: {}", config.base_url);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(std::env::var("RAGDESK_CONFIG").ok().map(PathBuf::from))
    }

    /// Like [`AppConfig::load`], with an explicit config file.
    ///
    /// An explicit file must exist; the default `ragdesk.yaml` is optional.
    pub fn load_with(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self {
            config_file,
            ..Self::default()
        };

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(base_url) = std::env::var("RAGDESK_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        if let Some(base_url) = config_file.backend.and_then(|b| b.base_url) {
            result.base_url = base_url;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(single_flight) = config_file.session.and_then(|s| s.single_flight) {
            result.single_flight = single_flight;
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags take precedence over the config file and environment.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        single_flight: bool,
    ) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if single_flight {
            self.single_flight = true;
        }

        self
    }

    /// Backend base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> String {
        self.base_url.trim_end_matches('/').to_string()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> AppResult<()> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            AppError::Config(format!("Invalid backend URL '{}': {}", self.base_url, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(AppError::Config(format!(
                "Unsupported backend URL scheme '{}'. Supported: http, https",
                other
            ))),
        }
    }
}

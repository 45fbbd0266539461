//! Application configuration, read from a RON file.
//!
//! Lookup order: the file named by `$PDFCHAT_CONFIG`, then `./pdfchat.ron`
//! when it exists, then built-in defaults. `$PDFCHAT_API_URL` replaces the
//! base URL whichever source won.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use pdfchat_engine::{ApiSettings, EngineConfig};
use pdfchat_logging::LogDestination;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "PDFCHAT_CONFIG";
pub const API_URL_ENV: &str = "PDFCHAT_API_URL";
pub const DEFAULT_CONFIG_FILE: &str = "pdfchat.ron";
pub const LOG_FILE: &str = "pdfchat.log";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_document_bytes: u64,
    pub document_cache_dir: Option<PathBuf>,
    pub log_destination: LogTarget,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            api_base_url: api.base_url,
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            max_document_bytes: api.max_document_bytes,
            document_cache_dir: None,
            log_destination: LogTarget::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl AppConfig {
    /// Loads from the process environment and the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load_with(|key| std::env::var(key).ok(), &cwd)
    }

    pub fn load_with(
        env: impl Fn(&str) -> Option<String>,
        cwd: &Path,
    ) -> Result<Self, ConfigError> {
        let explicit = env(CONFIG_ENV).filter(|value| !value.trim().is_empty());
        let mut config = match explicit {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                let fallback = cwd.join(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(&fallback)?
                } else {
                    Self::default()
                }
            }
        };
        if let Some(url) = env(API_URL_ENV).filter(|value| !value.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            api: ApiSettings {
                base_url: self.api_base_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                max_document_bytes: self.max_document_bytes,
                ..ApiSettings::default()
            },
            cache_dir: self.document_cache_dir.clone(),
        }
    }
}

//! Runtime configuration, resolved once at startup and passed into the
//! report processor. Nothing below `lib::run` reads the environment.
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults
//! 2. YAML file (`config/config.yaml`, or `--config` / `DRUGDECK_CONFIG`)
//! 3. environment variables (a `.env` file is loaded first)
//!
//! A missing or invalid file is logged and the defaults are used.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::models::InsightProviderKind;

/// Application-level constants
pub const APP_NAME: &str = "DrugDeck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_FDA_BASE_URL: &str = "https://api.fda.gov/drug";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "medgemma";

/// Tracing filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "drugdeck=info,drugdeck_lib=info,warn"
}

/// Directory for run log files (`DRUGDECK_LOG_DIR`, default `logs/`).
pub fn log_dir() -> PathBuf {
    std::env::var("DRUGDECK_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local NDC dataset (`{"results": [...]}`).
    pub data_file: PathBuf,
    /// Where report artifacts are written.
    pub output_dir: PathBuf,
    /// Overwrite the manufacturer name with the company scraped from the label.
    pub refine_company_name: bool,
    /// Legacy top-level key; used when `insights.api_key` is unset.
    pub google_api_key: Option<String>,
    pub fda: FdaConfig,
    pub insights: InsightsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FdaConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub provider: InsightProviderKind,
    /// Model name; provider default when unset.
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// Endpoint root; provider default when unset.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/drug-ndc.json"),
            output_dir: PathBuf::from("reports"),
            refine_company_name: true,
            google_api_key: None,
            fda: FdaConfig::default(),
            insights: InsightsConfig::default(),
        }
    }
}

impl Default for FdaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FDA_BASE_URL.into(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            provider: InsightProviderKind::Placeholder,
            model: None,
            api_key: None,
            base_url: None,
            timeout_secs: 120,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════

impl AppConfig {
    /// Parse a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is valid YAML `null`, not an empty mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Load the file (defaults on failure) and apply process environment
    /// overrides.
    pub fn resolve(path: &Path) -> Self {
        let mut config = match Self::load(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Configuration loaded");
                config
            }
            Err(e) => {
                tracing::warn!(error = %e, "Using default configuration");
                Self::default()
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from an environment lookup. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("DRUGDECK_DATA_FILE") {
            self.data_file = PathBuf::from(v);
        }
        if let Some(v) = var("DRUGDECK_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = var("OPENFDA_API_KEY") {
            self.fda.api_key = Some(v);
        }
        if let Some(v) = var("GOOGLE_API_KEY") {
            self.google_api_key = Some(v);
        }
        if let Some(v) = var("DRUGDECK_INSIGHTS_PROVIDER") {
            match v.parse::<InsightProviderKind>() {
                Ok(kind) => self.insights.provider = kind,
                Err(e) => tracing::warn!(error = %e, "Ignoring DRUGDECK_INSIGHTS_PROVIDER"),
            }
        }
    }

    /// API key for the insight provider, falling back to `google_api_key`.
    pub fn insights_api_key(&self) -> Option<&str> {
        self.insights
            .api_key
            .as_deref()
            .or(self.google_api_key.as_deref())
    }

    pub fn insights_model(&self) -> &str {
        match (&self.insights.model, self.insights.provider) {
            (Some(model), _) => model.as_str(),
            (None, InsightProviderKind::Ollama) => DEFAULT_OLLAMA_MODEL,
            (None, _) => DEFAULT_GEMINI_MODEL,
        }
    }

    pub fn insights_base_url(&self) -> &str {
        match (&self.insights.base_url, self.insights.provider) {
            (Some(url), _) => url.as_str(),
            (None, InsightProviderKind::Ollama) => DEFAULT_OLLAMA_BASE_URL,
            (None, _) => DEFAULT_GEMINI_BASE_URL,
        }
    }
}

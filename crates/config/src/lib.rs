//! Configuration loading, validation, and management for Sahayak.
//!
//! Loads configuration from `~/.sahayak/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use sahayak_core::profile::Field;
use sahayak_core::session::{Language, SessionConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.sahayak/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Per-session planner and evaluator settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Tool gateway settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Words the rule-based extractor recognises
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Upper bound on a single gateway dispatch
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// JSON scheme catalog; the built-in catalog is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            catalog_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,

    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    #[serde(default = "default_occupations")]
    pub occupations: Vec<String>,
}

fn default_regions() -> Vec<String> {
    [
        "andhra pradesh",
        "telangana",
        "karnataka",
        "tamil nadu",
        "maharashtra",
        "odisha",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_categories() -> Vec<String> {
    ["sc", "st", "obc", "bc", "ews", "general", "minority"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_occupations() -> Vec<String> {
    [
        "farmer",
        "student",
        "weaver",
        "fisherman",
        "labourer",
        "artisan",
        "street vendor",
        "homemaker",
        "unemployed",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            categories: default_categories(),
            occupations: default_occupations(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.sahayak/config.toml).
    ///
    /// Environment variables override the file:
    /// - `SAHAYAK_LANGUAGE` (`te` or `en`)
    /// - `SAHAYAK_MAX_RECOVERY_ATTEMPTS`
    /// - `SAHAYAK_CATALOG` (path to a JSON scheme catalog)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment, in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(code) = lookup("SAHAYAK_LANGUAGE") {
            self.session.language = Language::from_code(&code).ok_or_else(|| {
                ConfigError::ValidationError(format!("unsupported language tag '{code}'"))
            })?;
        }

        if let Some(raw) = lookup("SAHAYAK_MAX_RECOVERY_ATTEMPTS") {
            self.session.max_recovery_attempts = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "SAHAYAK_MAX_RECOVERY_ATTEMPTS must be a whole number, got '{raw}'"
                ))
            })?;
        }

        if let Some(path) = lookup("SAHAYAK_CATALOG") {
            self.tools.catalog_path = Some(path);
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".sahayak")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let session = &self.session;

        if session.max_recovery_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "session.max_recovery_attempts must be at least 1".into(),
            ));
        }

        if !(0.0..=1.0).contains(&session.asr_confidence_threshold) {
            return Err(ConfigError::ValidationError(
                "session.asr_confidence_threshold must be between 0.0 and 1.0".into(),
            ));
        }

        if session.max_steps_per_turn == 0 {
            return Err(ConfigError::ValidationError(
                "session.max_steps_per_turn must be at least 1".into(),
            ));
        }

        let distinct: BTreeSet<Field> = session.field_order.iter().copied().collect();
        if session.field_order.len() != Field::CANONICAL.len()
            || distinct.len() != Field::CANONICAL.len()
        {
            return Err(ConfigError::ValidationError(
                "session.field_order must list each of age, income, region, category, occupation exactly once".into(),
            ));
        }

        if self.tools.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "tools.timeout_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `config --init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

//! Configuration system for Compara.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment. Configuration
//! is loaded from the user config directory and/or `.compara/config.toml` in
//! the workspace directory.

use crate::error::ConfigError;
use crate::routing::DEFAULT_DETAIL_BASE;
use crate::snapshot::DEFAULT_COMPARISONS_KEY;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparaConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub comparison: ComparisonConfig,
}

/// Where saved comparisons are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON key-value file. Defaults to `storage.json` in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Key holding the saved comparison list.
    pub comparisons_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            comparisons_key: DEFAULT_COMPARISONS_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    /// Configured path, or the platform data directory, or `./storage.json`.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .or_else(|| project_dirs().map(|d| d.data_dir().join("storage.json")))
            .unwrap_or_else(|| PathBuf::from("storage.json"))
    }
}

/// Which catalog backend serves product data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    #[default]
    File,
    Http,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File => write!(f, "file"),
            CatalogSource::Http => write!(f, "http"),
        }
    }
}

/// Product catalog read API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    /// JSON array of products, for the `file` source.
    pub path: PathBuf,
    /// Hosted backend root, for the `http` source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Table queried on the hosted backend.
    pub table: String,
    /// Inline API key. Prefer `api_key_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::File,
            path: PathBuf::from("catalog.json"),
            base_url: None,
            table: "products".to_string(),
            api_key: None,
            api_key_env: "COMPARA_CATALOG_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Comparison table behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Highlight the best-rated item's column.
    pub highlight_best: bool,
    /// Maximum number of items in one comparison.
    pub max_items: usize,
    /// Path prefix of item detail pages.
    pub detail_base_path: String,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            highlight_best: true,
            max_items: 4,
            detail_base_path: DEFAULT_DETAIL_BASE.to_string(),
        }
    }
}

impl ComparaConfig {
    /// Reject settings that would make the engine unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.comparison.max_items == 0 {
            return Err(ConfigError::Invalid {
                message: "comparison.max_items must be at least 1".into(),
            });
        }
        if self.storage.comparisons_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "storage.comparisons_key must not be empty".into(),
            });
        }
        if self.catalog.source == CatalogSource::Http && self.catalog.base_url.is_none() {
            return Err(ConfigError::Invalid {
                message: "catalog.base_url is required when catalog.source = \"http\"".into(),
            });
        }
        Ok(())
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "compara", "compara")
}

/// Directory for log files.
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Workspace-level config file location.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".compara").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `COMPARA_`)
/// 2. Workspace-local config (`.compara/config.toml`)
/// 3. User config (`<config dir>/compara/config.toml`)
/// 4. Built-in defaults
pub fn load_config(workspace: Option<&Path>) -> Result<ComparaConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ComparaConfig::default()));

    if let Some(dirs) = project_dirs() {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // COMPARA_CATALOG__BASE_URL, COMPARA_COMPARISON__MAX_ITEMS, ...
    figment = figment.merge(Env::prefixed("COMPARA_").split("__"));

    let config: ComparaConfig = figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Whether a user-level or workspace-level config file exists.
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if let Some(dirs) = project_dirs() {
        if dirs.config_dir().join("config.toml").exists() {
            return true;
        }
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}

/// Write the default configuration to the workspace, unless one exists.
///
/// Returns the path and whether a new file was written.
pub fn init_workspace_config(workspace: &Path) -> Result<(PathBuf, bool), ConfigError> {
    let path = workspace_config_path(workspace);
    if path.exists() {
        return Ok((path, false));
    }
    let toml_str =
        toml::to_string_pretty(&ComparaConfig::default()).map_err(|e| ConfigError::Invalid {
            message: e.to_string(),
        })?;
    crate::persistence::atomic_write(&path, toml_str.as_bytes()).map_err(|e| {
        ConfigError::Invalid {
            message: format!("Failed to write {}: {}", path.display(), e),
        }
    })?;
    Ok((path, true))
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filters::FilterLimits;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_MAX_FILTER_JSON_BYTES, DEFAULT_MAX_FILTER_KEYS,
};

// =============================================================================
// File Configuration
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FiltersFileConfig {
    pub max_keys: Option<usize>,
    pub max_json_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreFileConfig {
    pub data_file: Option<String>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub filters: Option<FiltersFileConfig>,
    pub store: Option<StoreFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Names of top-level fields this config does not know
    fn unknown_fields(&self) -> Vec<&str> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(filters) = other.filters {
            let current = self.filters.get_or_insert_with(FiltersFileConfig::default);
            if filters.max_keys.is_some() {
                tracing::trace!(max_keys = ?filters.max_keys, "Merging filters.max_keys");
                current.max_keys = filters.max_keys;
            }
            if filters.max_json_bytes.is_some() {
                tracing::trace!(
                    max_json_bytes = ?filters.max_json_bytes,
                    "Merging filters.max_json_bytes"
                );
                current.max_json_bytes = filters.max_json_bytes;
            }
        }

        if let Some(store) = other.store {
            let current = self.store.get_or_insert_with(StoreFileConfig::default);
            if store.data_file.is_some() {
                tracing::trace!(data_file = ?store.data_file, "Merging store.data_file");
                current.data_file = store.data_file;
            }
        }
    }
}

// =============================================================================
// Resolved Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// JSON record data file used by `query`
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub filters: FilterLimits,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.crm-provider/crm-provider.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        Self::load_with_profile(cli, get_profile_config_path().as_deref())
    }

    fn load_with_profile(cli: &CliConfig, profile_path: Option<&Path>) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = profile_path
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let file_filters = file_config.filters.unwrap_or_default();
        let file_store = file_config.store.unwrap_or_default();

        let filters = FilterLimits {
            max_keys: cli
                .max_filter_keys
                .or(file_filters.max_keys)
                .unwrap_or(DEFAULT_MAX_FILTER_KEYS),
            max_json_bytes: cli
                .max_filter_json_bytes
                .or(file_filters.max_json_bytes)
                .unwrap_or(DEFAULT_MAX_FILTER_JSON_BYTES),
        };

        let data_file = cli
            .data_file
            .clone()
            .or_else(|| file_store.data_file.map(|p| expand_path(&p)));

        let config = Self {
            filters,
            store: StoreConfig { data_file },
        };
        config.validate()?;

        tracing::debug!(
            max_filter_keys = config.filters.max_keys,
            max_filter_json_bytes = config.filters.max_json_bytes,
            data_file = ?config.store.data_file,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.filters.max_keys == 0 {
            anyhow::bail!("Configuration error: filters.max_keys must be greater than 0");
        }
        if self.filters.max_json_bytes == 0 {
            anyhow::bail!("Configuration error: filters.max_json_bytes must be greater than 0");
        }
        Ok(())
    }
}

/// Get the profile config path (~/.crm-provider/crm-provider.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

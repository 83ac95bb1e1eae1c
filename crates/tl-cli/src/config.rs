//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tl_core::{BuildOptions, KeyCache, ValidationError};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rows handed to the span builders per call.
    pub chunk_size: usize,

    /// Bound for the field-name normalization cache.
    pub key_cache_capacity: usize,

    /// Default employee roster when `--employees` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: BuildOptions::DEFAULT_CHUNK_SIZE,
            key_cache_capacity: KeyCache::DEFAULT_CAPACITY,
            employees_path: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TL_*)
        figment = figment.merge(Env::prefixed("TL_"));

        figment.extract()
    }

    /// Pipeline options derived from this configuration.
    pub fn build_options(&self) -> Result<BuildOptions, ValidationError> {
        Ok(BuildOptions::default()
            .with_chunk_size(self.chunk_size)?
            .with_key_cache_capacity(self.key_cache_capacity))
    }
}

/// Returns the platform-specific config directory for tl.
///
/// On Linux: `~/.config/tl`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tl"))
}

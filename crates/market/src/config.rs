use market_catalog::PresentationMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// User settings from `config.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file used when `--catalog` is not given. Relative paths are
    /// resolved against the config file's directory.
    pub catalog: Option<PathBuf>,
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub default_mode: PresentationMode,
}

impl Config {
    /// `<config_dir>/template-market/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("template-market").join("config.toml"))
    }

    /// Load an explicit config file, or the default one if it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    log::debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let (Some(catalog), Some(dir)) = (&config.catalog, path.parent()) {
            if catalog.is_relative() {
                config.catalog = Some(dir.join(catalog));
            }
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

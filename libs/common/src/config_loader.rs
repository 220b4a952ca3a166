//! Layered configuration loading
//!
//! Priority, lowest to highest: built-in defaults, YAML file, prefixed
//! environment variables, then whatever the caller merges on top (usually CLI
//! overrides). Nested keys in the environment are separated by `__`, so
//! `FEEDSRV_API__PORT=7000` sets `api.port`.

use errors::{config_error, FeedError, FeedResult};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Location of the YAML layer
#[derive(Debug, Clone)]
pub enum ConfigFile {
    /// Used if present, skipped with a warning otherwise
    Optional(PathBuf),
    /// Must exist
    Required(PathBuf),
}

impl ConfigFile {
    pub fn path(&self) -> &Path {
        match self {
            ConfigFile::Optional(path) | ConfigFile::Required(path) => path,
        }
    }
}

/// Build the defaults + file + environment stack
pub fn layered_figment<T: Serialize>(
    defaults: &T,
    file: &ConfigFile,
    env_prefix: &str,
) -> FeedResult<Figment> {
    let mut figment = Figment::from(Serialized::defaults(defaults));

    let path = file.path();
    if path.exists() {
        info!("Loading configuration from {}", path.display());
        figment = figment.merge(Yaml::file(path));
    } else if let ConfigFile::Required(_) = file {
        return Err(FeedError::Configuration(format!(
            "configuration file {} not found",
            path.display()
        )));
    } else {
        warn!("Config file {} not found, using defaults", path.display());
    }

    Ok(figment.merge(Env::prefixed(env_prefix).split("__")))
}

/// Extract a typed configuration, mapping figment errors into `FeedError`
pub fn extract<T: DeserializeOwned>(figment: &Figment) -> FeedResult<T> {
    figment
        .extract()
        .map_err(|e| config_error!("failed to load configuration: {}", e))
}

//! feedsrv configuration
//!
//! Loaded through the shared figment stack: defaults, `config/feedsrv.yaml`
//! (or `--config`), `FEEDSRV_*` environment variables, then CLI overrides.

use clap::Parser;
use common::{extract, layered_figment, ConfigFile, LoggingConfig};
use errors::{FeedError, FeedResult};
use feed_model::Address;
use feed_store::StoreConfig;
use figment::providers::Serialized;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 6010;
pub const DEFAULT_CONFIG_PATH: &str = "config/feedsrv.yaml";
pub const ENV_PREFIX: &str = "FEEDSRV_";

/// Command-line arguments
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "feedsrv", author, version, about = "Permissioned price-feed store service")]
pub struct Args {
    /// Configuration file (defaults to config/feedsrv.yaml when present)
    #[arg(short, long, env = "FEEDSRV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bind address override, e.g. 127.0.0.1:6010
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    pub validate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    pub name: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            name: "feedsrv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ApiConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Owner of a freshly created store; ignored when a snapshot is restored
    pub creator: Option<Address>,
    pub max_batch_size: usize,
    pub median_len: usize,
    pub base_symbol: String,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for StoreSection {
    fn default() -> Self {
        let limits = StoreConfig::default();
        Self {
            creator: None,
            max_batch_size: limits.max_batch_size,
            median_len: limits.median_len,
            base_symbol: limits.base_symbol,
            snapshot_path: None,
        }
    }
}

impl StoreSection {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            max_batch_size: self.max_batch_size,
            median_len: self.median_len,
            base_symbol: self.base_symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsrvConfig {
    pub service: ServiceSection,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub store: StoreSection,
}

impl FeedsrvConfig {
    /// Load, apply CLI overrides and validate
    pub fn load(args: &Args) -> FeedResult<Self> {
        let file = match &args.config {
            Some(path) => ConfigFile::Required(path.clone()),
            None => ConfigFile::Optional(PathBuf::from(DEFAULT_CONFIG_PATH)),
        };
        let mut figment = layered_figment(&Self::default(), &file, ENV_PREFIX)?;

        if let Some(bind) = args.bind {
            figment = figment
                .merge(Serialized::default("api.host", bind.ip().to_string()))
                .merge(Serialized::default("api.port", bind.port()));
        }
        if let Some(level) = &args.log_level {
            figment = figment.merge(Serialized::default("logging.level", level));
        }

        let config: Self = extract(&figment)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FeedResult<()> {
        if self.service.name.trim().is_empty() {
            return Err(invalid("service.name", "cannot be empty"));
        }
        if self.api.host.trim().is_empty() {
            return Err(invalid("api.host", "cannot be empty"));
        }
        match self.store.creator {
            None => return Err(invalid("store.creator", "must be set")),
            Some(creator) if creator.is_zero() => {
                return Err(invalid("store.creator", "cannot be the zero address"))
            },
            Some(_) => {},
        }
        self.store
            .store_config()
            .validate()
            .map_err(|e| match e {
                FeedError::InvalidConfig { field, reason } => {
                    invalid(&format!("store.{}", field), &reason)
                },
                other => other,
            })
    }

    /// Creator address; only valid after `validate`
    pub fn creator(&self) -> FeedResult<Address> {
        self.store
            .creator
            .ok_or_else(|| invalid("store.creator", "must be set"))
    }
}

fn invalid(field: &str, reason: &str) -> FeedError {
    FeedError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

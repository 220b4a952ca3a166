//! Service startup helpers

use crate::logging::{self, LogConfig, LoggingConfig};
use tracing::info;

/// Service metadata for startup
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    /// Service name (e.g., "feedsrv")
    pub name: String,
    pub version: String,
    pub description: String,
    pub default_port: u16,
}

impl ServiceInfo {
    /// `version` is normally `env!("CARGO_PKG_VERSION")` of the binary crate
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
        default_port: u16,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
            default_port,
        }
    }
}

/// Log a short startup banner
pub fn print_startup_banner(service: &ServiceInfo) {
    info!("==============================================");
    info!(" {} v{}", service.name.to_uppercase(), service.version);
    info!(" {}", service.description);
    info!(" Default Port: {}", service.default_port);
    info!("==============================================");
}

/// Initialize logging for a service from its `logging` config section
pub fn init_logging(service: &ServiceInfo, section: &LoggingConfig) -> anyhow::Result<()> {
    let config = LogConfig::from_section(service.name.clone(), section);
    logging::init_with_config(config).map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(())
}

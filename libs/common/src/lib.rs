//! Common plumbing shared by feed services
//!
//! - `logging`: tracing subscriber setup with bracketed console output and
//!   optional daily-rolling files
//! - `config_loader`: figment stack of defaults, YAML and environment
//! - `api_types`: success/error response envelopes
//! - `shutdown`: signal and trigger based graceful shutdown
//! - `service_bootstrap`: service metadata, banner, logging init

pub mod api_types;
pub mod config_loader;
pub mod logging;
pub mod service_bootstrap;
pub mod shutdown;

pub use api_types::{Ack, ErrorResponse, SuccessResponse};
pub use config_loader::{extract, layered_figment, ConfigFile};
pub use logging::{LogConfig, LoggingConfig};
pub use service_bootstrap::{init_logging, print_startup_banner, ServiceInfo};
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};

//! Unified error handling for the price-feed store
//!
//! Every crate in the workspace reports failures through [`FeedError`], so the
//! store, the HTTP layer and the logs agree on one taxonomy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// ErrorInfo - API error response type
// ============================================================================

/// Standard error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (HTTP status or custom)
    pub code: u16,
    /// Error message
    pub message: String,
    /// Detailed error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Field-specific errors for validation
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, Vec<String>>,
}

impl ErrorInfo {
    /// Create a new ErrorInfo with just a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: 500,
            message: message.into(),
            details: None,
            field_errors: HashMap::new(),
        }
    }

    /// Set the error code
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    /// Add details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a field error
    pub fn add_field_error(mut self, field: impl Into<String>, error: impl Into<String>) -> Self {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(error.into());
        self
    }
}

// ============================================================================
// FeedError - Main error type
// ============================================================================

/// Main error type for the price-feed store
#[derive(Debug, Error)]
pub enum FeedError {
    // ======================================
    // Access Errors
    // ======================================
    /// Caller lacks the role or identity a mutating operation requires
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// `claim_ownership` called while no transfer is pending
    #[error("No pending ownership transfer")]
    NoPendingTransfer,

    /// Caller is known but blocked by a feature gate
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ======================================
    // Validation Errors
    // ======================================
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid asset key: {0}")]
    InvalidAssetKey(String),

    #[error("Invalid parameter: {param}: {reason}")]
    InvalidParameter { param: String, reason: String },

    #[error("Batch too large: {len} entries exceeds limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    #[error("Division by zero: {context}")]
    DivisionByZero { context: String },

    // ======================================
    // Configuration Errors
    // ======================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // ======================================
    // File & I/O Errors
    // ======================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // ======================================
    // Catch-all
    // ======================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FeedError
pub type FeedResult<T> = Result<T, FeedError>;

impl FeedError {
    /// Shorthand for an [`FeedError::InvalidParameter`]
    pub fn invalid_parameter(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidAddress(_)
            | Self::InvalidAssetKey(_)
            | Self::InvalidParameter { .. }
            | Self::BatchTooLarge { .. }
            | Self::DivisionByZero { .. } => 400,

            // 401 Unauthorized
            Self::Unauthorized(_) => 401,

            // 403 Forbidden
            Self::Forbidden(_) => 403,

            // 409 Conflict
            Self::NoPendingTransfer => 409,

            // 500 Internal Server Error
            Self::Configuration(_)
            | Self::InvalidConfig { .. }
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Stable machine-readable code for API bodies and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NoPendingTransfer => "NO_PENDING_TRANSFER",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InvalidAddress(_) => "INVALID_ADDRESS",
            Self::InvalidAssetKey(_) => "INVALID_ASSET_KEY",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::DivisionByZero { .. } => "DIVISION_BY_ZERO",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Other(_) => "OTHER_ERROR",
        }
    }

    /// Error category for classification and log levels
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized(_) | Self::NoPendingTransfer => ErrorCategory::Permission,
            Self::Forbidden(_) => ErrorCategory::Gated,
            Self::InvalidAddress(_)
            | Self::InvalidAssetKey(_)
            | Self::InvalidParameter { .. }
            | Self::DivisionByZero { .. } => ErrorCategory::Validation,
            Self::BatchTooLarge { .. } => ErrorCategory::ResourceExhausted,
            Self::Configuration(_) | Self::InvalidConfig { .. } => ErrorCategory::Configuration,
            Self::Io(_) | Self::Serialization(_) | Self::Internal(_) => ErrorCategory::Internal,
            Self::Other(_) => ErrorCategory::Unknown,
        }
    }

    /// Suggested tracing level when this error is logged
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;
        match self.category() {
            ErrorCategory::Internal | ErrorCategory::Configuration => Level::ERROR,
            ErrorCategory::Permission | ErrorCategory::Gated => Level::WARN,
            ErrorCategory::Validation | ErrorCategory::ResourceExhausted => Level::INFO,
            ErrorCategory::Unknown => Level::WARN,
        }
    }

    /// Convert to API ErrorInfo for HTTP responses
    pub fn to_error_info(&self) -> ErrorInfo {
        let mut error_info = ErrorInfo::new(self.to_string()).with_code(self.status_code());

        match self {
            Self::InvalidParameter { param, reason } => {
                error_info = error_info.add_field_error(param, reason);
            },
            Self::InvalidConfig { field, reason } => {
                error_info = error_info.add_field_error(field, reason);
            },
            Self::BatchTooLarge { len, max } => {
                error_info = error_info.with_details(format!("received {}, limit {}", len, max));
            },
            _ => {},
        }

        error_info
    }

    /// Convert into an Axum HTTP response
    #[cfg(feature = "axum-support")]
    #[allow(clippy::disallowed_methods)] // json! macro internally uses unwrap (safe for known valid JSON)
    pub fn into_http_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::response::{IntoResponse, Json};
        use serde_json::json;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "success": false,
                "error_code": self.error_code(),
                "error": self.to_error_info(),
            })),
        )
            .into_response()
    }
}

// Conversion traits for common error types
impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for FeedError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// Helper macros for creating errors
#[macro_export]
macro_rules! unauthorized {
    ($msg:expr) => {
        $crate::FeedError::Unauthorized($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::FeedError::Unauthorized(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! forbidden {
    ($msg:expr) => {
        $crate::FeedError::Forbidden($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::FeedError::Forbidden(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::FeedError::Configuration($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::FeedError::Configuration(format!($fmt, $($arg)*))
    };
}

/// Error category enum - used for classification and log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing role or wrong identity
    Permission,
    /// Blocked by whitelist or median gate
    Gated,
    Validation,
    ResourceExhausted,
    Configuration,
    Internal,
    Unknown,
}

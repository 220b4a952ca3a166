//! HTTP error mapping

use axum::response::{IntoResponse, Response};
use errors::FeedError;
use tracing::{debug, error, info, warn};

/// Result type for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// `FeedError` rendered as an `ErrorResponse` body with the matching status
#[derive(Debug)]
pub struct ApiError(pub FeedError);

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        match err.log_level() {
            tracing::Level::ERROR => error!("Request failed [{}]: {}", err.error_code(), err),
            tracing::Level::WARN => warn!("Request refused [{}]: {}", err.error_code(), err),
            tracing::Level::INFO => info!("Request rejected [{}]: {}", err.error_code(), err),
            _ => debug!("Request rejected [{}]: {}", err.error_code(), err),
        }
        err.into_http_response()
    }
}

//! Caller identity extraction

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use errors::FeedError;
use feed_model::Address;

use crate::error::ApiError;

/// Header carrying the caller's address
pub const CALLER_HEADER: &str = "x-caller-address";

/// The address a request acts as
///
/// A request without the header is anonymous and resolves to the zero
/// address, which holds no role and is only admitted by open gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Address);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(CALLER_HEADER) else {
            return Ok(Caller(Address::ZERO));
        };
        let raw = value.to_str().map_err(|_| {
            FeedError::InvalidAddress(format!("{} header is not valid ASCII", CALLER_HEADER))
        })?;
        Ok(Caller(raw.parse::<Address>()?))
    }
}

//! REST API for the feed store
//!
//! Handlers are thin: they resolve the caller, decode the body and hand off
//! to `PriceFeed`, which enforces roles and gates itself.

pub mod caller;
pub mod handlers;
pub mod models;
pub mod routes;

pub use caller::{Caller, CALLER_HEADER};
pub use routes::create_router;

//! API routes configuration

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::handlers::*;
use crate::AppState;

/// Prefix of every store endpoint
pub const API_PREFIX: &str = "/api/v1";

fn path(suffix: &str) -> String {
    format!("{}/{}", API_PREFIX, suffix)
}

/// Create API routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // ownership and roles
        .route(&path("ownership"), get(get_ownership))
        .route(&path("ownership/transfer"), post(transfer_ownership))
        .route(&path("ownership/claim"), post(claim_ownership))
        .route(&path("roles/{role}/{address}"), get(get_role))
        .route(&path("roles/grant"), post(grant_role))
        .route(&path("roles/revoke"), post(revoke_role))
        .route(&path("relayers"), post(add_relayers).delete(remove_relayers))
        // gates and whitelist
        .route(&path("gates"), get(get_gates))
        .route(&path("gates/whitelist"), put(set_whitelist_status))
        .route(&path("gates/median"), put(set_median_status))
        .route(&path("whitelist"), post(whitelist_address))
        .route(
            &path("whitelist/{address}"),
            get(get_whitelisted).delete(remove_whitelisted_address),
        )
        // feeds
        .route(&path("prices"), post(post_prices))
        .route(&path("prices/query"), post(query_prices))
        .route(&path("prices/{asset}"), get(get_price))
        .route(&path("deviations"), post(post_deviations))
        .route(&path("deviations/query"), post(query_deviations))
        .route(&path("deviations/{asset}"), get(get_deviation))
        .route(&path("medians"), post(post_medians))
        .route(&path("medians/query"), post(query_medians))
        .route(&path("medians/{asset}"), get(get_median))
        // reference pairs
        .route(&path("reference/query"), post(query_reference))
        .route(&path("reference/{base}/{quote}"), get(get_reference))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

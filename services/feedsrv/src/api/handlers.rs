//! API handlers for the feed service

use axum::{
    extract::{Path, State},
    response::Json,
};
use common::{Ack, SuccessResponse};
use feed_model::{
    Address, AssetKey, MedianData, PostMode, PostReport, PriceData, ReferenceData, Role,
};
use std::sync::Arc;
use tracing::info;

use crate::api::caller::Caller;
use crate::api::models::*;
use crate::error::ApiResult;
use crate::AppState;

type ApiJson<T> = Json<SuccessResponse<T>>;

fn ok<T>(data: T) -> ApiJson<T> {
    Json(SuccessResponse::new(data))
}

fn ok_list<T>(data: Vec<T>) -> ApiJson<Vec<T>> {
    let count = data.len();
    Json(SuccessResponse::new(data).with_metadata("count", serde_json::Value::from(count)))
}

fn parse_address(raw: &str) -> ApiResult<Address> {
    Ok(raw.parse()?)
}

fn parse_asset(raw: &str) -> ApiResult<AssetKey> {
    Ok(raw.parse()?)
}

/// Liveness plus store counts
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiJson<HealthResponse> {
    ok(HealthResponse {
        service: state.service_name.clone(),
        status: HEALTH_OK.to_string(),
        version: state.version.clone(),
        stats: state.feed.stats(),
    })
}

// ==================== Ownership ====================

pub async fn get_ownership(State(state): State<Arc<AppState>>) -> ApiJson<OwnershipResponse> {
    ok(OwnershipResponse {
        owner: state.feed.owner(),
        pending_owner: state.feed.pending_owner(),
    })
}

pub async fn transfer_ownership(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<TransferOwnershipRequest>,
) -> ApiResult<ApiJson<Ack>> {
    state.feed.transfer_ownership(&caller, request.new_owner)?;
    info!("Ownership transfer to {} started by {}", request.new_owner, caller);
    Ok(ok(Ack::ok()))
}

pub async fn claim_ownership(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
) -> ApiResult<ApiJson<OwnershipResponse>> {
    state.feed.claim_ownership(&caller)?;
    info!("Ownership claimed by {}", caller);
    Ok(ok(OwnershipResponse {
        owner: state.feed.owner(),
        pending_owner: state.feed.pending_owner(),
    }))
}

// ==================== Roles ====================

pub async fn get_role(
    State(state): State<Arc<AppState>>,
    Path((role, address)): Path<(String, String)>,
) -> ApiResult<ApiJson<RoleResponse>> {
    let role: Role = role.parse()?;
    let address = parse_address(&address)?;
    Ok(ok(RoleResponse {
        role,
        address,
        granted: state.feed.has_role(role, &address),
    }))
}

pub async fn grant_role(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<RoleRequest>,
) -> ApiResult<ApiJson<Ack>> {
    state
        .feed
        .grant_role(&caller, request.role, request.address)?;
    Ok(ok(Ack::ok()))
}

pub async fn revoke_role(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<RoleRequest>,
) -> ApiResult<ApiJson<Ack>> {
    state
        .feed
        .revoke_role(&caller, request.role, request.address)?;
    Ok(ok(Ack::ok()))
}

pub async fn add_relayers(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<RelayersRequest>,
) -> ApiResult<ApiJson<Ack>> {
    state.feed.add_relayers(&caller, &request.addresses)?;
    Ok(ok(Ack::ok()))
}

pub async fn remove_relayers(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<RelayersRequest>,
) -> ApiResult<ApiJson<Ack>> {
    state.feed.remove_relayers(&caller, &request.addresses)?;
    Ok(ok(Ack::ok()))
}

// ==================== Gates and whitelist ====================

pub async fn get_gates(State(state): State<Arc<AppState>>) -> ApiJson<GatesResponse> {
    ok(state.feed.gates().into())
}

pub async fn set_whitelist_status(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<WhitelistStatusRequest>,
) -> ApiResult<ApiJson<GatesResponse>> {
    state.feed.set_whitelist_status(&caller, request.enabled)?;
    Ok(ok(state.feed.gates().into()))
}

pub async fn set_median_status(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<MedianStatusRequest>,
) -> ApiResult<ApiJson<GatesResponse>> {
    state.feed.set_median_status(&caller, request.disabled)?;
    Ok(ok(state.feed.gates().into()))
}

pub async fn whitelist_address(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<WhitelistRequest>,
) -> ApiResult<ApiJson<WhitelistEntryResponse>> {
    state.feed.whitelist_address(&caller, request.address)?;
    Ok(ok(WhitelistEntryResponse {
        address: request.address,
        whitelisted: true,
    }))
}

pub async fn remove_whitelisted_address(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(address): Path<String>,
) -> ApiResult<ApiJson<WhitelistEntryResponse>> {
    let address = parse_address(&address)?;
    state.feed.remove_whitelisted_address(&caller, address)?;
    Ok(ok(WhitelistEntryResponse {
        address,
        whitelisted: false,
    }))
}

pub async fn get_whitelisted(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> ApiResult<ApiJson<WhitelistEntryResponse>> {
    let address = parse_address(&address)?;
    Ok(ok(WhitelistEntryResponse {
        address,
        whitelisted: state.feed.is_whitelisted(&address),
    }))
}

// ==================== Posting ====================

pub async fn post_prices(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<PricePostRequest>,
) -> ApiResult<ApiJson<PostReport>> {
    let report = state.feed.post_prices(
        &caller,
        request.records,
        PostMode::from(request.strict),
    )?;
    Ok(ok(report))
}

pub async fn post_deviations(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<PricePostRequest>,
) -> ApiResult<ApiJson<PostReport>> {
    let report = state.feed.post_deviations(
        &caller,
        request.records,
        PostMode::from(request.strict),
    )?;
    Ok(ok(report))
}

pub async fn post_medians(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<MedianPostRequest>,
) -> ApiResult<ApiJson<PostReport>> {
    let report = state.feed.post_medians(
        &caller,
        request.records,
        PostMode::from(request.strict),
    )?;
    Ok(ok(report))
}

// ==================== Queries ====================

pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(asset): Path<String>,
) -> ApiResult<ApiJson<PriceData>> {
    let key = parse_asset(&asset)?;
    Ok(ok(state.feed.get_price_data(&caller, &key)?))
}

pub async fn query_prices(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<AssetsQuery>,
) -> ApiResult<ApiJson<Vec<PriceData>>> {
    Ok(ok_list(
        state.feed.get_price_data_bulk(&caller, &request.assets)?,
    ))
}

pub async fn get_deviation(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(asset): Path<String>,
) -> ApiResult<ApiJson<PriceData>> {
    let key = parse_asset(&asset)?;
    Ok(ok(state.feed.get_deviation_data(&caller, &key)?))
}

pub async fn query_deviations(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<AssetsQuery>,
) -> ApiResult<ApiJson<Vec<PriceData>>> {
    Ok(ok_list(
        state.feed.get_deviation_data_bulk(&caller, &request.assets)?,
    ))
}

pub async fn get_median(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(asset): Path<String>,
) -> ApiResult<ApiJson<MedianData>> {
    let key = parse_asset(&asset)?;
    Ok(ok(state.feed.get_median_data(&caller, &key)?))
}

pub async fn query_medians(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<AssetsQuery>,
) -> ApiResult<ApiJson<Vec<MedianData>>> {
    Ok(ok_list(
        state.feed.get_median_data_bulk(&caller, &request.assets)?,
    ))
}

pub async fn get_reference(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path((base, quote)): Path<(String, String)>,
) -> ApiResult<ApiJson<ReferenceData>> {
    let base = parse_asset(&base)?;
    let quote = parse_asset(&quote)?;
    Ok(ok(state.feed.get_reference_data(&caller, &base, &quote)?))
}

pub async fn query_reference(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<ReferenceQuery>,
) -> ApiResult<ApiJson<Vec<ReferenceData>>> {
    Ok(ok_list(
        state
            .feed
            .get_reference_data_bulk(&caller, &request.pairs)?,
    ))
}

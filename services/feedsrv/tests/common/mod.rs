//! Shared helpers for feedsrv integration tests

#![allow(dead_code)]
#![allow(clippy::disallowed_methods)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use feed_model::Address;
use feed_store::helpers::{create_test_feed, test_address};
use feedsrv::api::CALLER_HEADER;
use feedsrv::{create_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt;

pub const OWNER: u8 = 0xa1;
pub const RELAYER: u8 = 0xb2;
pub const READER: u8 = 0xc3;
pub const STRANGER: u8 = 0xd4;

pub fn addr(byte: u8) -> Address {
    test_address(byte)
}

pub fn addr_str(byte: u8) -> String {
    addr(byte).to_string()
}

/// Router over a fresh store owned by `OWNER`
pub fn create_test_router() -> Router {
    let feed = create_test_feed(addr(OWNER)).unwrap();
    create_router(AppState::new(feed, "feedsrv"))
}

/// Router with `RELAYER` already granted the relayer role
pub async fn create_router_with_relayer() -> Router {
    let app = create_test_router();
    let (status, _) = json_request(
        &app,
        "POST",
        "/api/v1/relayers",
        Some(OWNER),
        Some(json!({ "addresses": [addr_str(RELAYER)] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    app
}

/// Send a request as `caller` (anonymous when `None`)
pub async fn json_request(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<u8>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(byte) = caller {
        builder = builder.header(CALLER_HEADER, addr_str(byte));
    }
    let request = match body {
        Some(json) => builder
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, body)
}

pub fn price_record(asset: &str, value: u64, id: u64, resolve_time: u64) -> Value {
    json!({
        "asset_name": asset,
        "value": value,
        "id": id,
        "resolve_time": resolve_time,
    })
}

pub fn median_record(asset: &str, values: Vec<u64>, id: u64, resolve_time: u64) -> Value {
    json!({
        "asset_name": asset,
        "values": values,
        "id": id,
        "resolve_time": resolve_time,
    })
}

//! Shared setup for the HTTP flow tests.
#![allow(dead_code)]

use std::sync::Arc;

use authgate_backend_lib::{
    auth::KeyPair,
    config::{Settings, UserFixture},
    router::create_router,
    AppState,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use serde::de::DeserializeOwned;

pub const PRIVATE_PEM: &str = include_str!("../../testdata/jwt_priv.pem");
pub const PUBLIC_PEM: &str = include_str!("../../testdata/jwt_pub.pem");

pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.users = vec![
        UserFixture::new("foouser", "111"),
        UserFixture::new("baruser", "222").with_secret("bar's secret"),
    ];
    settings
}

/// Router wired to the fixed test key pair
pub async fn app(settings: Settings) -> Router {
    let keys = KeyPair::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes()).unwrap();
    let state = AppState::with_keys(settings, keys)
        .await
        .expect("Failed to create AppState for test");
    create_router(Arc::new(state))
}

pub fn login_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn with_cookie(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("authToken={token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn with_bearer(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn bare(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Raw `Set-Cookie` header of a response
pub fn set_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response sets a cookie")
        .to_str()
        .unwrap()
        .to_string()
}

/// Value part of `name=value; attrs...`, as a cookie jar would store it
pub fn cookie_token(set_cookie: &str) -> String {
    let pair = set_cookie.split(';').next().unwrap();
    let (name, value) = pair.split_once('=').unwrap();
    assert_eq!(name, "authToken");
    value.to_string()
}

pub async fn json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================
// crates/backend-lib/src/transport.rs
// ============================
//! Moving tokens in and out of HTTP messages.
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};
use chrono::{DateTime, Utc};

use crate::config::{TokenDelivery, TokenSettings};
use crate::error::AppError;

/// Pull the token from wherever the configured delivery mode puts it
pub fn extract_token<'a>(headers: &'a HeaderMap, settings: &TokenSettings) -> Option<&'a str> {
    match settings.delivery {
        TokenDelivery::Cookie => cookie_value(headers, &settings.cookie_name),
        TokenDelivery::Bearer => bearer_token(headers),
    }
}

/// `Authorization: Bearer <token>`; exactly two space-separated parts.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }
    Some(token)
}

/// Value of cookie `name` across all `Cookie` headers. Empty values count as absent.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for the token cookie. The cookie's `Expires` mirrors
/// the token's own expiry and scripts cannot read it.
pub fn token_cookie(
    name: &str,
    value: &str,
    expires_at: DateTime<Utc>,
) -> Result<HeaderValue, AppError> {
    let cookie = format!(
        "{name}={value}; Expires={}; Path=/; HttpOnly; SameSite=Strict",
        http_date(expires_at)
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Internal(format!("unencodable cookie header: {e}")))
}

/// IMF-fixdate, as required for the cookie `Expires` attribute
fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_bearer_token() {
        let auth = |value: &'static str| headers(&[("authorization", value)]);

        assert_eq!(bearer_token(&auth("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&auth("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&auth("Basic abc")), None);
        assert_eq!(bearer_token(&auth("Bearer")), None);
        assert_eq!(bearer_token(&auth("Bearer a b")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cookie_value() {
        let map = headers(&[("cookie", "XSRF-TOKEN=x; authToken=abc.def.ghi; theme=dark")]);
        assert_eq!(cookie_value(&map, "authToken"), Some("abc.def.ghi"));
        assert_eq!(cookie_value(&map, "theme"), Some("dark"));
        assert_eq!(cookie_value(&map, "missing"), None);

        let split = headers(&[("cookie", "a=1"), ("cookie", "authToken=tok")]);
        assert_eq!(cookie_value(&split, "authToken"), Some("tok"));

        let empty = headers(&[("cookie", "authToken=")]);
        assert_eq!(cookie_value(&empty, "authToken"), None);

        // Prefix of another name must not match
        let prefixed = headers(&[("cookie", "authTokenOld=stale")]);
        assert_eq!(cookie_value(&prefixed, "authToken"), None);
    }

    #[test]
    fn test_extract_follows_delivery_mode() {
        let map = headers(&[
            ("cookie", "authToken=from-cookie"),
            ("authorization", "Bearer from-header"),
        ]);
        let mut settings = TokenSettings::default();

        assert_eq!(extract_token(&map, &settings), Some("from-cookie"));
        settings.delivery = TokenDelivery::Bearer;
        assert_eq!(extract_token(&map, &settings), Some("from-header"));
    }

    #[test]
    fn test_token_cookie_attributes() {
        let expires = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let cookie = token_cookie("authToken", "abc.def.ghi", expires).unwrap();

        assert_eq!(
            cookie.to_str().unwrap(),
            concat!(
                "authToken=abc.def.ghi; Expires=Tue, 14 Nov 2023 22:13:20 GMT; ",
                "Path=/; HttpOnly; SameSite=Strict"
            )
        );
    }
}

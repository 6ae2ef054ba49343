//! Fixed RSA key pairs and state builders for unit tests.
use std::sync::Arc;

use crate::auth::KeyPair;
use crate::config::Settings;
use crate::AppState;

pub(crate) const PRIVATE_PEM: &str = include_str!("../testdata/jwt_priv.pem");
pub(crate) const PUBLIC_PEM: &str = include_str!("../testdata/jwt_pub.pem");
pub(crate) const OTHER_PRIVATE_PEM: &str = include_str!("../testdata/jwt_priv_other.pem");
pub(crate) const OTHER_PUBLIC_PEM: &str = include_str!("../testdata/jwt_pub_other.pem");

pub(crate) fn test_key_pair() -> KeyPair {
    KeyPair::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes()).unwrap()
}

pub(crate) fn other_key_pair() -> KeyPair {
    KeyPair::from_pem(OTHER_PRIVATE_PEM.as_bytes(), OTHER_PUBLIC_PEM.as_bytes()).unwrap()
}

pub(crate) async fn test_state(settings: Settings) -> Arc<AppState> {
    Arc::new(AppState::with_keys(settings, test_key_pair()).await.unwrap())
}

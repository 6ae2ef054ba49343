// ============================
// authgate-backend-lib/src/auth/verifier.rs
// ============================
//! Token verification.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, Validation};

use super::claims::Claims;
use super::keys::KeyPair;
use super::token::{token_validation, TokenError};

/// Checks tokens against the public half of the key pair.
///
/// The signature is verified by `jsonwebtoken` before the claims are looked
/// at, so an expired verdict is only ever given for a genuine token. Only
/// RS256 headers are accepted.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<KeyPair>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: Arc<KeyPair>) -> Self {
        Self {
            keys,
            validation: token_validation(),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, self.keys.decoding_key(), &self.validation)
            .map_err(|e| classify(e.kind()))?;

        if data.claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenIssuer;
    use crate::testkeys::{other_key_pair, test_key_pair, PUBLIC_PEM};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use chrono::Duration;
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    const SIX_HOURS: std::time::Duration = std::time::Duration::from_secs(6 * 60 * 60);

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn pair() -> (TokenIssuer, TokenVerifier) {
        let keys = Arc::new(test_key_pair());
        (TokenIssuer::new(keys.clone(), SIX_HOURS), TokenVerifier::new(keys))
    }

    #[test]
    fn test_round_trip() {
        let (issuer, verifier) = pair();
        let issued = issuer.issue_at("foouser", t0()).unwrap();

        assert_eq!(issued.expires_at, t0() + Duration::hours(6));
        let claims = verifier.verify_at(&issued.token, t0()).unwrap();
        assert_eq!(claims.username, "foouser");
        assert_eq!(claims.expires_at(), Some(issued.expires_at));
    }

    #[test]
    fn test_live_clock_round_trip() {
        let (issuer, verifier) = pair();
        let issued = issuer.issue("foouser").unwrap();
        assert_eq!(verifier.verify(&issued.token).unwrap().username, "foouser");
    }

    #[test]
    fn test_accepted_until_lifetime_elapses() {
        let (issuer, verifier) = pair();
        let token = issuer.issue_at("foouser", t0()).unwrap().token;

        for offset in [
            Duration::zero(),
            Duration::minutes(1),
            Duration::hours(3),
            Duration::hours(6) - Duration::seconds(1),
        ] {
            assert!(verifier.verify_at(&token, t0() + offset).is_ok(), "offset {offset}");
        }

        for offset in [
            Duration::hours(6),
            Duration::hours(6) + Duration::seconds(1),
            Duration::days(30),
        ] {
            assert_eq!(
                verifier.verify_at(&token, t0() + offset).unwrap_err(),
                TokenError::Expired,
                "offset {offset}"
            );
        }
    }

    #[test]
    fn test_sub_second_issue_time_keeps_full_lifetime() {
        let (issuer, verifier) = pair();
        let t0 = DateTime::from_timestamp(1_700_000_000, 700_000_000).unwrap();
        let token = issuer.issue_at("foouser", t0).unwrap().token;

        let almost = t0 + Duration::hours(6) - Duration::milliseconds(500);
        assert!(verifier.verify_at(&token, almost).is_ok());
        let last_ms = t0 + Duration::hours(6) - Duration::milliseconds(1);
        assert!(verifier.verify_at(&token, last_ms).is_ok());
        assert_eq!(
            verifier.verify_at(&token, t0 + Duration::hours(6)).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_other_key_is_rejected_regardless_of_expiry() {
        let (_, verifier) = pair();
        let foreign = TokenIssuer::new(Arc::new(other_key_pair()), SIX_HOURS);

        let fresh = foreign.issue_at("foouser", t0()).unwrap().token;
        assert_eq!(verifier.verify_at(&fresh, t0()).unwrap_err(), TokenError::BadSignature);

        // An expired foreign token is still reported as a signature failure
        let stale = foreign.issue_expired("foouser", t0()).unwrap().token;
        assert_eq!(verifier.verify_at(&stale, t0()).unwrap_err(), TokenError::BadSignature);
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let (issuer, verifier) = pair();
        let token = issuer.issue_at("foouser", t0()).unwrap().token;

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        let mut claims: Claims =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        claims.username = "admin".to_string();
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(verifier.verify_at(&forged, t0()).unwrap_err(), TokenError::BadSignature);
    }

    #[test]
    fn test_algorithm_confusion_is_rejected() {
        let (_, verifier) = pair();
        // HMAC keyed with the public key PEM, the classic RS256/HS256 confusion
        let claims = Claims::new("foouser", t0() + Duration::hours(1));
        let forged = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(PUBLIC_PEM.as_bytes()),
        )
        .unwrap();

        assert_eq!(verifier.verify_at(&forged, t0()).unwrap_err(), TokenError::BadSignature);
    }

    #[test]
    fn test_unsigned_token_is_rejected() {
        let (_, verifier) = pair();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(br#"{"username":"foouser","exp":9999999999}"#);
        let token = format!("{header}.{payload}.");

        assert!(verifier.verify_at(&token, t0()).is_err());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let (_, verifier) = pair();
        for token in ["", "abc", "a.b.c", "not.a.jwt.at.all"] {
            assert_eq!(verifier.verify_at(token, t0()).unwrap_err(), TokenError::Malformed);
        }
    }

    #[test]
    fn test_issue_expired_is_signed_but_dead() {
        let (issuer, verifier) = pair();
        let issued = issuer.issue_expired("foouser", t0()).unwrap();

        assert!(issued.expires_at < t0());
        assert_eq!(verifier.verify_at(&issued.token, t0()).unwrap_err(), TokenError::Expired);
    }
}

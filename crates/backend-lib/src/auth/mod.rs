// ============================
// authgate-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod claims;
pub mod credentials;
pub mod issuer;
pub mod keys;
pub mod password;
pub mod revocation;
mod token;
pub mod verifier;

pub use claims::Claims;
pub use credentials::{CredentialError, CredentialStore, MatchResult, UserRecord};
pub use issuer::{IssuedToken, TokenIssuer};
pub use keys::{KeyError, KeyPair, KEYGEN_HINT};
pub use password::{hash_password, hash_password_secure, verify_password};
pub use revocation::DenyList;
pub use token::{TokenError, DEFAULT_TOKEN_LIFETIME, TOKEN_ALGORITHM};
pub use verifier::TokenVerifier;

// ============================
// authgate-backend-lib/src/auth/keys.rs
// ============================
//! RSA key pair used to sign and verify tokens.
//!
//! Keys are provisioned outside this process and read once at startup. Both
//! files must be PEM: the private key as PKCS#1 or PKCS#8, the public key as
//! SubjectPublicKeyInfo or PKCS#1.
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header};
use thiserror::Error;

use super::claims::Claims;
use super::token::{token_validation, TOKEN_ALGORITHM};

/// Shell commands that provision a key pair where the defaults expect it
pub const KEYGEN_HINT: [&str; 2] = [
    "openssl genrsa -out jwt_priv.pem 2048",
    "openssl rsa -in jwt_priv.pem -pubout -out jwt_pub.pem",
];

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{role} key is not a valid RSA PEM key: {source}")]
    Parse {
        role: &'static str,
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    #[error("public key does not verify signatures made with the private key")]
    Mismatch,
}

/// Signing key for the issuer and its matching verification key
pub struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    /// Read both PEM files and check that they belong together
    pub fn load(private_key_path: &Path, public_key_path: &Path) -> Result<Self, KeyError> {
        let private_pem = read_pem(private_key_path)?;
        let public_pem = read_pem(public_key_path)?;
        Self::from_pem(&private_pem, &public_pem)
    }

    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, KeyError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(|source| KeyError::Parse {
            role: "private",
            source,
        })?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(|source| KeyError::Parse {
            role: "public",
            source,
        })?;

        let pair = Self { encoding, decoding };
        pair.check_match()?;
        Ok(pair)
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }

    /// Sign a throwaway token and verify it with the public half.
    fn check_match(&self) -> Result<(), KeyError> {
        let probe = Claims {
            username: "key-probe".to_string(),
            exp: 0,
            jti: "key-probe".to_string(),
        };
        let token = encode(&Header::new(TOKEN_ALGORITHM), &probe, &self.encoding)
            .map_err(|source| KeyError::Parse {
                role: "private",
                source,
            })?;

        decode::<Claims>(&token, &self.decoding, &token_validation())
            .map(|_| ())
            .map_err(|_| KeyError::Mismatch)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &TOKEN_ALGORITHM)
            .finish_non_exhaustive()
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, KeyError> {
    fs::read(path).map_err(|source| KeyError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkeys::{OTHER_PUBLIC_PEM, PRIVATE_PEM, PUBLIC_PEM};
    use tempfile::tempdir;

    #[test]
    fn test_load_from_files() {
        let dir = tempdir().unwrap();
        let private_path = dir.path().join("jwt_priv.pem");
        let public_path = dir.path().join("jwt_pub.pem");
        fs::write(&private_path, PRIVATE_PEM).unwrap();
        fs::write(&public_path, PUBLIC_PEM).unwrap();

        assert!(KeyPair::load(&private_path, &public_path).is_ok());
    }

    #[test]
    fn test_missing_file_is_reported_with_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.pem");

        let err = KeyPair::load(&missing, &missing).unwrap_err();
        match err {
            KeyError::Read { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_garbage_pem_is_rejected() {
        let err = KeyPair::from_pem(b"not a key", PUBLIC_PEM.as_bytes()).unwrap_err();
        assert!(matches!(err, KeyError::Parse { role: "private", .. }));

        let err = KeyPair::from_pem(PRIVATE_PEM.as_bytes(), b"not a key").unwrap_err();
        assert!(matches!(err, KeyError::Parse { role: "public", .. }));
    }

    #[test]
    fn test_mismatched_halves_are_rejected() {
        let err =
            KeyPair::from_pem(PRIVATE_PEM.as_bytes(), OTHER_PUBLIC_PEM.as_bytes()).unwrap_err();
        assert!(matches!(err, KeyError::Mismatch));
    }
}

//! Channel credential parsing and vendor token signing.
//!
//! A channel's API key is the pair `accessKey|secretKey`; every upstream call
//! carries a short-lived JWT minted from it. Tokens are minted per request
//! and never cached; the validity window is generous relative to request
//! latency.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::util::unix_now_secs;

/// Signed tokens are valid for 30 minutes.
const TOKEN_TTL_SECS: u64 = 1800;
/// Tokens become valid 5 seconds in the past to absorb clock skew.
const TOKEN_NOT_BEFORE_SKEW_SECS: u64 = 5;

/// A parsed channel credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub access_key: String,
    pub secret_key: String,
}

impl KeyPair {
    /// Split a channel API key into its access/secret halves.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Auth` unless the key has exactly two
    /// `|`-separated parts.
    pub fn parse(api_key: &str) -> Result<Self, RelayError> {
        match api_key.split_once('|') {
            Some((access_key, secret_key)) if !secret_key.contains('|') => Ok(Self {
                access_key: access_key.to_string(),
                secret_key: secret_key.to_string(),
            }),
            _ => Err(RelayError::Auth(
                "channel API key must have the form accessKey|secretKey".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    iss: String,
    exp: u64,
    nbf: u64,
}

/// Mint a signed request token for a channel key pair.
///
/// Claims: issuer is the access key, expiry is 30 minutes out, not-before is
/// 5 seconds in the past. Signed HS256 with the secret key.
///
/// # Errors
///
/// Returns `RelayError::Auth` when the secret key is empty or signing fails.
pub fn sign_token(keys: &KeyPair) -> Result<String, RelayError> {
    if keys.secret_key.is_empty() {
        return Err(RelayError::Auth("channel secret key is empty".to_string()));
    }
    let now = unix_now_secs();
    let claims = TokenClaims {
        iss: keys.access_key.clone(),
        exp: now + TOKEN_TTL_SECS,
        nbf: now.saturating_sub(TOKEN_NOT_BEFORE_SKEW_SECS),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(keys.secret_key.as_bytes()),
    )
    .map_err(|e| RelayError::Auth(format!("failed to sign request token: {e}")))
}

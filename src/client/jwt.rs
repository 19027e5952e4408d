//! Access-token claim decoding.
//!
//! The booking API issues JWT access tokens. The client never verifies them
//! (that is the server's job); it only peeks at the payload so a session
//! restored from storage can drop a token that has already expired.

use crate::ClientError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Expiration timestamp (seconds since the epoch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,

    /// Issued-at timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,

    /// Server-side user id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,

    /// Token type, "access" for API tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Token identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl AccessTokenClaims {
    /// True when `exp` is present and not after `now` (seconds).
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.exp.is_some_and(|exp| now >= exp)
    }

    /// True when the token has expired as of the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp())
    }
}

/// Decodes the payload of a JWT access token without verifying it.
///
/// # Errors
///
/// Returns [`ClientError::InvalidToken`] if the token is not three
/// dot-separated parts, or the payload is not base64url-encoded JSON.
pub fn decode_access_token(token: &str) -> Result<AccessTokenClaims, ClientError> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(ClientError::InvalidToken(format!(
            "expected 3 parts, got {}",
            parts.len()
        )));
    }

    let decoded_bytes = URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| ClientError::InvalidToken(format!("payload is not base64url: {}", e)))?;

    serde_json::from_slice(&decoded_bytes)
        .map_err(|e| ClientError::InvalidToken(format!("payload is not valid claims: {}", e)))
}

/// Returns true only for a decodable token whose `exp` has passed.
///
/// Opaque (non-JWT) tokens are never considered expired.
pub fn token_is_expired(token: &str) -> bool {
    match decode_access_token(token) {
        Ok(claims) => claims.is_expired(),
        Err(e) => {
            tracing::trace!("Token is not a decodable JWT ({}), keeping it", e);
            false
        }
    }
}

/// Returns current Unix timestamp in seconds.
pub(crate) fn current_timestamp() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Date::now() / 1000.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

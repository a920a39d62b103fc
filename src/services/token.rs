/*
 * Responsibility
 * - read the claims out of a compact JWS (header.payload.signature) for inspection
 *
 * Notes
 * - NO signature / exp / iss / aud checks happen here. Use only on tokens
 *   that were already verified, or for debugging.
 */
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};

use crate::error::AuthorityError;

pub const MAX_TOKEN_SIZE_BYTES: usize = 8 * 1024;

/// Decode the payload segment of a compact JWS into a claims map.
pub fn decode_payload(token: &str) -> Result<Map<String, Value>, AuthorityError> {
    let token = token.trim();
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        tracing::debug!(
            token_size = token.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "token rejected: size exceeds maximum"
        );
        return Err(AuthorityError::MalformedToken("token too large"));
    }

    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthorityError::MalformedToken("expected three dot-separated parts"));
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload).map_err(|e| {
        tracing::debug!(error = %e, "failed to decode token payload base64");
        AuthorityError::MalformedToken("payload is not base64url")
    })?;

    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(claims) => Ok(claims),
        other => Err(AuthorityError::not_an_object(&other)),
    }
}

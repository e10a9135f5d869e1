//! Local decoding of the session token's expiry claim.
//!
//! The signature is not verified; the backend does that on every request.
//! The client only needs `exp` to know when to stop using the token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::{BuddyError, Result};

#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

/// Read the `exp` claim (epoch seconds) from a JWT.
///
/// # Errors
///
/// Returns `BuddyError::Token` if the token is not three dot-separated
/// segments, the payload is not base64url JSON, or it has no numeric `exp`.
pub fn decode_expiry(token: &str) -> Result<i64> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(BuddyError::Token("expected three segments".into())),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| BuddyError::Token(format!("payload is not base64url: {e}")))?;
    let claims: Claims = serde_json::from_slice(&bytes)
        .map_err(|e| BuddyError::Token(format!("payload has no usable exp claim: {e}")))?;
    Ok(claims.exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }

    #[test]
    fn test_decode_expiry_reads_exp() {
        let token = token_with(r#"{"sub":"ana@example.com","exp":1234567890}"#);
        assert_eq!(decode_expiry(&token).unwrap(), 1234567890);
    }

    #[test]
    fn test_decode_expiry_tolerates_padding() {
        let header = URL_SAFE_NO_PAD.encode("{}");
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":42}"#);
        let token = format!("{header}.{payload}.sig");
        assert_eq!(decode_expiry(&token).unwrap(), 42);
    }

    #[test]
    fn test_decode_expiry_rejects_bad_tokens() {
        assert!(matches!(decode_expiry("opaque"), Err(BuddyError::Token(_))));
        assert!(matches!(decode_expiry("a.b.c.d"), Err(BuddyError::Token(_))));
        assert!(matches!(decode_expiry("a.!!!.c"), Err(BuddyError::Token(_))));
        let no_exp = token_with(r#"{"sub":"x"}"#);
        assert!(matches!(decode_expiry(&no_exp), Err(BuddyError::Token(_))));
    }
}

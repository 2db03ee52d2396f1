//! Signing and verifying the JSON web tokens that authenticate API requests.

use std::fmt::Debug;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::Error;

/// The contents of a JSON web token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The email of the user the token was issued to.
    pub sub: String,
    /// When the token was issued, as a Unix timestamp.
    pub iat: i64,
    /// When the token expires, as a Unix timestamp.
    pub exp: i64,
}

/// The keys for signing and verifying tokens, derived from a shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    /// Derive the HMAC keys from `secret`.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Create a signed token for `email` that expires `duration` after `now`.
///
/// # Errors
///
/// Returns [Error::TokenCreation] if the token could not be signed.
pub fn create_token(
    email: &str,
    now: OffsetDateTime,
    duration: Duration,
    keys: &JwtKeys,
) -> Result<String, Error> {
    let claims = Claims {
        sub: email.to_owned(),
        iat: now.unix_timestamp(),
        exp: (now + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, &keys.encoding_key).map_err(|error| {
        tracing::error!("could not sign token: {error}");
        Error::TokenCreation(error.to_string())
    })
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
///
/// Returns [Error::Unauthorized] if the token is malformed, has a bad
/// signature, is missing the subject or has expired.
pub fn decode_token(token: &str, keys: &JwtKeys) -> Result<Claims, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &keys.decoding_key, &validation)
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::debug!("rejected bearer token: {error}");
            Error::Unauthorized
        })
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime};

    use crate::Error;

    use super::{JwtKeys, create_token, decode_token};

    #[test]
    fn decode_gives_back_email() {
        let keys = JwtKeys::from_secret("foobar");
        let now = OffsetDateTime::now_utc();

        let token = create_token("averyemail@email.com", now, Duration::minutes(30), &keys)
            .unwrap();
        let claims = decode_token(&token, &keys).unwrap();

        assert_eq!(claims.sub, "averyemail@email.com");
        assert_eq!(claims.iat, now.unix_timestamp());
        assert_eq!(claims.exp, now.unix_timestamp() + 30 * 60);
    }

    #[test]
    fn rejects_expired_token() {
        let keys = JwtKeys::from_secret("foobar");

        let token = create_token(
            "averyemail@email.com",
            OffsetDateTime::now_utc(),
            Duration::minutes(-5),
            &keys,
        )
        .unwrap();

        assert_eq!(decode_token(&token, &keys), Err(Error::Unauthorized));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let keys = JwtKeys::from_secret("foobar");
        let other_keys = JwtKeys::from_secret("not foobar");

        let token = create_token(
            "averyemail@email.com",
            OffsetDateTime::now_utc(),
            Duration::minutes(30),
            &other_keys,
        )
        .unwrap();

        assert_eq!(decode_token(&token, &keys), Err(Error::Unauthorized));
    }

    #[test]
    fn rejects_garbage() {
        let keys = JwtKeys::from_secret("foobar");

        assert_eq!(decode_token("not.a.token", &keys), Err(Error::Unauthorized));
    }

    #[test]
    fn debug_hides_keys() {
        let keys = JwtKeys::from_secret("foobar");

        let debug = format!("{keys:?}");

        assert!(!debug.contains("foobar"));
        assert!(debug.contains("REDACTED"));
    }
}

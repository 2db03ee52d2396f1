//! The extractor that resolves the bearer token on a request to a user.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{
    Error, User,
    auth::{AuthState, decode_token},
    db::lock_connection,
    user::get_user_by_email,
};

/// The user that sent the request, identified by the bearer token.
///
/// Rejects the request with [Error::Unauthorized] if the header is missing
/// or malformed, the token does not verify, or the token's user no longer
/// exists.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::Unauthorized)?;

        let state = AuthState::from_ref(state);
        let claims = decode_token(bearer.token(), &state.jwt_keys)?;

        let connection = lock_connection(&state.db_connection)?;
        match get_user_by_email(&claims.sub, &connection) {
            Ok(user) => Ok(CurrentUser(user)),
            Err(Error::NotFound) => {
                tracing::debug!("token subject {} is not a registered user", claims.sub);
                Err(Error::Unauthorized)
            }
            Err(error) => Err(error),
        }
    }
}

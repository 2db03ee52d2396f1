//! The token endpoint that exchanges an email and password for a bearer token.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::{AuthState, create_token},
    db::lock_connection,
    user::get_user_by_email,
};

/// The form data for a log-in request.
///
/// `username` holds the user's email to match the OAuth2 password flow.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInForm {
    /// The email the user signed up with.
    pub username: String,
    /// The user's plaintext password.
    pub password: String,
}

/// The response body of a successful log-in.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always "bearer".
    pub token_type: String,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// Returns [Error::Unauthorized] if the email does not belong to a registered
/// user or the password is wrong. The two cases are indistinguishable to the
/// client.
pub async fn log_in_endpoint(
    State(state): State<AuthState>,
    Form(form): Form<LogInForm>,
) -> Result<Json<TokenResponse>, Error> {
    let user = {
        let connection = lock_connection(&state.db_connection)?;
        match get_user_by_email(&form.username, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::debug!("log-in attempt for unknown email");
                return Err(Error::Unauthorized);
            }
            Err(error) => return Err(error),
        }
    };

    let is_password_correct = user.password_hash.verify(&form.password).map_err(|error| {
        tracing::error!("Error verifying password: {error}");
        Error::HashingError(error.to_string())
    })?;

    if !is_password_correct {
        tracing::debug!("wrong password for user {}", user.id);
        return Err(Error::Unauthorized);
    }

    let access_token = create_token(
        &user.email,
        OffsetDateTime::now_utc(),
        state.token_duration,
        &state.jwt_keys,
    )?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_owned(),
    }))
}

//! Bearer token authentication.
//!
//! Clients exchange an email and password for a signed token at the token
//! endpoint and send it back in the `Authorization: Bearer <token>` header.
//! Handlers that need the caller take a [CurrentUser] argument.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use time::Duration;

use crate::{AppState, PasswordHash};

mod current_user;
mod log_in;
mod token;

pub use current_user::CurrentUser;
pub use log_in::log_in_endpoint;
pub use token::{JwtKeys, create_token, decode_token};

/// How long new tokens last by default.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::minutes(30);

/// Settings for token lifetime and password hashing.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long a token is valid for after it is issued.
    pub token_duration: Duration,
    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_duration: DEFAULT_TOKEN_DURATION,
            password_cost: PasswordHash::DEFAULT_COST,
        }
    }
}

/// The state needed to issue and check tokens.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The keys for signing and verifying tokens.
    pub jwt_keys: JwtKeys,
    /// How long issued tokens last.
    pub token_duration: Duration,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            jwt_keys: state.jwt_keys.clone(),
            token_duration: state.auth_config.token_duration,
        }
    }
}

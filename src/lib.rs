//! Expense Tracker is a REST API for tracking personal finances.
//!
//! Users own bank accounts, credit cards, expense categories and expenses.
//! Every resource is scoped to the user identified by the bearer token sent
//! with the request, and expenses can be rolled up into a summary report.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::{StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod card;
mod category;
mod database_id;
mod db;
pub mod endpoints;
mod expense;
mod logging;
mod money;
mod pagination;
mod password;
mod routing;
mod user;

#[cfg(test)]
mod test_utils;

pub use account::{NewAccount, create_account};
pub use app_state::AppState;
pub use auth::AuthConfig;
pub use card::{NewCard, create_card};
pub use category::{NewCategory, create_category};
pub use db::initialize as initialize_db;
pub use expense::{NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::Money;
pub use pagination::PaginationConfig;
pub use password::PasswordHash;
pub use routing::build_router;
pub use user::{NewUser, User, UserId, create_user};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The bearer token or log-in credentials could not be validated.
    ///
    /// This covers missing, malformed, expired and forged tokens, tokens
    /// for users that no longer exist, and wrong email/password pairs. The
    /// client is never told which of these happened.
    #[error("could not validate credentials")]
    Unauthorized,

    /// The authenticated user tried to modify another user's profile.
    #[error("not allowed to modify another user")]
    Forbidden,

    /// The requested resource was not found.
    ///
    /// Resources owned by another user are reported as not found as well so
    /// that clients cannot probe for IDs that belong to someone else.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The email address is already registered to another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An expense referred to an account, card or category that does not
    /// exist or belongs to another user.
    ///
    /// The string names the kind of resource, e.g. "category".
    #[error("the {0} ID does not refer to one of your {0}s")]
    InvalidReference(&'static str),

    /// A card closing day or due day outside of 1 to 31.
    #[error("{0} is not a valid day of the month")]
    InvalidDay(u8),

    /// A monetary amount too large to be stored with two decimal places.
    #[error("{0} is outside the supported range for amounts")]
    AmountOutOfRange(Decimal),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A JSON web token could not be signed.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(WWW_AUTHENTICATE, "Bearer")],
                    Json(json!({ "error": self.to_string() })),
                )
                    .into_response();
            }
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::InvalidReference(_) | Error::InvalidDay(_) | Error::AmountOutOfRange(_) => {
                StatusCode::BAD_REQUEST
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response();
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    auth::{AuthConfig, JwtKeys},
    db::initialize,
    pagination::PaginationConfig,
};

/// The state of the REST server.
///
/// This is built once at start up and handed to the router. Route handlers
/// take the narrower state structs defined next to them, which implement
/// `FromRef<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The keys for signing and verifying JSON web tokens.
    pub jwt_keys: JwtKeys,

    /// How long tokens live and how expensive password hashes are.
    pub auth_config: AuthConfig,

    /// The config that controls how lists of resources are paged.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `jwt_secret` is the shared secret used to sign and verify bearer tokens.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        jwt_secret: &str,
        auth_config: AuthConfig,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            jwt_keys: JwtKeys::from_secret(jwt_secret),
            auth_config,
            pagination_config,
        })
    }
}

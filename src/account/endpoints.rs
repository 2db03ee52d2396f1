//! The REST endpoints for managing bank accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{
        Account, AccountId, AccountUpdate, NewAccount,
        db::{create_account, delete_account, get_account, get_accounts, update_account},
    },
    auth::CurrentUser,
    db::lock_connection,
    pagination::{PageParams, PaginationConfig},
};

/// The state needed by the account endpoints.
#[derive(Debug, Clone)]
pub struct AccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The page size limits for listing accounts.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for creating a new account.
pub async fn create_account_endpoint(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
    Json(new_account): Json<NewAccount>,
) -> Result<(StatusCode, Json<Account>), Error> {
    let account = create_account(
        user.id,
        new_account,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// A route handler for listing the caller's accounts.
pub async fn get_accounts_endpoint(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<Account>>, Error> {
    let page = params.resolve(&state.pagination_config);
    let accounts = get_accounts(user.id, page, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(accounts))
}

/// A route handler for getting one of the caller's accounts.
pub async fn get_account_endpoint(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Account>, Error> {
    let account = get_account(
        account_id,
        user.id,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok(Json(account))
}

/// A route handler for partially updating one of the caller's accounts.
pub async fn update_account_endpoint(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
    Path(account_id): Path<AccountId>,
    Json(update): Json<AccountUpdate>,
) -> Result<Json<Account>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let account = update.apply(get_account(account_id, user.id, &connection)?);
    update_account(&account, &connection)?;

    Ok(Json(account))
}

/// A route handler for deleting one of the caller's accounts.
pub async fn delete_account_endpoint(
    State(state): State<AccountState>,
    CurrentUser(user): CurrentUser,
    Path(account_id): Path<AccountId>,
) -> Result<StatusCode, Error> {
    delete_account(
        account_id,
        user.id,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok(StatusCode::NO_CONTENT)
}

//! The user sign-up and profile endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash,
    auth::CurrentUser,
    db::lock_connection,
    pagination::{PageParams, PaginationConfig},
    user::{
        NewUser, User, UserId, UserUpdate,
        db::{create_user, delete_user, get_user_by_id, get_users, update_user},
    },
};

/// The state needed by the user endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost for new password hashes.
    pub password_cost: u32,
    /// The page size limits for listing users.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            password_cost: state.auth_config.password_cost,
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The sign-up request body.
#[derive(Deserialize)]
pub struct SignUpForm {
    /// The user's display name.
    pub name: String,
    /// The email to log in with.
    pub email: String,
    /// The plaintext password, hashed before it is stored.
    pub password: String,
}

/// Sign up a new user.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the email is already registered.
pub async fn create_user_endpoint(
    State(state): State<UserState>,
    Json(form): Json<SignUpForm>,
) -> Result<(StatusCode, Json<User>), Error> {
    let password_hash = PasswordHash::from_raw_password(&form.password, state.password_cost)?;

    let user = create_user(
        NewUser {
            name: form.name,
            email: form.email,
            password_hash,
        },
        &*lock_connection(&state.db_connection)?,
    )?;

    tracing::info!("registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

/// List the public profiles of all users.
pub async fn get_users_endpoint(
    State(state): State<UserState>,
    _: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<User>>, Error> {
    let page = params.resolve(&state.pagination_config);
    let users = get_users(page, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(users))
}

/// Get the profile of the user that sent the request.
pub async fn get_current_user_endpoint(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Get the public profile of any user.
pub async fn get_user_endpoint(
    State(state): State<UserState>,
    _: CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, Error> {
    let user = get_user_by_id(
        UserId::new(user_id),
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok(Json(user))
}

/// Update the caller's own profile.
///
/// # Errors
///
/// Returns [Error::Forbidden] if `user_id` is not the caller's ID, or
/// [Error::DuplicateEmail] if the new email belongs to someone else.
pub async fn update_user_endpoint(
    State(state): State<UserState>,
    CurrentUser(current_user): CurrentUser,
    Path(user_id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>, Error> {
    if current_user.id != UserId::new(user_id) {
        return Err(Error::Forbidden);
    }

    let update = update.hash_password(state.password_cost)?;

    let connection = lock_connection(&state.db_connection)?;
    let user = update.apply(get_user_by_id(current_user.id, &connection)?);
    update_user(&user, &connection)?;

    Ok(Json(user))
}

/// Delete the caller's account along with everything it owns.
///
/// # Errors
///
/// Returns [Error::Forbidden] if `user_id` is not the caller's ID.
pub async fn delete_user_endpoint(
    State(state): State<UserState>,
    CurrentUser(current_user): CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, Error> {
    if current_user.id != UserId::new(user_id) {
        return Err(Error::Forbidden);
    }

    delete_user(current_user.id, &*lock_connection(&state.db_connection)?)?;
    tracing::info!("deleted user {}", current_user.id);

    Ok(StatusCode::NO_CONTENT)
}

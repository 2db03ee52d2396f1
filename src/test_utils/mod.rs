#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, AuthConfig, PaginationConfig, PasswordHash, User, build_router,
    endpoints,
    user::{NewUser, create_user},
};

/// The cheapest cost bcrypt accepts, to keep tests fast.
pub(crate) const TEST_PASSWORD_COST: u32 = 4;

pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(
        connection,
        "foobar",
        AuthConfig {
            password_cost: TEST_PASSWORD_COST,
            ..Default::default()
        },
        PaginationConfig::default(),
    )
    .expect("Could not create app state.")
}

/// Insert a user directly into the database of `state`.
#[track_caller]
pub(crate) fn insert_test_user(state: &AppState, email: &str, password: &str) -> User {
    let password_hash = PasswordHash::from_raw_password(password, TEST_PASSWORD_COST)
        .expect("Could not hash password.");

    create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: email.to_owned(),
            password_hash,
        },
        &state.db_connection.lock().unwrap(),
    )
    .expect("Could not create test user.")
}

/// A test server running the full application router.
pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state))
}

/// Sign up through the API, log in and return the new user's profile and bearer token.
pub(crate) async fn sign_up_and_log_in(server: &TestServer, email: &str) -> (Value, String) {
    let password = "averysafeandsecurepassword";

    let response = server
        .post(endpoints::USERS)
        .json(&json!({ "name": "Test User", "email": email, "password": password }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let user = response.json::<Value>();

    let token = server
        .post(endpoints::TOKEN)
        .form(&[("username", email), ("password", password)])
        .await
        .json::<Value>()["access_token"]
        .as_str()
        .expect("Log-in response did not contain a token.")
        .to_owned();

    (user, token)
}

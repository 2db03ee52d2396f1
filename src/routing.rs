//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, get_account_endpoint,
        get_accounts_endpoint, update_account_endpoint,
    },
    auth::log_in_endpoint,
    card::{
        create_card_endpoint, delete_card_endpoint, get_card_endpoint, get_cards_endpoint,
        update_card_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        get_category_endpoint, update_category_endpoint,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
        get_expense_summary_endpoint, get_expenses_endpoint, update_expense_endpoint,
    },
    logging_middleware,
    user::{
        create_user_endpoint, delete_user_endpoint, get_current_user_endpoint, get_user_endpoint,
        get_users_endpoint, update_user_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Sign-up, log-in and the informational routes are open. Every other route
/// takes a [crate::auth::CurrentUser] and so rejects requests without a valid
/// bearer token.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::COFFEE, get(get_coffee))
        .route(
            endpoints::USERS,
            post(create_user_endpoint).get(get_users_endpoint),
        )
        .route(endpoints::TOKEN, post(log_in_endpoint))
        .route(endpoints::CURRENT_USER, get(get_current_user_endpoint))
        .route(
            endpoints::USER,
            get(get_user_endpoint)
                .put(update_user_endpoint)
                .delete(delete_user_endpoint),
        )
        .route(
            endpoints::ACCOUNTS,
            post(create_account_endpoint).get(get_accounts_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .put(update_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .route(
            endpoints::CARDS,
            post(create_card_endpoint).get(get_cards_endpoint),
        )
        .route(
            endpoints::CARD,
            get(get_card_endpoint)
                .put(update_card_endpoint)
                .delete(delete_card_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            post(create_category_endpoint).get(get_categories_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            post(create_expense_endpoint).get(get_expenses_endpoint),
        )
        .route(
            endpoints::EXPENSE_SUMMARY,
            get(get_expense_summary_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The root path '/' greets the client.
async fn get_root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Expense Tracker API" }))
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (
        StatusCode::IM_A_TEAPOT,
        Json(json!({ "message": "I'm a teapot" })),
    )
        .into_response()
}

async fn get_404_not_found() -> Response {
    crate::Error::NotFound.into_response()
}

//! The REST endpoints for managing expense categories.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::CurrentUser,
    category::{
        Category, CategoryId, CategoryUpdate, NewCategory,
        db::{create_category, delete_category, get_categories, get_category, update_category},
    },
    db::lock_connection,
    pagination::{PageParams, PaginationConfig},
};

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The page size limits for listing categories.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for creating a new category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    CurrentUser(user): CurrentUser,
    Json(new_category): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let category = create_category(
        user.id,
        new_category,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// A route handler for listing the caller's categories.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<Category>>, Error> {
    let page = params.resolve(&state.pagination_config);
    let categories = get_categories(user.id, page, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(categories))
}

/// A route handler for getting one of the caller's categories.
pub async fn get_category_endpoint(
    State(state): State<CategoryState>,
    CurrentUser(user): CurrentUser,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<Category>, Error> {
    let category = get_category(
        category_id,
        user.id,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok(Json(category))
}

/// A route handler for partially updating one of the caller's categories.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    CurrentUser(user): CurrentUser,
    Path(category_id): Path<CategoryId>,
    Json(update): Json<CategoryUpdate>,
) -> Result<Json<Category>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let category = update.apply(get_category(category_id, user.id, &connection)?);
    update_category(&category, &connection)?;

    Ok(Json(category))
}

/// A route handler for deleting one of the caller's categories.
///
/// Expenses filed under the category are deleted with it.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    CurrentUser(user): CurrentUser,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, Error> {
    delete_category(
        category_id,
        user.id,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_app_state, get_test_server, sign_up_and_log_in},
    };

    #[tokio::test]
    async fn create_list_and_update_category() {
        let server = get_test_server(get_test_app_state());
        let (_, token) = sign_up_and_log_in(&server, "alice@example.com").await;

        let response = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({ "category_name": "Food", "type": "Expense" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let category = response.json::<Value>();
        assert_eq!(category["type"], "Expense");

        server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .await
            .assert_json(&json!([category]));

        let updated = server
            .put(&format_endpoint(
                endpoints::CATEGORY,
                category["id"].as_i64().unwrap(),
            ))
            .authorization_bearer(&token)
            .json(&json!({ "category_name": "Groceries" }))
            .await
            .json::<Value>();
        assert_eq!(updated["category_name"], "Groceries");
        assert_eq!(updated["type"], "Expense");
    }

    #[tokio::test]
    async fn limit_is_clamped_to_max_page_size() {
        let mut state = get_test_app_state();
        state.pagination_config.max_limit = 2;
        let server = get_test_server(state);
        let (_, token) = sign_up_and_log_in(&server, "alice@example.com").await;
        for name in ["A", "B", "C"] {
            server
                .post(endpoints::CATEGORIES)
                .authorization_bearer(&token)
                .json(&json!({ "category_name": name, "type": "Expense" }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let categories = server
            .get(endpoints::CATEGORIES)
            .add_query_param("limit", 50)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Value>>();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0]["category_name"], "A");
    }

    #[tokio::test]
    async fn delete_missing_category_returns_not_found() {
        let server = get_test_server(get_test_app_state());
        let (_, token) = sign_up_and_log_in(&server, "alice@example.com").await;

        server
            .delete(&format_endpoint(endpoints::CATEGORY, 42))
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

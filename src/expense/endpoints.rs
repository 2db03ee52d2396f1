//! The REST endpoints for recording expenses.

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
    db::lock_connection,
    expense::{
        Expense, ExpenseId, ExpenseUpdate, NewExpense,
        db::{
            check_expense_links, create_expense, delete_expense, get_expense, get_expenses,
            update_expense,
        },
    },
    pagination::{PageParams, PaginationConfig},
};

/// The state needed by the expense endpoints.
#[derive(Debug, Clone)]
pub struct ExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The page size limits for listing expenses.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for recording a new expense.
///
/// # Errors
/// Returns [Error::InvalidReference] if the category, account or card is not
/// one of the caller's.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    CurrentUser(user): CurrentUser,
    Json(new_expense): Json<NewExpense>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let connection = lock_connection(&state.db_connection)?;
    check_expense_links(
        user.id,
        new_expense.account_id,
        new_expense.card_id,
        new_expense.category_id,
        &connection,
    )?;
    let expense = create_expense(user.id, new_expense, &connection)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// A route handler for listing the caller's expenses.
pub async fn get_expenses_endpoint(
    State(state): State<ExpenseState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<Expense>>, Error> {
    let page = params.resolve(&state.pagination_config);
    let expenses = get_expenses(user.id, page, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(expenses))
}

/// A route handler for getting one of the caller's expenses.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    CurrentUser(user): CurrentUser,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<Expense>, Error> {
    let expense = get_expense(
        expense_id,
        user.id,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok(Json(expense))
}

/// A route handler for partially updating one of the caller's expenses.
///
/// # Errors
/// Returns [Error::NotFound] if the expense is not one of the caller's, or
/// [Error::InvalidReference] if the updated links are not the caller's.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    CurrentUser(user): CurrentUser,
    Path(expense_id): Path<ExpenseId>,
    Json(update): Json<ExpenseUpdate>,
) -> Result<Json<Expense>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let expense = update.apply(get_expense(expense_id, user.id, &connection)?);
    check_expense_links(
        user.id,
        expense.account_id,
        expense.card_id,
        expense.category_id,
        &connection,
    )?;
    update_expense(&expense, &connection)?;

    Ok(Json(expense))
}

/// A route handler for deleting one of the caller's expenses.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    CurrentUser(user): CurrentUser,
    Path(expense_id): Path<ExpenseId>,
) -> Result<StatusCode, Error> {
    delete_expense(
        expense_id,
        user.id,
        &*lock_connection(&state.db_connection)?,
    )?;

    Ok(StatusCode::NO_CONTENT)
}

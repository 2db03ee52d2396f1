//! The expense summary report: totals, per-category subtotals and a detailed
//! list of the user's expenses in an optional date range.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use indexmap::IndexMap;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error, Money, UserId, auth::CurrentUser, db::lock_connection, expense::ExpenseId,
};

/// The inclusive date bounds for a summary. Either bound may be omitted.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct SummaryQuery {
    /// Only include expenses on or after this date.
    pub start_date: Option<Date>,
    /// Only include expenses on or before this date.
    pub end_date: Option<Date>,
}

/// One expense in a summary, with the names of the rows it links to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedExpense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How much was spent.
    pub amount: Money,
    /// When the money was spent.
    pub date: Date,
    /// Free text notes.
    pub description: Option<String>,
    /// The name of the expense's category.
    pub category: String,
    /// The name of the account the expense was paid from.
    pub account_name: Option<String>,
    /// The name of the card the expense was charged to.
    pub card_name: Option<String>,
}

/// A summary of a user's expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    /// The sum of all amounts, "0" when there are no expenses.
    pub total_amount: Decimal,
    /// The number of expenses.
    pub expense_count: usize,
    /// The subtotal for each category name, in the order the names first
    /// appear in `detailed_expenses`.
    pub category_summary: IndexMap<String, Decimal>,
    /// The expenses in ID order.
    pub detailed_expenses: Vec<DetailedExpense>,
}

/// Roll up `expenses` into totals and per-category subtotals.
pub fn summarize(expenses: Vec<DetailedExpense>) -> ExpenseSummary {
    let mut total_amount = Decimal::ZERO;
    let mut category_summary: IndexMap<String, Decimal> = IndexMap::new();

    for expense in &expenses {
        let amount = expense.amount.as_decimal();
        total_amount += amount;

        *category_summary
            .entry(expense.category.clone())
            .or_insert(Decimal::ZERO) += amount;
    }

    ExpenseSummary {
        total_amount,
        expense_count: expenses.len(),
        category_summary,
        detailed_expenses: expenses,
    }
}

/// Get the expenses of `user_id` in the date range of `query`, ordered by ID,
/// along with their category, account and card names.
pub fn get_detailed_expenses(
    user_id: UserId,
    query: SummaryQuery,
    connection: &Connection,
) -> Result<Vec<DetailedExpense>, Error> {
    connection
        .prepare(
            "SELECT expense.id, expense.amount, expense.date, expense.description,
                category.category_name, account.account_name, card.card_name
            FROM expense
            INNER JOIN category ON category.id = expense.category_id
            LEFT JOIN account ON account.id = expense.account_id
            LEFT JOIN card ON card.id = expense.card_id
            WHERE expense.user_id = ?1
                AND (?2 IS NULL OR expense.date >= ?2)
                AND (?3 IS NULL OR expense.date <= ?3)
            ORDER BY expense.id ASC",
        )?
        .query_map(
            params![user_id, query.start_date, query.end_date],
            map_row_to_detailed_expense,
        )?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

fn map_row_to_detailed_expense(row: &Row) -> Result<DetailedExpense, rusqlite::Error> {
    Ok(DetailedExpense {
        id: row.get(0)?,
        amount: row.get(1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        account_name: row.get(5)?,
        card_name: row.get(6)?,
    })
}

/// The state needed for the expense summary.
#[derive(Debug, Clone)]
pub struct ExpenseSummaryState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the summary of the caller's expenses.
pub async fn get_expense_summary_endpoint(
    State(state): State<ExpenseSummaryState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ExpenseSummary>, Error> {
    let expenses =
        get_detailed_expenses(user.id, query, &*lock_connection(&state.db_connection)?)?;

    Ok(Json(summarize(expenses)))
}


#[cfg(test)]
mod get_detailed_expenses_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Money, PasswordHash, UserId,
        account::{NewAccount, create_account},
        card::{NewCard, create_card},
        category::{NewCategory, create_category},
        db::initialize,
        expense::{NewExpense, create_expense},
        user::{NewUser, create_user},
    };

    use super::{SummaryQuery, get_detailed_expenses};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert_user(email: &str, connection: &Connection) -> UserId {
        create_user(
            NewUser {
                name: "Test User".to_owned(),
                email: email.to_owned(),
                password_hash: PasswordHash::new_unchecked("hunter2"),
            },
            connection,
        )
        .unwrap()
        .id
    }

    #[test]
    fn joins_names_and_filters_by_owner_and_date() {
        let connection = get_test_connection();
        let owner = insert_user("owner@bar.baz", &connection);
        let other = insert_user("other@bar.baz", &connection);
        let food = create_category(
            owner,
            NewCategory {
                category_name: "Food".to_owned(),
                category_type: "Expense".to_owned(),
            },
            &connection,
        )
        .unwrap();
        let other_food = create_category(
            other,
            NewCategory {
                category_name: "Food".to_owned(),
                category_type: "Expense".to_owned(),
            },
            &connection,
        )
        .unwrap();
        let account = create_account(
            owner,
            NewAccount {
                account_name: "Main".to_owned(),
                balance: Money::new(Decimal::from(100)).unwrap(),
                account_type: "Savings".to_owned(),
            },
            &connection,
        )
        .unwrap();
        let card = create_card(
            owner,
            NewCard {
                card_name: "Visa".to_owned(),
                limit: Money::new(Decimal::from(100)).unwrap(),
                closing_day: 1,
                due_day: 10,
            },
            &connection,
        )
        .unwrap();
        let amount = Money::new(Decimal::from(5)).unwrap();
        for (account_id, card_id, date) in [
            (Some(account.id), None, date!(2024 - 01 - 01)),
            (None, Some(card.id), date!(2024 - 01 - 15)),
            (None, None, date!(2024 - 02 - 01)),
        ] {
            create_expense(
                owner,
                NewExpense {
                    account_id,
                    card_id,
                    category_id: food.id,
                    amount,
                    date,
                    description: None,
                },
                &connection,
            )
            .unwrap();
        }
        create_expense(
            other,
            NewExpense {
                account_id: None,
                card_id: None,
                category_id: other_food.id,
                amount,
                date: date!(2024 - 01 - 10),
                description: None,
            },
            &connection,
        )
        .unwrap();

        let all = get_detailed_expenses(owner, SummaryQuery::default(), &connection).unwrap();
        let january = get_detailed_expenses(
            owner,
            SummaryQuery {
                start_date: Some(date!(2024 - 01 - 01)),
                end_date: Some(date!(2024 - 01 - 15)),
            },
            &connection,
        )
        .unwrap();
        let from_mid_january = get_detailed_expenses(
            owner,
            SummaryQuery {
                start_date: Some(date!(2024 - 01 - 02)),
                end_date: None,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(all[0].account_name.as_deref(), Some("Main"));
        assert_eq!(all[0].card_name, None);
        assert_eq!(all[1].card_name.as_deref(), Some("Visa"));
        assert_eq!(all[2].category, "Food");
        assert_eq!(january.len(), 2);
        assert_eq!(from_mid_january.len(), 2);
        assert_eq!(from_mid_january[0].date, date!(2024 - 01 - 15));
    }
}

//! Database operations for expenses.

use rusqlite::{Connection, Row, params};

use crate::{
    Error, UserId,
    account::{AccountId, get_account},
    card::{CardId, get_card},
    category::{CategoryId, get_category},
    expense::{Expense, ExpenseId, NewExpense},
    pagination::Page,
};

/// Create the expense table.
///
/// Deleting the user, account, card or category an expense refers to deletes
/// the expense too.
///
/// # Errors
/// Returns an error if the SQL query fails.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            account_id INTEGER REFERENCES account(id) ON DELETE CASCADE,
            card_id INTEGER REFERENCES card(id) ON DELETE CASCADE,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE CASCADE,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            description TEXT
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_id_date ON expense(user_id, date)",
        (),
    )?;

    Ok(())
}

/// Check that the account, card and category an expense links to are owned
/// by `user_id`.
///
/// # Errors
/// Returns [Error::InvalidReference] naming the first link that does not
/// refer to one of the user's rows.
pub fn check_expense_links(
    user_id: UserId,
    account_id: Option<AccountId>,
    card_id: Option<CardId>,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let as_invalid = |kind: &'static str| {
        move |error: Error| match error {
            Error::NotFound => Error::InvalidReference(kind),
            error => error,
        }
    };

    get_category(category_id, user_id, connection).map_err(as_invalid("category"))?;

    if let Some(account_id) = account_id {
        get_account(account_id, user_id, connection).map_err(as_invalid("account"))?;
    }

    if let Some(card_id) = card_id {
        get_card(card_id, user_id, connection).map_err(as_invalid("card"))?;
    }

    Ok(())
}

/// Insert an expense owned by `user_id`.
///
/// The caller is expected to have checked the links with [check_expense_links].
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn create_expense(
    user_id: UserId,
    new_expense: NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (user_id, account_id, card_id, category_id, amount, date, description)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            new_expense.account_id,
            new_expense.card_id,
            new_expense.category_id,
            new_expense.amount,
            new_expense.date,
            new_expense.description
        ],
    )?;

    Ok(Expense {
        id: connection.last_insert_rowid(),
        user_id,
        account_id: new_expense.account_id,
        card_id: new_expense.card_id,
        category_id: new_expense.category_id,
        amount: new_expense.amount,
        date: new_expense.date,
        description: new_expense.description,
    })
}

/// Get the expense `id` if it is owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist or belongs to another user.
pub fn get_expense(id: ExpenseId, user_id: UserId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, user_id, account_id, card_id, category_id, amount, date, description
            FROM expense WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row(params![id, user_id], map_row_to_expense)
        .map_err(Error::from)
}

/// Get one page of the expenses owned by `user_id`, ordered by ID.
pub fn get_expenses(
    user_id: UserId,
    page: Page,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, account_id, card_id, category_id, amount, date, description
            FROM expense WHERE user_id = ?1 ORDER BY id ASC LIMIT ?2 OFFSET ?3",
        )?
        .query_map(params![user_id, page.limit, page.offset], map_row_to_expense)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Overwrite the stored expense with the values in `expense`.
///
/// # Errors
/// Returns [Error::NotFound] if no expense with the ID is owned by `expense.user_id`.
pub fn update_expense(expense: &Expense, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET account_id = ?1, card_id = ?2, category_id = ?3, amount = ?4,
            date = ?5, description = ?6
        WHERE id = ?7 AND user_id = ?8",
        params![
            expense.account_id,
            expense.card_id,
            expense.category_id,
            expense.amount,
            expense.date,
            expense.description,
            expense.id,
            expense.user_id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the expense `id` owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the expense does not exist or belongs to another user.
pub fn delete_expense(id: ExpenseId, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        account_id: row.get(2)?,
        card_id: row.get(3)?,
        category_id: row.get(4)?,
        amount: row.get(5)?,
        date: row.get(6)?,
        description: row.get(7)?,
    })
}

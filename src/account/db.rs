//! Database operations for accounts.

use rusqlite::{Connection, Row, params};

use crate::{
    Error, UserId,
    account::{Account, AccountId, NewAccount},
    pagination::Page,
};

/// Create the account table.
///
/// # Errors
/// Returns an error if the SQL query fails.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            account_name TEXT NOT NULL,
            balance TEXT NOT NULL,
            account_type TEXT NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_account_user_id ON account(user_id)",
        (),
    )?;

    Ok(())
}

/// Insert an account owned by `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn create_account(
    user_id: UserId,
    new_account: NewAccount,
    connection: &Connection,
) -> Result<Account, Error> {
    connection.execute(
        "INSERT INTO account (user_id, account_name, balance, account_type) VALUES (?1, ?2, ?3, ?4)",
        params![
            user_id,
            new_account.account_name,
            new_account.balance,
            new_account.account_type
        ],
    )?;

    Ok(Account {
        id: connection.last_insert_rowid(),
        user_id,
        account_name: new_account.account_name,
        balance: new_account.balance,
        account_type: new_account.account_type,
    })
}

/// Get the account `id` if it is owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to another user.
pub fn get_account(id: AccountId, user_id: UserId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(
            "SELECT id, user_id, account_name, balance, account_type FROM account
            WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row(params![id, user_id], map_row_to_account)
        .map_err(Error::from)
}

/// Get one page of the accounts owned by `user_id`, ordered by ID.
pub fn get_accounts(
    user_id: UserId,
    page: Page,
    connection: &Connection,
) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, account_name, balance, account_type FROM account
            WHERE user_id = ?1 ORDER BY id ASC LIMIT ?2 OFFSET ?3",
        )?
        .query_map(params![user_id, page.limit, page.offset], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Overwrite the stored account with the values in `account`.
///
/// # Errors
/// Returns [Error::NotFound] if no account with the ID is owned by `account.user_id`.
pub fn update_account(account: &Account, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET account_name = ?1, balance = ?2, account_type = ?3
        WHERE id = ?4 AND user_id = ?5",
        params![
            account.account_name,
            account.balance,
            account.account_type,
            account.id,
            account.user_id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the account `id` owned by `user_id`, and any expenses paid from it.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist or belongs to another user.
pub fn delete_account(id: AccountId, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        user_id: row.get(1)?,
        account_name: row.get(2)?,
        balance: row.get(3)?,
        account_type: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::{
        Error, Money, PasswordHash, UserId,
        account::NewAccount,
        db::initialize,
        pagination::Page,
        user::{NewUser, create_user},
    };

    use super::{create_account, delete_account, get_account, get_accounts, update_account};

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

    fn new_account(name: &str, balance: &str) -> NewAccount {
        NewAccount {
            account_name: name.to_owned(),
            balance: Money::new(Decimal::from_str(balance).unwrap()).unwrap(),
            account_type: "Savings".to_owned(),
        }
    }

    #[test]
    fn create_and_get_account() {
        let connection = get_test_connection();
        let user_id = insert_user("foo@bar.baz", &connection);

        let account = create_account(user_id, new_account("Main", "100"), &connection).unwrap();
        let got = get_account(account.id, user_id, &connection).unwrap();

        assert_eq!(got, account);
        assert_eq!(got.balance.to_string(), "100.00");
    }

    #[test]
    fn get_account_of_other_user_returns_not_found() {
        let connection = get_test_connection();
        let owner = insert_user("owner@bar.baz", &connection);
        let other = insert_user("other@bar.baz", &connection);
        let account = create_account(owner, new_account("Main", "1"), &connection).unwrap();

        assert_eq!(
            get_account(account.id, other, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_accounts_only_lists_own_accounts_in_id_order() {
        let connection = get_test_connection();
        let owner = insert_user("owner@bar.baz", &connection);
        let other = insert_user("other@bar.baz", &connection);
        let first = create_account(owner, new_account("A", "1"), &connection).unwrap();
        create_account(other, new_account("B", "2"), &connection).unwrap();
        let third = create_account(owner, new_account("C", "3"), &connection).unwrap();

        let accounts = get_accounts(
            owner,
            Page {
                offset: 0,
                limit: 100,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(accounts, vec![first, third]);
    }

    #[test]
    fn get_accounts_respects_page() {
        let connection = get_test_connection();
        let owner = insert_user("owner@bar.baz", &connection);
        let accounts: Vec<_> = (0..5)
            .map(|i| {
                create_account(owner, new_account(&format!("A{i}"), "1"), &connection).unwrap()
            })
            .collect();

        let page = get_accounts(
            owner,
            Page {
                offset: 2,
                limit: 2,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(page, accounts[2..4].to_vec());
    }

    #[test]
    fn update_account_of_other_user_returns_not_found() {
        let connection = get_test_connection();
        let owner = insert_user("owner@bar.baz", &connection);
        let other = insert_user("other@bar.baz", &connection);
        let mut account = create_account(owner, new_account("Main", "1"), &connection).unwrap();
        account.user_id = other;

        assert_eq!(update_account(&account, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_account_removes_row() {
        let connection = get_test_connection();
        let owner = insert_user("owner@bar.baz", &connection);
        let account = create_account(owner, new_account("Main", "1"), &connection).unwrap();

        delete_account(account.id, owner, &connection).unwrap();

        assert_eq!(
            get_account(account.id, owner, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(
            delete_account(account.id, owner, &connection),
            Err(Error::NotFound)
        );
    }
}

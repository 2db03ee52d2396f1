//! Database operations for users.

use rusqlite::{Connection, Row, params};
use time::OffsetDateTime;

use crate::{
    Error, PasswordHash,
    pagination::Page,
    user::{NewUser, User, UserId},
};

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// The creation time is truncated to whole seconds.
///
/// # Errors
///
/// Returns a [Error::DuplicateEmail] if the email is already registered, or
/// [Error::SqlError] if another SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let now = OffsetDateTime::now_utc();
    let created_at = now.replace_nanosecond(0).unwrap_or(now);

    connection.execute(
        "INSERT INTO user (name, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            new_user.name,
            new_user.email,
            new_user.password_hash.as_ref(),
            created_at
        ],
    )?;

    let id = UserId::new(connection.last_insert_rowid());

    Ok(User {
        id,
        name: new_user.name,
        email: new_user.email,
        password_hash: new_user.password_hash,
        created_at,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id)], map_row)
        .map_err(|error| error.into())
}

/// Get the user that logs in with `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has the email.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE email = :email")?
        .query_row(&[(":email", &email)], map_row)
        .map_err(|error| error.into())
}

/// Get one page of all users, ordered by ID.
pub fn get_users(page: Page, connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare(
            "SELECT id, name, email, password, created_at FROM user
            ORDER BY id ASC LIMIT ?1 OFFSET ?2",
        )?
        .query_map(params![page.limit, page.offset], map_row)?
        .map(|maybe_user| maybe_user.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the stored profile of `user.id` with the values in `user`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist, or
/// [Error::DuplicateEmail] if the new email belongs to another user.
pub fn update_user(user: &User, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1, email = ?2, password = ?3 WHERE id = ?4",
        params![user.name, user.email, user.password_hash.as_ref(), user.id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete a user and, through the foreign keys, everything the user owns.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist.
pub fn delete_user(user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM user WHERE id = ?1", [user_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let email = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(User {
        id,
        name,
        email,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at,
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        db::initialize,
        pagination::Page,
        user::{NewUser, UserId},
    };

    use super::{
        create_user, delete_user, get_user_by_email, get_user_by_id, get_users, update_user,
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        initialize(&conn).expect("Could not initialize database");

        conn
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test User".to_owned(),
            email: email.to_owned(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        }
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();

        let inserted_user = create_user(new_user("foo@bar.baz"), &db_connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.email, "foo@bar.baz");
        assert_eq!(
            inserted_user.password_hash,
            PasswordHash::new_unchecked("hunter2")
        );
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let db_connection = get_db_connection();
        create_user(new_user("foo@bar.baz"), &db_connection).unwrap();

        let result = create_user(new_user("foo@bar.baz"), &db_connection);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserId::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let db_connection = get_db_connection();
        let test_user = create_user(new_user("foo@bar.baz"), &db_connection).unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_by_email_succeeds() {
        let db_connection = get_db_connection();
        let test_user = create_user(new_user("foo@bar.baz"), &db_connection).unwrap();

        let retrieved_user = get_user_by_email("foo@bar.baz", &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_by_unknown_email_returns_not_found() {
        let db_connection = get_db_connection();

        let result = get_user_by_email("nobody@bar.baz", &db_connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_users_pages_in_id_order() {
        let db_connection = get_db_connection();
        let users: Vec<_> = ["a@x.com", "b@x.com", "c@x.com"]
            .into_iter()
            .map(|email| create_user(new_user(email), &db_connection).unwrap())
            .collect();

        let page = get_users(
            Page {
                offset: 1,
                limit: 1,
            },
            &db_connection,
        )
        .unwrap();

        assert_eq!(page, vec![users[1].clone()]);
    }

    #[test]
    fn update_user_overwrites_profile() {
        let db_connection = get_db_connection();
        let mut user = create_user(new_user("foo@bar.baz"), &db_connection).unwrap();
        user.name = "Renamed".to_owned();

        update_user(&user, &db_connection).unwrap();

        let got = get_user_by_id(user.id, &db_connection).unwrap();
        assert_eq!(got, user);
    }

    #[test]
    fn update_missing_user_returns_not_found() {
        let db_connection = get_db_connection();
        let mut user = create_user(new_user("foo@bar.baz"), &db_connection).unwrap();
        user.id = UserId::new(999);

        assert_eq!(update_user(&user, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_user_succeeds() {
        let db_connection = get_db_connection();
        let user = create_user(new_user("foo@bar.baz"), &db_connection).unwrap();

        delete_user(user.id, &db_connection).unwrap();

        assert_eq!(
            get_user_by_id(user.id, &db_connection),
            Err(Error::NotFound)
        );
        assert_eq!(
            delete_user(user.id, &db_connection),
            Err(Error::NotFound)
        );
    }
}

//! Database operations for categories.

use rusqlite::{Connection, Row, params};

use crate::{
    Error, UserId,
    category::{Category, CategoryId, NewCategory},
    pagination::Page,
};

/// Create the category table.
///
/// # Errors
/// Returns an error if the SQL query fails.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category_name TEXT NOT NULL,
            category_type TEXT NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id)",
        (),
    )?;

    Ok(())
}

/// Insert a category owned by `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn create_category(
    user_id: UserId,
    new_category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (user_id, category_name, category_type) VALUES (?1, ?2, ?3)",
        params![user_id, new_category.category_name, new_category.category_type],
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        user_id,
        category_name: new_category.category_name,
        category_type: new_category.category_type,
    })
}

/// Get the category `id` if it is owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or belongs to another user.
pub fn get_category(
    id: CategoryId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_name, category_type FROM category
            WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row(params![id, user_id], map_row_to_category)
        .map_err(Error::from)
}

/// Get one page of the categories owned by `user_id`, ordered by ID.
pub fn get_categories(
    user_id: UserId,
    page: Page,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_name, category_type FROM category
            WHERE user_id = ?1 ORDER BY id ASC LIMIT ?2 OFFSET ?3",
        )?
        .query_map(params![user_id, page.limit, page.offset], map_row_to_category)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Overwrite the stored category with the values in `category`.
///
/// # Errors
/// Returns [Error::NotFound] if no category with the ID is owned by `category.user_id`.
pub fn update_category(category: &Category, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET category_name = ?1, category_type = ?2 WHERE id = ?3 AND user_id = ?4",
        params![
            category.category_name,
            category.category_type,
            category.id,
            category.user_id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the category `id` owned by `user_id`, and every expense filed under it.
///
/// # Errors
/// Returns [Error::NotFound] if the category does not exist or belongs to another user.
pub fn delete_category(id: CategoryId, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row_to_category(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_name: row.get(2)?,
        category_type: row.get(3)?,
    })
}

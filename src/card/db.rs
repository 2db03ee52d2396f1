//! Database operations for credit cards.

use rusqlite::{Connection, Row, params};

use crate::{
    Error, UserId,
    card::{Card, CardId, NewCard},
    pagination::Page,
};

/// Create the card table.
///
/// `limit` is a keyword in SQL, so the column is called `credit_limit`.
///
/// # Errors
/// Returns an error if the SQL query fails.
pub fn create_card_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS card (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            card_name TEXT NOT NULL,
            credit_limit TEXT NOT NULL,
            closing_day INTEGER NOT NULL CHECK (closing_day BETWEEN 1 AND 31),
            due_day INTEGER NOT NULL CHECK (due_day BETWEEN 1 AND 31)
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_card_user_id ON card(user_id)",
        (),
    )?;

    Ok(())
}

/// Insert a card owned by `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn create_card(user_id: UserId, new_card: NewCard, connection: &Connection) -> Result<Card, Error> {
    connection.execute(
        "INSERT INTO card (user_id, card_name, credit_limit, closing_day, due_day)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            new_card.card_name,
            new_card.limit,
            new_card.closing_day,
            new_card.due_day
        ],
    )?;

    Ok(Card {
        id: connection.last_insert_rowid(),
        user_id,
        card_name: new_card.card_name,
        limit: new_card.limit,
        closing_day: new_card.closing_day,
        due_day: new_card.due_day,
    })
}

/// Get the card `id` if it is owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the card does not exist or belongs to another user.
pub fn get_card(id: CardId, user_id: UserId, connection: &Connection) -> Result<Card, Error> {
    connection
        .prepare(
            "SELECT id, user_id, card_name, credit_limit, closing_day, due_day FROM card
            WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row(params![id, user_id], map_row_to_card)
        .map_err(Error::from)
}

/// Get one page of the cards owned by `user_id`, ordered by ID.
pub fn get_cards(user_id: UserId, page: Page, connection: &Connection) -> Result<Vec<Card>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, card_name, credit_limit, closing_day, due_day FROM card
            WHERE user_id = ?1 ORDER BY id ASC LIMIT ?2 OFFSET ?3",
        )?
        .query_map(params![user_id, page.limit, page.offset], map_row_to_card)?
        .map(|maybe_card| maybe_card.map_err(Error::from))
        .collect()
}

/// Overwrite the stored card with the values in `card`.
///
/// # Errors
/// Returns [Error::NotFound] if no card with the ID is owned by `card.user_id`.
pub fn update_card(card: &Card, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE card SET card_name = ?1, credit_limit = ?2, closing_day = ?3, due_day = ?4
        WHERE id = ?5 AND user_id = ?6",
        params![
            card.card_name,
            card.limit,
            card.closing_day,
            card.due_day,
            card.id,
            card.user_id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete the card `id` owned by `user_id`, and any expenses charged to it.
///
/// # Errors
/// Returns [Error::NotFound] if the card does not exist or belongs to another user.
pub fn delete_card(id: CardId, user_id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM card WHERE id = ?1 AND user_id = ?2",
        params![id, user_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row_to_card(row: &Row) -> Result<Card, rusqlite::Error> {
    Ok(Card {
        id: row.get(0)?,
        user_id: row.get(1)?,
        card_name: row.get(2)?,
        limit: row.get(3)?,
        closing_day: row.get(4)?,
        due_day: row.get(5)?,
    })
}

//! Core credit card types.

use serde::{Deserialize, Serialize};

use crate::{Error, Money, UserId, database_id::DatabaseId};

/// The ID of a credit card.
pub type CardId = DatabaseId;

/// A credit card owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// The id for the card.
    pub id: CardId,
    /// The user that owns the card.
    pub user_id: UserId,
    /// The display name of the card.
    pub card_name: String,
    /// The credit limit.
    pub limit: Money,
    /// The day of the month the statement closes.
    pub closing_day: u8,
    /// The day of the month the statement is due.
    pub due_day: u8,
}

/// The data for creating a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    /// The display name of the card.
    pub card_name: String,
    /// The credit limit.
    pub limit: Money,
    /// The day of the month the statement closes.
    pub closing_day: u8,
    /// The day of the month the statement is due.
    pub due_day: u8,
}

impl NewCard {
    /// Check that the closing and due days are days of the month.
    ///
    /// # Errors
    /// Returns [Error::InvalidDay] for the first day outside 1 to 31.
    pub fn validate(self) -> Result<Self, Error> {
        validate_day(self.closing_day)?;
        validate_day(self.due_day)?;

        Ok(self)
    }
}

/// A partial update to a card. Missing fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct CardUpdate {
    /// The new display name.
    pub card_name: Option<String>,
    /// The new credit limit.
    pub limit: Option<Money>,
    /// The new closing day.
    pub closing_day: Option<u8>,
    /// The new due day.
    pub due_day: Option<u8>,
}

impl CardUpdate {
    /// Merge the fields present in this update into `card`.
    ///
    /// # Errors
    /// Returns [Error::InvalidDay] if a new day is outside 1 to 31.
    pub fn apply(self, card: Card) -> Result<Card, Error> {
        let closing_day = self.closing_day.map(validate_day).transpose()?;
        let due_day = self.due_day.map(validate_day).transpose()?;

        Ok(Card {
            id: card.id,
            user_id: card.user_id,
            card_name: self.card_name.unwrap_or(card.card_name),
            limit: self.limit.unwrap_or(card.limit),
            closing_day: closing_day.unwrap_or(card.closing_day),
            due_day: due_day.unwrap_or(card.due_day),
        })
    }
}

fn validate_day(day: u8) -> Result<u8, Error> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(Error::InvalidDay(day))
    }
}

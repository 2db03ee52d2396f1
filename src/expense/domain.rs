//! Core expense types.

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{
    Money, UserId, account::AccountId, card::CardId, category::CategoryId,
    database_id::DatabaseId,
};

/// The ID of an expense.
pub type ExpenseId = DatabaseId;

/// Money spent by a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The id for the expense.
    pub id: ExpenseId,
    /// The user that owns the expense.
    pub user_id: UserId,
    /// The account the expense was paid from, if any.
    pub account_id: Option<AccountId>,
    /// The card the expense was charged to, if any.
    pub card_id: Option<CardId>,
    /// The category the expense is filed under.
    pub category_id: CategoryId,
    /// How much was spent.
    pub amount: Money,
    /// When the money was spent.
    pub date: Date,
    /// Free text notes.
    pub description: Option<String>,
}

/// The data for creating an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    /// The account the expense was paid from, if any.
    pub account_id: Option<AccountId>,
    /// The card the expense was charged to, if any.
    pub card_id: Option<CardId>,
    /// The category the expense is filed under.
    pub category_id: CategoryId,
    /// How much was spent.
    pub amount: Money,
    /// When the money was spent.
    pub date: Date,
    /// Free text notes.
    pub description: Option<String>,
}

/// A partial update to an expense.
///
/// Missing fields are left unchanged. For the nullable fields, an explicit
/// `null` clears the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseUpdate {
    /// The new account, `Some(None)` to unlink the account.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub account_id: Option<Option<AccountId>>,
    /// The new card, `Some(None)` to unlink the card.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub card_id: Option<Option<CardId>>,
    /// The new category.
    pub category_id: Option<CategoryId>,
    /// The new amount.
    pub amount: Option<Money>,
    /// The new date.
    pub date: Option<Date>,
    /// The new description, `Some(None)` to clear it.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
}

impl ExpenseUpdate {
    /// Merge the fields present in this update into `expense`.
    pub fn apply(self, expense: Expense) -> Expense {
        Expense {
            id: expense.id,
            user_id: expense.user_id,
            account_id: self.account_id.unwrap_or(expense.account_id),
            card_id: self.card_id.unwrap_or(expense.card_id),
            category_id: self.category_id.unwrap_or(expense.category_id),
            amount: self.amount.unwrap_or(expense.amount),
            date: self.date.unwrap_or(expense.date),
            description: self.description.unwrap_or(expense.description),
        }
    }
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod expense_update_tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Money, UserId,
        expense::{Expense, ExpenseUpdate},
    };

    fn test_expense() -> Expense {
        Expense {
            id: 7,
            user_id: UserId::new(1),
            account_id: Some(2),
            card_id: Some(3),
            category_id: 4,
            amount: Money::new(Decimal::new(1250, 2)).unwrap(),
            date: date!(2024 - 12 - 20),
            description: Some("Lunch".to_owned()),
        }
    }

    #[test]
    fn absent_fields_are_untouched() {
        let expense = test_expense();
        let update: ExpenseUpdate = serde_json::from_str(r#"{"amount": "99.999"}"#).unwrap();

        let updated = update.apply(expense.clone());

        assert_eq!(updated.amount.to_string(), "100.00");
        assert_eq!(updated.account_id, expense.account_id);
        assert_eq!(updated.card_id, expense.card_id);
        assert_eq!(updated.description, expense.description);
        assert_eq!(updated.date, expense.date);
    }

    #[test]
    fn null_clears_nullable_fields() {
        let update: ExpenseUpdate =
            serde_json::from_str(r#"{"account_id": null, "card_id": null, "description": null}"#)
                .unwrap();

        let updated = update.apply(test_expense());

        assert_eq!(updated.account_id, None);
        assert_eq!(updated.card_id, None);
        assert_eq!(updated.description, None);
    }

    #[test]
    fn values_replace_nullable_fields() {
        let update: ExpenseUpdate =
            serde_json::from_str(r#"{"card_id": 9, "description": "Dinner"}"#).unwrap();

        let updated = update.apply(test_expense());

        assert_eq!(updated.card_id, Some(9));
        assert_eq!(updated.description.as_deref(), Some("Dinner"));
        assert_eq!(updated.account_id, Some(2));
    }

    #[test]
    fn serializes_date_and_amount() {
        let json = serde_json::to_value(test_expense()).unwrap();

        assert_eq!(json["date"], "2024-12-20");
        assert_eq!(json["amount"], "12.50");
    }
}

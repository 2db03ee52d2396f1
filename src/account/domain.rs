//! Core account types.

use serde::{Deserialize, Serialize};

use crate::{Money, UserId, database_id::DatabaseId};

/// The ID of a bank account.
pub type AccountId = DatabaseId;

/// A bank account owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The user that owns the account.
    pub user_id: UserId,
    /// The display name of the account.
    pub account_name: String,
    /// The balance.
    pub balance: Money,
    /// A free text label such as "Savings" or "Checking".
    pub account_type: String,
}

/// The data for creating an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    /// The display name of the account.
    pub account_name: String,
    /// The opening balance.
    pub balance: Money,
    /// A free text label such as "Savings".
    pub account_type: String,
}

/// A partial update to an account. Missing fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct AccountUpdate {
    /// The new display name.
    pub account_name: Option<String>,
    /// The new balance.
    pub balance: Option<Money>,
    /// The new account type.
    pub account_type: Option<String>,
}

impl AccountUpdate {
    /// Merge the fields present in this update into `account`.
    pub fn apply(self, account: Account) -> Account {
        Account {
            id: account.id,
            user_id: account.user_id,
            account_name: self.account_name.unwrap_or(account.account_name),
            balance: self.balance.unwrap_or(account.balance),
            account_type: self.account_type.unwrap_or(account.account_type),
        }
    }
}

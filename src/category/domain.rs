//! Core category types.

use serde::{Deserialize, Serialize};

use crate::{UserId, database_id::DatabaseId};

/// The ID of an expense category.
pub type CategoryId = DatabaseId;

/// A user defined label for grouping expenses, e.g. "Groceries".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// The id for the category.
    pub id: CategoryId,
    /// The user that owns the category.
    pub user_id: UserId,
    /// The display name of the category.
    pub category_name: String,
    /// A free text label such as "Expense" or "Income".
    #[serde(rename = "type")]
    pub category_type: String,
}

/// The data for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    /// The display name of the category.
    pub category_name: String,
    /// A free text label such as "Expense".
    #[serde(rename = "type")]
    pub category_type: String,
}

/// A partial update to a category. Missing fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryUpdate {
    /// The new display name.
    pub category_name: Option<String>,
    /// The new type label.
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

impl CategoryUpdate {
    /// Merge the fields present in this update into `category`.
    pub fn apply(self, category: Category) -> Category {
        Category {
            id: category.id,
            user_id: category.user_id,
            category_name: self.category_name.unwrap_or(category.category_name),
            category_type: self.category_type.unwrap_or(category.category_type),
        }
    }
}

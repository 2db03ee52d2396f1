//! Categories for grouping expenses.

mod db;
mod domain;
mod endpoints;

pub use db::{create_category, create_category_table, get_category};
pub use domain::{Category, CategoryId, CategoryUpdate, NewCategory};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
    get_category_endpoint, update_category_endpoint,
};

#[cfg(test)]
pub use db::delete_category;

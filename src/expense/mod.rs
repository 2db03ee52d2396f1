//! Expenses and the expense summary report.

mod db;
mod domain;
mod endpoints;
mod summary;

pub use db::{create_expense, create_expense_table};
pub use domain::{Expense, ExpenseId, ExpenseUpdate, NewExpense};
pub use endpoints::{
    create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
    get_expenses_endpoint, update_expense_endpoint,
};
pub use summary::get_expense_summary_endpoint;

//! Bank accounts that expenses can be paid from.

mod db;
mod domain;
mod endpoints;

pub use db::{create_account, create_account_table, get_account};
pub use domain::{Account, AccountId, AccountUpdate, NewAccount};
pub use endpoints::{
    create_account_endpoint, delete_account_endpoint, get_account_endpoint,
    get_accounts_endpoint, update_account_endpoint,
};

#[cfg(test)]
pub use db::delete_account;

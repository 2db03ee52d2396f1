//! Users of the application: sign up, public profiles and profile management.

mod db;
mod domain;
mod endpoints;

pub use db::{create_user, create_user_table, get_user_by_email};
pub use domain::{NewUser, User, UserId, UserUpdate};
pub use endpoints::{
    create_user_endpoint, delete_user_endpoint, get_current_user_endpoint, get_user_endpoint,
    get_users_endpoint, update_user_endpoint,
};

#[cfg(test)]
pub use db::delete_user;

//! Core user domain types.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(UserId)
    }
}

/// A user of the application.
///
/// Serializes to the user's public profile, the password hash is never sent
/// to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's display name.
    pub name: String,
    /// The email the user logs in with. Unique across all users.
    pub email: String,
    /// The user's password hash.
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
    /// When the user signed up.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to insert a user into the database.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The email the user logs in with.
    pub email: String,
    /// The hash of the user's password.
    pub password_hash: PasswordHash,
}

/// A partial update to a user's profile.
///
/// Fields that are missing from the request body are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    /// The new display name.
    pub name: Option<String>,
    /// The new email address.
    pub email: Option<String>,
    /// The new plaintext password, hashed before it is stored.
    pub password: Option<String>,
}

impl UserUpdate {
    /// Hash the new password, if there is one, with `password_cost`.
    ///
    /// Hashing is slow, so this should be done before the database is locked.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the new password could not be hashed.
    pub fn hash_password(self, password_cost: u32) -> Result<HashedUserUpdate, Error> {
        let password_hash = self
            .password
            .map(|password| PasswordHash::from_raw_password(&password, password_cost))
            .transpose()?;

        Ok(HashedUserUpdate {
            name: self.name,
            email: self.email,
            password_hash,
        })
    }
}

/// A [UserUpdate] whose new password, if any, has already been hashed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HashedUserUpdate {
    /// The new display name.
    pub name: Option<String>,
    /// The new email address.
    pub email: Option<String>,
    /// The hash of the new password.
    pub password_hash: Option<PasswordHash>,
}

impl HashedUserUpdate {
    /// Merge the fields present in this update into `user`.
    pub fn apply(self, user: User) -> User {
        User {
            id: user.id,
            name: self.name.unwrap_or(user.name),
            email: self.email.unwrap_or(user.email),
            password_hash: self.password_hash.unwrap_or(user.password_hash),
            created_at: user.created_at,
        }
    }
}

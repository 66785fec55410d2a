// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub first_name: String,

    pub last_name: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Fields needed to insert a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Registration form.
/// Accepts the short field names used by the legacy HTML forms as aliases.
#[derive(Debug, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(length(
        min = 1,
        max = 150,
        message = "Username length must be between 1 and 150 characters."
    ))]
    pub username: String,
    #[serde(alias = "psw")]
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password length must be between 1 and 128 characters."
    ))]
    pub password: String,
    #[serde(default, alias = "firstname")]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default, alias = "lastname")]
    #[validate(length(max = 150))]
    pub last_name: String,
}

/// Login form.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[serde(alias = "psw")]
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

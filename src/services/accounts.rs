// src/services/accounts.rs

use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginForm, NewUser, RegistrationForm, User},
    store::Store,
    utils::hash::{hash_password, verify_password},
};

pub const USER_EXISTS_MESSAGE: &str = "User already exists.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

#[derive(Debug)]
pub enum RegistrationOutcome {
    Registered(User),
    UsernameTaken,
}

/// Creates an account unless the username is taken.
///
/// The password is stored as an Argon2 hash. A taken username is an
/// outcome, not an error: the page is re-rendered with a message.
pub async fn register(
    store: &dyn Store,
    form: RegistrationForm,
) -> Result<RegistrationOutcome, AppError> {
    form.validate()?;

    if store.find_user_by_username(&form.username).await?.is_some() {
        return Ok(RegistrationOutcome::UsernameTaken);
    }

    let password_hash = hash_password(&form.password)?;

    // A concurrent registration can still win the race; the unique index decides.
    let created = store
        .create_user(NewUser {
            username: form.username,
            password_hash,
            first_name: form.first_name,
            last_name: form.last_name,
        })
        .await?;

    Ok(match created {
        Some(user) => {
            tracing::info!(user_id = user.id, "Registered user '{}'", user.username);
            RegistrationOutcome::Registered(user)
        }
        None => RegistrationOutcome::UsernameTaken,
    })
}

/// Returns the user when the credentials match, `None` otherwise.
pub async fn authenticate(store: &dyn Store, form: LoginForm) -> Result<Option<User>, AppError> {
    if form.validate().is_err() {
        return Ok(None);
    }

    let Some(user) = store.find_user_by_username(&form.username).await? else {
        return Ok(None);
    };

    if verify_password(&form.password, &user.password)? {
        Ok(Some(user))
    } else {
        tracing::info!("Failed login for '{}'", form.username);
        Ok(None)
    }
}

// src/handlers/auth.rs

use axum::{
    Form, Json,
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginForm, RegistrationForm, User},
    routes::INDEX_PATH,
    services::accounts::{
        self, INVALID_CREDENTIALS_MESSAGE, RegistrationOutcome, USER_EXISTS_MESSAGE,
    },
    store::SharedStore,
    utils::session::{Viewer, clear_session_cookie, session_cookie, sign_session},
    views::FormPage,
};

/// Issues a session cookie for the user and sends them to the index.
fn start_session(config: &Config, user: &User) -> Result<Response, AppError> {
    let token = sign_session(
        user.id,
        &user.username,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, config.jwt_expiration))],
        Redirect::to(INDEX_PATH),
    )
        .into_response())
}

pub async fn registration_page(viewer: Viewer) -> Json<FormPage> {
    Json(FormPage::registration(&viewer, None))
}

/// Registers a new user and logs them in.
///
/// A taken username re-renders the registration page with a message.
pub async fn register(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    viewer: Viewer,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    match accounts::register(store.as_ref(), form).await? {
        RegistrationOutcome::Registered(user) => start_session(&config, &user),
        RegistrationOutcome::UsernameTaken => {
            Ok(Json(FormPage::registration(&viewer, Some(USER_EXISTS_MESSAGE))).into_response())
        }
    }
}

pub async fn login_page(viewer: Viewer) -> Json<FormPage> {
    Json(FormPage::login(&viewer, None))
}

/// Verifies credentials and starts a session.
pub async fn login(
    State(store): State<SharedStore>,
    State(config): State<Config>,
    viewer: Viewer,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match accounts::authenticate(store.as_ref(), form).await? {
        Some(user) => {
            tracing::info!(user_id = user.id, "User logged in");
            start_session(&config, &user)
        }
        None => Ok(
            Json(FormPage::login(&viewer, Some(INVALID_CREDENTIALS_MESSAGE))).into_response(),
        ),
    }
}

pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to(INDEX_PATH),
    )
}

// src/utils/session.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, SESSION_COOKIE},
    error::AppError,
    store::{SharedStore, Store},
};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    pub username: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// Signs a session token for the user.
pub fn sign_session(
    id: i64,
    username: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs()
        .checked_add(expiration_seconds)
        .and_then(|exp| usize::try_from(exp).ok())
        .ok_or_else(|| {
            AppError::InternalServerError("Session expiration out of range".to_string())
        })?;

    let claims = Claims {
        sub: id.to_string(),
        username: username.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a session token.
pub fn verify_session(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid session".to_string()))?;

    Ok(token_data.claims)
}

/// `Set-Cookie` value that installs the session token.
pub fn session_cookie(token: &str, max_age_seconds: u64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Finds the session token in the `session` cookie or a Bearer header.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value);

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
    })
}

/// The logged-in user as carried by the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// Request context: who is making the request, if anyone.
///
/// A missing, expired or forged token, or one naming a user the store no
/// longer holds, yields an anonymous viewer. Extraction fails only when the
/// store does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer(pub Option<SessionUser>);

impl Viewer {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(id: i64, username: &str) -> Self {
        Self(Some(SessionUser {
            id,
            username: username.to_string(),
        }))
    }

    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }

    /// Resolves the session token in `headers` to a user of `store`.
    ///
    /// A token whose user no longer exists is treated as anonymous.
    pub async fn resolve(
        headers: &HeaderMap,
        secret: &str,
        store: &dyn Store,
    ) -> Result<Self, AppError> {
        let Some(claimed) = claimed_user_id(headers, secret) else {
            return Ok(Self::anonymous());
        };

        match store.find_user_by_id(claimed).await? {
            Some(user) => Ok(Self::user(user.id, &user.username)),
            None => {
                tracing::debug!(user_id = claimed, "Session refers to an unknown user");
                Ok(Self::anonymous())
            }
        }
    }
}

/// The user id carried by a valid session token, if any.
fn claimed_user_id(headers: &HeaderMap, secret: &str) -> Option<i64> {
    let token = session_token(headers)?;

    match verify_session(token, secret) {
        Ok(claims) => claims.sub.parse::<i64>().ok(),
        Err(_) => {
            tracing::debug!("Ignoring invalid session token");
            None
        }
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    Config: FromRef<S>,
    SharedStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Config::from_ref(state);
        let store = SharedStore::from_ref(state);
        Viewer::resolve(&parts.headers, &config.jwt_secret, &*store).await
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::{models::user::NewUser, store::MemoryStore};

    const SECRET: &str = "session_test_secret";

    fn headers(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn store_with(username: &str) -> (MemoryStore, i64) {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                username: username.to_string(),
                password_hash: "hash".to_string(),
                first_name: String::new(),
                last_name: String::new(),
            })
            .await
            .unwrap()
            .unwrap();
        (store, user.id)
    }

    #[tokio::test]
    async fn cookie_session_identifies_user() {
        let (store, id) = store_with("alice").await;
        let token = sign_session(id, "alice", SECRET, 600).unwrap();
        let headers = headers(header::COOKIE, &format!("theme=dark; session={token}"));

        let viewer = Viewer::resolve(&headers, SECRET, &store).await.unwrap();
        assert_eq!(viewer, Viewer::user(id, "alice"));
    }

    #[tokio::test]
    async fn bearer_header_is_accepted() {
        let (store, id) = store_with("bob").await;
        let token = sign_session(id, "bob", SECRET, 600).unwrap();
        let headers = headers(header::AUTHORIZATION, &format!("Bearer {token}"));

        let viewer = Viewer::resolve(&headers, SECRET, &store).await.unwrap();
        assert_eq!(viewer.user_id(), Some(id));
    }

    #[tokio::test]
    async fn forged_token_is_anonymous() {
        let (store, id) = store_with("alice").await;
        let token = sign_session(id, "alice", "other_secret", 600).unwrap();
        let headers = headers(header::COOKIE, &format!("session={token}"));

        let viewer = Viewer::resolve(&headers, SECRET, &store).await.unwrap();
        assert!(!viewer.is_authenticated());
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_anonymous() {
        let (store, _) = store_with("alice").await;
        let token = sign_session(99, "ghost", SECRET, 600).unwrap();
        let headers = headers(header::COOKIE, &format!("session={token}"));

        let viewer = Viewer::resolve(&headers, SECRET, &store).await.unwrap();
        assert_eq!(viewer, Viewer::anonymous());
    }

    #[tokio::test]
    async fn missing_or_cleared_cookie_is_anonymous() {
        let store = MemoryStore::new();
        let empty = Viewer::resolve(&HeaderMap::new(), SECRET, &store).await.unwrap();
        assert_eq!(empty, Viewer::anonymous());

        let headers = headers(header::COOKIE, "session=");
        let cleared = Viewer::resolve(&headers, SECRET, &store).await.unwrap();
        assert_eq!(cleared, Viewer::anonymous());
    }

    #[test]
    fn overflowing_expiration_is_an_error() {
        let result = sign_session(1, "alice", SECRET, u64::MAX);
        assert!(matches!(result, Err(AppError::InternalServerError(_))));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
        assert!(session_cookie("abc", 60).starts_with("session=abc;"));
    }
}

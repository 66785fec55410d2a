// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf};

use dotenvy::dotenv;

/// Number of courses shown on the index page.
pub const COURSE_LIST_LIMIT: i64 = 10;

/// Mode recorded for enrollments made through the enroll action.
pub const DEFAULT_ENROLLMENT_MODE: crate::models::enrollment::EnrollmentMode =
    crate::models::enrollment::EnrollmentMode::Honor;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

const DEFAULT_JWT_EXPIRATION: u64 = 60 * 60 * 24;
/// Longest accepted session lifetime (one year).
const MAX_JWT_EXPIRATION: u64 = 60 * 60 * 24 * 365;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Session lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    /// Catalog imported into an empty store at startup.
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL");

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = match non_empty("JWT_EXPIRATION") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs <= MAX_JWT_EXPIRATION => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "JWT_EXPIRATION",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_JWT_EXPIRATION,
        };

        let rust_log = non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let raw_addr = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: raw_addr.clone(),
        })?;

        let seed_file = non_empty("SEED_FILE").map(PathBuf::from);

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            seed_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.jwt_expiration, DEFAULT_JWT_EXPIRATION);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn requires_jwt_secret() {
        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn rejects_bad_expiration() {
        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "JWT_EXPIRATION", .. }));
    }

    #[test]
    fn rejects_out_of_range_expiration() {
        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION", "18446744073709551615"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "JWT_EXPIRATION", .. }));

        let max = MAX_JWT_EXPIRATION.to_string();
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION", max.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.jwt_expiration, MAX_JWT_EXPIRATION);
    }

    #[test]
    fn reads_all_settings() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/courses"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION", "600"),
            ("RUST_LOG", "debug"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("SEED_FILE", "seed/catalog.json"),
        ]))
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/courses"));
        assert_eq!(config.jwt_expiration, 600);
        assert_eq!(config.rust_log, "debug");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.seed_file, Some(PathBuf::from("seed/catalog.json")));
    }
}

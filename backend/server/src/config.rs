use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use axum::http::HeaderValue;
use tracing::{info, warn};

use crate::{auth::AdminCredentials, error::ConfigError};

pub const SECRETS_DIR: &str = "/run/secrets";

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub cors_origin: HeaderValue,
    pub admin: AdminCredentials,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("RUST_PORT", "5000")?,
            redis_url: try_load("REDIS_URL", "redis://localhost:6379/")?,
            cors_origin: try_load("CORS_ORIGIN", "http://localhost:3000")?,
            admin: AdminCredentials::new(
                try_load::<String>("ADMIN_EMAIL", "admin@localhost")?,
                load_password_hash()?,
            ),
        })
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    parse_or_default(key, var(key).ok(), default)
}

fn parse_or_default<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("{SECRETS_DIR}/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("No {secret_name} secret file: {e}");
        })
        .ok()
}

/// Secret file first, then the environment.
fn secret_or_var(name: &str) -> Option<String> {
    read_secret(name)
        .or_else(|| env::var(name).ok())
        .filter(|value| !value.trim().is_empty())
}

fn load_password_hash() -> Result<String, ConfigError> {
    resolve_password_hash(
        secret_or_var("ADMIN_PASSWORD_HASH"),
        secret_or_var("ADMIN_PASSWORD"),
    )
}

fn resolve_password_hash(
    hash: Option<String>,
    plaintext: Option<String>,
) -> Result<String, ConfigError> {
    match (hash, plaintext) {
        (Some(hash), _) => Ok(hash),
        (None, Some(plaintext)) => {
            warn!("ADMIN_PASSWORD_HASH not set, hashing ADMIN_PASSWORD at startup");
            Ok(bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)?)
        }
        (None, None) => Err(ConfigError::MissingAdminPassword),
    }
}

use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug)]
pub(crate) struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub bind_address: String,
    pub port: u16,
    pub random_seed: Option<u64>,
}

impl Config {
    /// Reads the process environment, after `.env` has been loaded.
    pub(crate) fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let redis_url = non_empty(&lookup, "REDIS_URL");
        if redis_url.is_none() {
            warn!("REDIS_URL not set, product caching disabled");
        }
        Ok(Self {
            database_url: non_empty(&lookup, "DATABASE_URL")
                .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            redis_url,
            bind_address: non_empty(&lookup, "BIND_ADDRESS")
                .unwrap_or_else(|| "127.0.0.1".to_string()),
            port: try_load(&lookup, "PORT", "8080")?,
            random_seed: non_empty(&lookup, "RANDOM_SEED")
                .map(|value| parse("RANDOM_SEED", value))
                .transpose()?,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = non_empty(lookup, key).unwrap_or_else(|| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    });
    parse(key, value)
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

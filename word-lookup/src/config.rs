use std::{env, fmt::Display, fs::read_to_string, net::SocketAddr, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{debug, info};

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
pub const WORD_STORE_URL: &str = "WORD_STORE_URL";
pub const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const MERRIAM_WEBSTER_KEY: &str = "MERRIAM_WEBSTER_KEY";
pub const MERRIAM_WEBSTER_URL: &str = "MERRIAM_WEBSTER_URL";
pub const UNSPLASH_ACCESS_KEY: &str = "UNSPLASH_ACCESS_KEY";
pub const UNSPLASH_URL: &str = "UNSPLASH_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set and /run/secrets/{0} is not readable")]
    MissingSecret(&'static str),

    #[error("invalid {key} value {value:?}: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

/// Settings for `serve`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_address: SocketAddr,
}

/// Settings every client command needs to reach the word store.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub store_url: String,
    /// Applies to every outbound request. `None` waits forever.
    pub http_timeout: Option<Duration>,
}

/// Credentials and endpoints of the external providers.
#[derive(Clone)]
pub struct ProviderConfig {
    pub merriam_webster_key: String,
    pub merriam_webster_url: Option<String>,
    pub unsplash_access_key: String,
    pub unsplash_url: Option<String>,
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(&var)
    }

    fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: try_load(vars, DATABASE_URL, "sqlite://words.db")?,
            bind_address: try_load(vars, BIND_ADDRESS, "127.0.0.1:8000")?,
        })
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(&var)
    }

    fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let http_timeout = vars(HTTP_TIMEOUT_SECS)
            .map(|value| parse::<u64>(HTTP_TIMEOUT_SECS, value))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            store_url: try_load(vars, WORD_STORE_URL, "http://127.0.0.1:8000")?,
            http_timeout,
        })
    }
}

impl ProviderConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(&var)
    }

    fn from_vars(vars: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            merriam_webster_key: secret(vars, MERRIAM_WEBSTER_KEY)?,
            merriam_webster_url: vars(MERRIAM_WEBSTER_URL),
            unsplash_access_key: secret(vars, UNSPLASH_ACCESS_KEY)?,
            unsplash_url: vars(UNSPLASH_URL),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(
    vars: &dyn Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = vars(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse(key, value)
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    match value.trim().parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::Invalid {
            key,
            message: e.to_string(),
            value,
        }),
    }
}

// Keys come from the environment first, then from a mounted secret file.
fn secret(vars: &dyn Fn(&str) -> Option<String>, name: &'static str) -> Result<String, ConfigError> {
    if let Some(value) = vars(name) {
        return Ok(value.trim().to_string());
    }

    let path = format!("/run/secrets/{name}");
    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            debug!("Failed to read {name} from {path}: {e}");
            ConfigError::MissingSecret(name)
        })
        .and_then(|value| {
            if value.is_empty() {
                Err(ConfigError::MissingSecret(name))
            } else {
                Ok(value)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn server_defaults() {
        let config = ServerConfig::from_vars(&vars(&[])).unwrap();
        assert_eq!(config.database_url, "sqlite://words.db");
        assert_eq!(config.bind_address, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn invalid_bind_address_is_an_error() {
        let error = ServerConfig::from_vars(&vars(&[(BIND_ADDRESS, "localhost")])).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { key: BIND_ADDRESS, .. }));
    }

    #[test]
    fn client_timeout_is_optional() {
        let config = ClientConfig::from_vars(&vars(&[])).unwrap();
        assert_eq!(config.store_url, "http://127.0.0.1:8000");
        assert_eq!(config.http_timeout, None);

        let config = ClientConfig::from_vars(&vars(&[(HTTP_TIMEOUT_SECS, "5")])).unwrap();
        assert_eq!(config.http_timeout, Some(Duration::from_secs(5)));

        assert!(ClientConfig::from_vars(&vars(&[(HTTP_TIMEOUT_SECS, "soon")])).is_err());
    }

    #[test]
    fn provider_keys_come_from_vars() {
        let config = ProviderConfig::from_vars(&vars(&[
            (MERRIAM_WEBSTER_KEY, " mw-key "),
            (UNSPLASH_ACCESS_KEY, "unsplash-key"),
            (UNSPLASH_URL, "http://127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(config.merriam_webster_key, "mw-key");
        assert_eq!(config.merriam_webster_url, None);
        assert_eq!(config.unsplash_url.as_deref(), Some("http://127.0.0.1:9000"));
    }

    #[test]
    fn missing_provider_key_is_reported_by_name() {
        let error = ProviderConfig::from_vars(&vars(&[(MERRIAM_WEBSTER_KEY, "mw-key")]))
            .err()
            .unwrap();
        assert!(matches!(error, ConfigError::MissingSecret(UNSPLASH_ACCESS_KEY)));
    }
}

use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable '{0}'")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub pool_size: u32,
    /// Mail relay for order confirmations. Confirmations are only logged when unset.
    pub notify_webhook_url: Option<String>,
    pub notify_timeout: Duration,
}

impl AppConfig {
    /// Reads the process environment. `.env` must already be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&get, "PORT", 8080u16)?;
        let pool_size = parse_or(&get, "DB_POOL_SIZE", 10u32)?;
        let notify_webhook_url = get("NOTIFY_WEBHOOK_URL").filter(|url| !url.trim().is_empty());
        let timeout_secs = parse_or(&get, "NOTIFY_TIMEOUT_SECS", 5u64)?;

        Ok(Self {
            host,
            port,
            database_url,
            pool_size,
            notify_webhook_url,
            notify_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/salon")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.pool_size, 10);
        assert!(config.notify_webhook_url.is_none());
        assert_eq!(config.notify_timeout, Duration::from_secs(5));
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = load(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn blank_webhook_url_is_ignored() {
        let config = load(&[("DATABASE_URL", "postgres://x"), ("NOTIFY_WEBHOOK_URL", " ")]).unwrap();
        assert!(config.notify_webhook_url.is_none());
    }
}

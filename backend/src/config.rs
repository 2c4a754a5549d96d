//! Runtime configuration read from environment variables.
//!
//! `main` loads an optional `.env` file first, so every value below can also
//! live there.

use axum::http::HeaderValue;
use chrono::Duration;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::AdminCredentials;

pub const BIND_ADDR_VAR: &str = "UTAITE_BIND_ADDR";
pub const DATA_DIR_VAR: &str = "UTAITE_DATA_DIR";
pub const STATIC_DIR_VAR: &str = "UTAITE_STATIC_DIR";
pub const ALLOWED_ORIGIN_VAR: &str = "UTAITE_ALLOWED_ORIGIN";
pub const SESSION_TTL_VAR: &str = "UTAITE_SESSION_TTL_HOURS";
pub const ADMIN_USERNAME_VAR: &str = "ADMIN_USERNAME";
pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_SESSION_TTL_HOURS: i64 = 168;
const APP_DIR_NAME: &str = "utaite-birthdays";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    /// Static UI to serve behind the page gate, if any
    pub static_dir: Option<PathBuf>,
    pub allowed_origin: HeaderValue,
    pub session_ttl: Duration,
    pub credentials: AdminCredentials,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_value = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_value.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            name: BIND_ADDR_VAR,
            value: bind_value.clone(),
            reason: e.to_string(),
        })?;

        let data_dir = get(DATA_DIR_VAR).map(PathBuf::from).unwrap_or_else(default_data_dir);
        let static_dir = get(STATIC_DIR_VAR).map(PathBuf::from);

        let origin = get(ALLOWED_ORIGIN_VAR).unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        let allowed_origin = HeaderValue::from_str(&origin).map_err(|e| ConfigError::Invalid {
            name: ALLOWED_ORIGIN_VAR,
            value: origin.clone(),
            reason: e.to_string(),
        })?;

        let session_ttl = match get(SESSION_TTL_VAR) {
            Some(value) => match value.parse::<i64>() {
                Ok(hours) if hours > 0 => Duration::hours(hours),
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: SESSION_TTL_VAR,
                        value,
                        reason: "must be a positive number of hours".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: SESSION_TTL_VAR,
                        value,
                        reason: e.to_string(),
                    })
                }
            },
            None => Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        };

        let username = get(ADMIN_USERNAME_VAR).ok_or(ConfigError::Missing(ADMIN_USERNAME_VAR))?;
        // Passwords are taken verbatim; only a fully blank one counts as missing
        let password = lookup(ADMIN_PASSWORD_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(ADMIN_PASSWORD_VAR))?;

        Ok(Self {
            bind_addr,
            data_dir,
            static_dir,
            allowed_origin,
            session_ttl,
            credentials: AdminCredentials::new(username, password),
        })
    }
}

/// Platform data directory, or `./data` when the platform has none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    const CREDENTIALS: [(&str, &str); 2] = [(ADMIN_USERNAME_VAR, "admin"), (ADMIN_PASSWORD_VAR, "hunter2")];

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&CREDENTIALS)).unwrap();

        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.data_dir, default_data_dir());
        assert_eq!(config.static_dir, None);
        assert_eq!(config.allowed_origin, HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN));
        assert_eq!(config.session_ttl, Duration::hours(168));
        assert_eq!(config.credentials, AdminCredentials::new("admin", "hunter2"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ADMIN_USERNAME_VAR, "admin"),
            (ADMIN_PASSWORD_VAR, "hunter2"),
            (BIND_ADDR_VAR, "0.0.0.0:8000"),
            (DATA_DIR_VAR, "/tmp/utaite"),
            (STATIC_DIR_VAR, "./dist"),
            (ALLOWED_ORIGIN_VAR, "https://admin.example.com"),
            (SESSION_TTL_VAR, "12"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/utaite"));
        assert_eq!(config.static_dir, Some(PathBuf::from("./dist")));
        assert_eq!(config.allowed_origin, "https://admin.example.com");
        assert_eq!(config.session_ttl, Duration::hours(12));
    }

    #[test]
    fn test_missing_credentials() {
        let err = AppConfig::from_lookup(lookup_from(&[(ADMIN_PASSWORD_VAR, "hunter2")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ADMIN_USERNAME_VAR));

        let err =
            AppConfig::from_lookup(lookup_from(&[(ADMIN_USERNAME_VAR, "admin"), (ADMIN_PASSWORD_VAR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ADMIN_PASSWORD_VAR));
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push((BIND_ADDR_VAR, "not an address"));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid { name: BIND_ADDR_VAR, .. })
        ));

        let mut pairs = CREDENTIALS.to_vec();
        pairs.push((SESSION_TTL_VAR, "0"));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid { name: SESSION_TTL_VAR, .. })
        ));

        let mut pairs = CREDENTIALS.to_vec();
        pairs.push((SESSION_TTL_VAR, "a week"));
        assert!(matches!(
            AppConfig::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Invalid { name: SESSION_TTL_VAR, .. })
        ));
    }
}

//! Server configuration from environment variables

use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_PREVIEW_ROWS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Idle time after which a session is dropped
    pub session_ttl: Duration,
    /// Rows shown in the uploaded-table preview
    pub preview_rows: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `MAX_UPLOAD_BYTES`, `SESSION_TTL_SECS` and
    /// `PREVIEW_ROWS`, falling back to defaults for unset variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let ttl_secs = parse_var(
            &lookup,
            "SESSION_TTL_SECS",
            DEFAULT_SESSION_TTL_SECS,
            "a whole number of seconds",
        )?;

        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", DEFAULT_PORT, "a port number")?,
            max_upload_bytes: parse_var(
                &lookup,
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
                "a positive byte count",
            )?,
            session_ttl: Duration::from_secs(ttl_secs),
            preview_rows: parse_var(&lookup, "PREVIEW_ROWS", DEFAULT_PREVIEW_ROWS, "a row count")?,
        };

        if config.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_UPLOAD_BYTES",
                value: "0".to_string(),
                expected: "a positive byte count",
            });
        }
        Ok(config)
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T, expected: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name,
                value,
                expected,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.session_ttl, Duration::from_secs(3600));
        assert_eq!(config.addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("SESSION_TTL_SECS", "60"),
            ("PREVIEW_ROWS", " 10 "),
        ]))
        .unwrap();
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:3000");
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.session_ttl, Duration::from_secs(60));
        assert_eq!(config.preview_rows, 10);
    }

    #[test]
    fn test_invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err.to_string(), "PORT must be a port number, got 'eighty'");

        assert!(ServerConfig::from_lookup(lookup(&[("MAX_UPLOAD_BYTES", "0")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("SESSION_TTL_SECS", "-5")])).is_err());

        let config = ServerConfig::from_lookup(lookup(&[("HOST", "not a host")])).unwrap();
        assert!(matches!(config.addr(), Err(ConfigError::InvalidAddress(_))));
    }
}

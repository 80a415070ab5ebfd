//! Process settings read from the environment.

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/watchlist";
pub const DEFAULT_SCHEMA: &str = "watchlist";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5001";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Success codes used by read and watch endpoints.
///
/// `Legacy` keeps the historical surface (302 for reads, 202 for a user's
/// watched shows and the watch action). `Uniform` answers 200 everywhere a
/// body is returned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusCodes {
    #[default]
    Uniform,
    Legacy,
}

impl FromStr for StatusCodes {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(StatusCodes::Uniform),
            "legacy" => Ok(StatusCodes::Legacy),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    /// Schema holding users, shows and watched_shows. Must be a valid PostgreSQL identifier.
    pub schema: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub status_codes: StatusCodes,
    pub body_limit_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let schema = lookup("WATCHLIST_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        if !is_identifier(&schema) {
            return Err(ConfigError::InvalidVar {
                var: "WATCHLIST_SCHEMA",
                value: schema,
            });
        }
        Ok(Settings {
            database_url,
            schema,
            max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            bind_addr: match lookup("BIND_ADDR") {
                Some(v) => parse_value("BIND_ADDR", v)?,
                None => SocketAddr::from(([0, 0, 0, 0], 5001)),
            },
            status_codes: parse_var(&lookup, "STATUS_CODES", StatusCodes::default())?,
            body_limit_bytes: parse_var(&lookup, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.into(),
            schema: DEFAULT_SCHEMA.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5001)),
            status_codes: StatusCodes::default(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(v) => parse_value(var, v),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidVar { var, value })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.schema, "watchlist");
        assert_eq!(s.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(s.status_codes, StatusCodes::Uniform);
        assert_eq!(s.max_connections, 5);
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            ("STATUS_CODES", "Legacy"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("WATCHLIST_SCHEMA", "tv_2"),
        ])
        .unwrap();
        assert_eq!(s.status_codes, StatusCodes::Legacy);
        assert_eq!(s.bind_addr.port(), 8080);
        assert_eq!(s.max_connections, 12);
        assert_eq!(s.schema, "tv_2");
    }

    #[test]
    fn rejects_bad_values() {
        let err = settings(&[("STATUS_CODES", "sometimes")]).unwrap_err();
        assert!(err.to_string().contains("STATUS_CODES"));
        assert!(settings(&[("WATCHLIST_SCHEMA", "a;drop")]).is_err());
        assert!(settings(&[("BIND_ADDR", "nowhere")]).is_err());
    }
}

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    // Salary drafts
    pub draft_ttl: Duration,
    pub draft_capacity: u64,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,

    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            rate_protected_per_min: optional("RATE_PROTECTED_PER_MIN", 1000)?,

            draft_ttl: Duration::from_secs(optional("DRAFT_TTL_SECS", 1800)?),
            draft_capacity: optional("DRAFT_CAPACITY", 10_000)?,

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: optional("LOG_LEVEL", tracing::Level::DEBUG)?,

            run_migrations: optional("RUN_MIGRATIONS", true)?,
        })
    }
}

fn optional<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_or(name, env::var(name).ok(), default)
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set"))
}

/// Parse an optional setting, falling back to `default` when unset or blank.
fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {name} value {value:?}: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_blank_uses_default() {
        assert_eq!(parse_or("DRAFT_CAPACITY", None, 10_000u64).unwrap(), 10_000);
        assert_eq!(parse_or("DRAFT_CAPACITY", Some("  ".into()), 10_000u64).unwrap(), 10_000);
        assert_eq!(parse_or("DRAFT_CAPACITY", Some("25".into()), 10_000u64).unwrap(), 25);
    }

    #[test]
    fn parses_levels_and_flags() {
        assert_eq!(
            parse_or("LOG_LEVEL", Some("info".into()), tracing::Level::DEBUG).unwrap(),
            tracing::Level::INFO
        );
        assert!(!parse_or("RUN_MIGRATIONS", Some("false".into()), true).unwrap());
    }

    #[test]
    fn bad_value_names_the_variable() {
        let err = parse_or("RATE_PROTECTED_PER_MIN", Some("lots".into()), 1000u32).unwrap_err();
        assert!(err.to_string().contains("RATE_PROTECTED_PER_MIN"));
    }
}

//! Runtime configuration, read from environment variables with defaults.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::{
    error::{ReportError, ReportResult},
    retry::RetryPolicy,
};

pub const DEFAULT_OUTPUT_PATH: &str = "/out/summary.json";

/// Connection parameters for the upstream Postgres store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "db".to_string(),
            port: 5432,
            user: "appuser".to_string(),
            password: "secretpw".to_string(),
            database: "appdb".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub db: DbConfig,
    pub top_n: u32,
    pub output_path: PathBuf,
    pub connect_attempts: u32,
    pub connect_delay: Duration,
    pub connect_timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            db: DbConfig::default(),
            top_n: 5,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            connect_attempts: 30,
            connect_delay: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(3),
        }
    }
}

impl ReportConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> ReportResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> ReportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup("DB_HOST") {
            cfg.db.host = host;
        }
        if let Some(port) = parse_var(&lookup, "DB_PORT")? {
            cfg.db.port = port;
        }
        if let Some(user) = lookup("DB_USER") {
            cfg.db.user = user;
        }
        if let Some(password) = lookup("DB_PASS") {
            cfg.db.password = password;
        }
        if let Some(database) = lookup("DB_NAME") {
            cfg.db.database = database;
        }
        if let Some(top_n) = parse_var(&lookup, "APP_TOP_N")? {
            cfg.top_n = top_n;
        }
        if let Some(path) = lookup("APP_OUTPUT_PATH") {
            cfg.output_path = PathBuf::from(path);
        }
        if let Some(attempts) = parse_var::<u32, _>(&lookup, "APP_CONNECT_ATTEMPTS")? {
            if attempts == 0 {
                return Err(ReportError::InvalidConfig {
                    key: "APP_CONNECT_ATTEMPTS".to_string(),
                    value: attempts.to_string(),
                });
            }
            cfg.connect_attempts = attempts;
        }
        if let Some(secs) = parse_var(&lookup, "APP_CONNECT_DELAY_SECS")? {
            cfg.connect_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var(&lookup, "APP_CONNECT_TIMEOUT_SECS")? {
            cfg.connect_timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.connect_attempts,
            delay: self.connect_delay,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> ReportResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ReportError::InvalidConfig {
                key: key.to_string(),
                value: raw,
            }),
    }
}

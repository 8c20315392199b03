//! Configuration loading from environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://curs_database.db";
pub const DEFAULT_FEED_URL: &str = "https://www.cbr.ru/scripts/XML_daily.asp";
pub const DEFAULT_PROBE_URL: &str = "http://www.google.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub feed_url: String,
    pub probe_url: String,
    pub http_timeout: Duration,
    pub prefs_path: PathBuf,
}

impl Config {
    /// Reads `VALUT_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> anyhow::Result<Self> {
        let timeout_secs: u64 = env::var("VALUT_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()?;

        Ok(Self {
            database_url: var_or("VALUT_DATABASE_URL", DEFAULT_DATABASE_URL),
            feed_url: var_or("VALUT_FEED_URL", DEFAULT_FEED_URL),
            probe_url: var_or("VALUT_PROBE_URL", DEFAULT_PROBE_URL),
            http_timeout: Duration::from_secs(timeout_secs),
            prefs_path: PathBuf::from(var_or("VALUT_PREFS_PATH", "vals.txt")),
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

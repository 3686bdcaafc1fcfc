use std::env;
use std::time::Duration;

use crate::appointments::DEFAULT_RECENT_WINDOW_DAYS;

/// Ten years; anything longer is a misconfiguration.
pub const MAX_RECENT_WINDOW_DAYS: i64 = 3650;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    /// Clinic wall clock; "today" is computed in this offset.
    pub utc_offset_minutes: i32,
    pub recent_window_days: i64,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", 5);
        let utc_offset_minutes = parse_or("UTC_OFFSET_MINUTES", 480);
        let recent_window_days =
            check_recent_window(parse_or("RECENT_WINDOW_DAYS", DEFAULT_RECENT_WINDOW_DAYS))?;
        let fetch_timeout = Duration::from_secs(parse_or("FETCH_TIMEOUT_SECS", 10));

        Ok(Self {
            database_url,
            bind_addr,
            db_max_connections,
            utc_offset_minutes,
            recent_window_days,
            fetch_timeout,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn check_recent_window(days: i64) -> anyhow::Result<i64> {
    if !(0..=MAX_RECENT_WINDOW_DAYS).contains(&days) {
        anyhow::bail!("RECENT_WINDOW_DAYS must be between 0 and {MAX_RECENT_WINDOW_DAYS}, got {days}");
    }
    Ok(days)
}

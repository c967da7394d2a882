// Application configuration loaded from the environment

use chrono::{FixedOffset, Offset, Utc};
use std::time::Duration;

/// Errors raised while reading configuration at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration shared by all services
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Offset in which booking dates, slots and operating hours are read
    pub venue_offset: FixedOffset,
    pub pricing_cache_ttl: Duration,
    pub stats_cache_ttl: Duration,
    pub min_booking_hours: f64,
    pub cancel_hours_threshold: f64,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// `.env` is read first when present. `DATABASE_URL` and `JWT_SECRET`
    /// are required, everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let offset_minutes: i32 = parse_var("VENUE_UTC_OFFSET_MINUTES", 0)?;
        let venue_offset = FixedOffset::east_opt(offset_minutes * 60).ok_or(ConfigError::Invalid {
            key: "VENUE_UTC_OFFSET_MINUTES",
            value: offset_minutes.to_string(),
        })?;

        Ok(Self {
            database_url,
            host,
            port: parse_var("PORT", 8080)?,
            jwt_secret,
            venue_offset,
            pricing_cache_ttl: Duration::from_secs(parse_var("PRICING_CACHE_TTL_SECS", 300)?),
            stats_cache_ttl: Duration::from_secs(parse_var("STATS_CACHE_TTL_SECS", 300)?),
            min_booking_hours: parse_var("MIN_BOOKING_HOURS", 1.0)?,
            cancel_hours_threshold: parse_var("CANCEL_HOURS_THRESHOLD", 24.0)?,
        })
    }

    /// Configuration used by tests: UTC venue, default policy values
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "test_secret_key_for_testing_purposes".to_string(),
            venue_offset: Utc.fix(),
            pricing_cache_ttl: Duration::from_secs(300),
            stats_cache_ttl: Duration::from_secs(300),
            min_booking_hours: 1.0,
            cancel_hours_threshold: 24.0,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

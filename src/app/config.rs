use std::time::Duration;

use crate::app::AppError;

pub const DEFAULT_API_URL: &str = "https://api4home.solarmanpv.com";

#[derive(Clone)]
pub struct AppConfig {
    pub username: String,
    pub password: String,
    pub station_id: Option<u64>,
    pub api_url: String,
    pub http_timeout_secs: u64,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("station_id", &self.station_id)
            .field("api_url", &self.api_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("retry_max_attempts", &self.retry_max_attempts)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        // A missing .env file is fine; the process environment still applies.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Credentials are sent verbatim, so only blank values are rejected.
        let username = required(&lookup, "USERNAME")?;
        let password = required(&lookup, "PASSWORD")?;
        let station_id = lookup("STATION_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|raw| {
                raw.parse::<u64>()
                    .ok()
                    .filter(|id| *id > 0)
                    .ok_or_else(|| AppError::config("STATION_ID must be a positive integer"))
            })
            .transpose()?;

        Ok(Self {
            username,
            password,
            station_id,
            api_url: lookup("SOLARMAN_API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            http_timeout_secs: positive_or_default(&lookup, "HTTP_TIMEOUT_SECS", 30_u64)?,
            retry_max_attempts: parse_or_default(&lookup, "RETRY_MAX_ATTEMPTS", 3_u32)?.max(1),
            retry_base_delay_ms: parse_or_default(&lookup, "RETRY_BASE_DELAY_MS", 500_u64)?,
        })
    }

    /// The daily report is bound to one station; listing stations is not.
    pub fn require_station_id(&self) -> Result<u64, AppError> {
        self.station_id.ok_or_else(|| AppError::config("STATION_ID is required"))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("{key} is required")))
}

fn positive_or_default<F>(lookup: &F, key: &str, default: u64) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or_else(|| AppError::config(format!("{key} must be a positive integer"))),
        None => Ok(default),
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}

mod config;
mod error;
mod logging;
mod runtime;
mod services;

pub use config::AppConfig;
pub use error::AppError;
pub use runtime::{daily_report, station_listing};
pub use services::{find_station, list_all_stations};

pub fn run() -> Result<(), AppError> {
    logging::init()?;

    let config = AppConfig::from_env()?;

    tracing::info!(
        username = %config.username,
        station_id = ?config.station_id,
        api_url = %config.api_url,
        http_timeout_secs = config.http_timeout_secs,
        retry_max_attempts = config.retry_max_attempts,
        "daily report bootstrap initialized"
    );

    runtime::run_daily_report(config)
}

pub fn run_station_list() -> Result<(), AppError> {
    logging::init()?;

    let config = AppConfig::from_env()?;

    tracing::info!(
        username = %config.username,
        api_url = %config.api_url,
        "station listing bootstrap initialized"
    );

    runtime::run_station_listing(config)
}

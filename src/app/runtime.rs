use std::future::Future;
use std::time::Duration;

use crate::adapters::retry::RetryPolicy;
use crate::adapters::solarman_http::{ClientError, SolarmanHttpClient, VendorApi};
use crate::app::config::AppConfig;
use crate::app::error::AppError;
use crate::app::services::{find_station, list_all_stations};
use crate::domain::models::CalendarDate;
use crate::domain::report::{render_daily_report, render_station_list};

/// Authenticates once, then looks up the station and the day's history side by side.
pub async fn daily_report<A: VendorApi>(
    api: &A,
    username: &str,
    password: &str,
    station_id: u64,
    date: CalendarDate,
) -> Result<String, ClientError> {
    let credential = api.authenticate(username, password).await?;
    tracing::info!(
        token_type = ?credential.token_type,
        expires_in = ?credential.expires_in,
        "authenticated against vendor api"
    );

    let token = credential.access_token.as_str();
    let (station, history) = tokio::try_join!(
        find_station(api, token, station_id),
        api.fetch_daily_generation(token, station_id, date),
    )?;

    tracing::info!(
        station_id = station.id,
        station_name = %station.name,
        records = history.records.len(),
        "daily generation fetched"
    );

    Ok(render_daily_report(&credential, &station, &history))
}

pub async fn station_listing<A: VendorApi>(
    api: &A,
    username: &str,
    password: &str,
) -> Result<String, ClientError> {
    let credential = api.authenticate(username, password).await?;
    let stations = list_all_stations(api, &credential.access_token).await?;
    tracing::info!(stations = stations.len(), "station listing fetched");

    Ok(render_station_list(&stations))
}

pub fn run_daily_report(config: AppConfig) -> Result<(), AppError> {
    let station_id = config.require_station_id()?;
    let client = build_client(&config)?;
    let date = CalendarDate::today();

    let report = block_on(daily_report(
        &client,
        &config.username,
        &config.password,
        station_id,
        date,
    ))??;
    println!("{report}");

    Ok(())
}

pub fn run_station_listing(config: AppConfig) -> Result<(), AppError> {
    let client = build_client(&config)?;

    let listing = block_on(station_listing(&client, &config.username, &config.password))??;
    println!("{listing}");

    Ok(())
}

fn build_client(config: &AppConfig) -> Result<SolarmanHttpClient, AppError> {
    let retry = RetryPolicy::new(
        config.retry_max_attempts,
        Duration::from_millis(config.retry_base_delay_ms),
    );
    SolarmanHttpClient::new(config.api_url.clone(), config.http_timeout(), retry)
        .map_err(AppError::runtime)
}

fn block_on<F: Future>(future: F) -> Result<F::Output, AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::runtime)?;
    Ok(runtime.block_on(future))
}

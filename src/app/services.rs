use crate::adapters::solarman_http::{ClientError, VendorApi};
use crate::domain::models::StationSummary;

/// Walks the search pages until the configured station shows up.
pub async fn find_station<A: VendorApi>(
    api: &A,
    token: &str,
    station_id: u64,
) -> Result<StationSummary, ClientError> {
    let mut page = 1;
    loop {
        let result = api.find_stations(token, page).await?;
        tracing::debug!(
            page,
            total = result.total,
            returned = result.data.len(),
            "station search page received"
        );

        let is_last = result.is_last(page);
        if let Some(station) = result.data.into_iter().find(|station| station.id == station_id) {
            return Ok(station);
        }
        if is_last {
            return Err(ClientError::StationNotFound(station_id));
        }
        page += 1;
    }
}

pub async fn list_all_stations<A: VendorApi>(
    api: &A,
    token: &str,
) -> Result<Vec<StationSummary>, ClientError> {
    let mut stations = Vec::new();
    let mut page = 1;
    loop {
        let result = api.find_stations(token, page).await?;
        let is_last = result.is_last(page);
        stations.extend(result.data);
        if is_last {
            return Ok(stations);
        }
        page += 1;
    }
}

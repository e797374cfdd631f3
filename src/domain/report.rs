use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::models::{GenerationHistory, PowerRecord, SessionCredential, StationSummary};

pub fn render_daily_report(
    credential: &SessionCredential,
    station: &StationSummary,
    history: &GenerationHistory,
) -> String {
    let mut lines = vec![
        format!("token: {}", pretty_json(credential)),
        format!("station: {}", pretty_json(station)),
        "history:".to_string(),
    ];

    lines.extend(history.records.iter().map(render_record));

    if let Some(statistics) = &history.statistics {
        lines.push(format!(
            "total: {} (full power hours: {})",
            optional_number(statistics.generation_value),
            optional_number(statistics.full_power_hours_day)
        ));
    }

    lines.join("\n")
}

pub fn render_station_list(stations: &[StationSummary]) -> String {
    let mut lines = vec![format!("stations: {}", stations.len())];
    lines.extend(stations.iter().map(|station| {
        format!(
            "{}\t{}\t{}",
            station.id,
            station.name,
            station.location_address.as_deref().unwrap_or("n/a")
        )
    }));
    lines.join("\n")
}

fn render_record(record: &PowerRecord) -> String {
    format!(
        "{}: {} ({})",
        epoch_seconds_to_iso8601(record.date_time),
        record
            .generation_power
            .map_or_else(|| "n/a".to_string(), |watts| format!("{watts}W")),
        optional_number(record.generation_capacity)
    )
}

/// Falls back to the raw seconds when chrono cannot represent the instant.
pub fn epoch_seconds_to_iso8601(seconds: i64) -> String {
    chrono::DateTime::<Utc>::from_timestamp(seconds, 0).map_or_else(
        || seconds.to_string(),
        |datetime| datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

fn optional_number(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |number| number.to_string())
}

fn pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| format!("<unprintable: {error}>"))
}

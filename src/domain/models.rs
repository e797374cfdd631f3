use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const STATION_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionCredential {
    pub access_token: String,
    pub token_type: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
    pub jti: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub last_update_time: Option<i64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub full_power_yesterday_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPage {
    pub total: u64,
    pub data: Vec<StationSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerRecord {
    #[serde(default)]
    pub system_id: Option<u64>,
    pub date_time: i64,
    /// Generated power in W.
    #[serde(default)]
    pub generation_power: Option<f64>,
    /// Share of the possible peak power; unit is not documented by the vendor.
    #[serde(default)]
    pub generation_capacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatistics {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub system_id: Option<u64>,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub generation_value: Option<f64>,
    #[serde(default)]
    pub full_power_hours_day: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationHistory {
    pub records: Vec<PowerRecord>,
    #[serde(default)]
    pub statistics: Option<DailyStatistics>,
}

/// Calendar day as sent to the history endpoint. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl CalendarDate {
    pub fn today() -> Self {
        chrono::Local::now().date_naive().into()
    }
}

impl StationPage {
    /// Whether a page with this number is the last one the vendor holds.
    pub fn is_last(&self, page: u32) -> bool {
        self.data.is_empty() || u64::from(page) * u64::from(STATION_PAGE_SIZE) >= self.total
    }
}

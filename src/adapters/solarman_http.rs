use std::future::Future;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::json;
use thiserror::Error;

use crate::adapters::retry::RetryPolicy;
use crate::domain::models::{
    CalendarDate, GenerationHistory, STATION_PAGE_SIZE, SessionCredential, StationPage,
};
use crate::domain::vendor_payload::{
    PayloadError, hash_password, parse_generation_history, parse_station_page,
    parse_token_response,
};

const TOKEN_ENDPOINT: &str = "token";
const STATION_SEARCH_ENDPOINT: &str = "station search";
const POWER_HISTORY_ENDPOINT: &str = "power history";
const ERROR_BODY_LIMIT: usize = 200;

pub trait VendorApi: Send + Sync {
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<SessionCredential, ClientError>> + Send;

    fn find_stations(
        &self,
        token: &str,
        page: u32,
    ) -> impl Future<Output = Result<StationPage, ClientError>> + Send;

    fn fetch_daily_generation(
        &self,
        token: &str,
        station_id: u64,
        date: CalendarDate,
    ) -> impl Future<Output = Result<GenerationHistory, ClientError>> + Send;
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("vendor request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} endpoint answered HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("malformed {endpoint} response: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },
    #[error("authentication rejected: {0}")]
    Authentication(String),
    #[error("station {0} not found in any search page")]
    StationNotFound(u64),
}

impl ClientError {
    /// Transport failures and 5xx answers may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    fn malformed(endpoint: &'static str, error: PayloadError) -> Self {
        Self::MalformedResponse {
            endpoint,
            reason: error.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolarmanHttpClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl SolarmanHttpClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            retry,
        })
    }

    async fn execute(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        Ok(body)
    }
}

impl VendorApi for SolarmanHttpClient {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SessionCredential, ClientError> {
        let hashed_password = hash_password(password);
        // The vendor wants both the digest and the clear text.
        let form = [
            ("system", "SOLARMAN"),
            ("grant_type", "password"),
            ("username", username),
            ("password", hashed_password.as_str()),
            ("client_id", "test"),
            ("clear_text_pwd", password),
            ("identity_type", "2"),
        ];
        let url = format!("{}/oauth-s/oauth/token", self.base_url);

        tracing::debug!(endpoint = TOKEN_ENDPOINT, "requesting access token");

        let body = match self
            .retry
            .run(TOKEN_ENDPOINT, || {
                self.execute(TOKEN_ENDPOINT, self.http.post(&url).form(&form))
            })
            .await
        {
            Ok(body) => body,
            Err(ClientError::Status { status, body, .. }) if (400..500).contains(&status) => {
                let reason = match parse_token_response(&body) {
                    Err(PayloadError::MissingAccessToken(reason)) => reason,
                    _ => format!("token endpoint answered HTTP {status}"),
                };
                return Err(ClientError::Authentication(reason));
            }
            Err(error) => return Err(error),
        };

        parse_token_response(&body).map_err(|error| match error {
            PayloadError::MissingAccessToken(reason) => ClientError::Authentication(reason),
            other => ClientError::malformed(TOKEN_ENDPOINT, other),
        })
    }

    async fn find_stations(&self, token: &str, page: u32) -> Result<StationPage, ClientError> {
        let page = page.max(1);
        let url = format!("{}/maintain-s/operating/station/search", self.base_url);
        let query = [
            ("page", page.to_string()),
            ("size", STATION_PAGE_SIZE.to_string()),
            ("order.direction", "ASC".to_string()),
            ("order.property", "name".to_string()),
        ];
        let region = json!({
            "region": {
                "nationId": null,
                "level1": null,
                "level2": null,
                "level3": null,
                "level4": null,
                "level5": null
            }
        });

        tracing::debug!(endpoint = STATION_SEARCH_ENDPOINT, page, "searching stations");

        let body = self
            .retry
            .run(STATION_SEARCH_ENDPOINT, || {
                self.execute(
                    STATION_SEARCH_ENDPOINT,
                    self.http
                        .post(&url)
                        .query(&query)
                        .header(AUTHORIZATION, bearer(token))
                        .json(&region),
                )
            })
            .await?;

        parse_station_page(&body)
            .map_err(|error| ClientError::malformed(STATION_SEARCH_ENDPOINT, error))
    }

    async fn fetch_daily_generation(
        &self,
        token: &str,
        station_id: u64,
        date: CalendarDate,
    ) -> Result<GenerationHistory, ClientError> {
        let url = format!(
            "{}/maintain-s/history/power/{station_id}/record",
            self.base_url
        );
        let query = [
            ("year", date.year.to_string()),
            ("month", date.month.to_string()),
            ("day", date.day.to_string()),
        ];

        tracing::debug!(
            endpoint = POWER_HISTORY_ENDPOINT,
            station_id,
            year = date.year,
            month = date.month,
            day = date.day,
            "fetching daily generation"
        );

        let body = self
            .retry
            .run(POWER_HISTORY_ENDPOINT, || {
                self.execute(
                    POWER_HISTORY_ENDPOINT,
                    self.http
                        .get(&url)
                        .query(&query)
                        .header(AUTHORIZATION, bearer(token)),
                )
            })
            .await?;

        parse_generation_history(&body)
            .map_err(|error| ClientError::malformed(POWER_HISTORY_ENDPOINT, error))
    }
}

fn bearer(token: &str) -> String {
    format!("bearer {token}")
}

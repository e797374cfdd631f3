use serde::Deserialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::domain::models::{GenerationHistory, SessionCredential, StationPage};

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("payload is not valid JSON for this endpoint: {0}")]
    InvalidJson(String),
    #[error("token payload carries no access_token: {0}")]
    MissingAccessToken(String),
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    access_token: Option<String>,
    token_type: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    scope: Option<String>,
    jti: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
}

/// Lowercase hex SHA-256 of the account password, as the token endpoint expects it.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn parse_token_response(body: &str) -> Result<SessionCredential, PayloadError> {
    let payload: TokenPayload = decode(body)?;

    let access_token = match payload.access_token {
        Some(token) if !token.trim().is_empty() => token,
        _ => {
            let reason = payload
                .error_description
                .or(payload.msg)
                .or(payload.error)
                .unwrap_or_else(|| "vendor returned no reason".to_string());
            return Err(PayloadError::MissingAccessToken(reason));
        }
    };

    Ok(SessionCredential {
        access_token,
        token_type: payload.token_type,
        refresh_token: payload.refresh_token,
        expires_in: payload.expires_in,
        scope: payload.scope,
        jti: payload.jti,
    })
}

pub fn parse_station_page(body: &str) -> Result<StationPage, PayloadError> {
    decode(body)
}

pub fn parse_generation_history(body: &str) -> Result<GenerationHistory, PayloadError> {
    decode(body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, PayloadError> {
    serde_json::from_str(body).map_err(|error| PayloadError::InvalidJson(error.to_string()))
}
